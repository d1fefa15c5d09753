//! Filter string tokenization and grouping.
//!
//! A filter is split like a shell command line, so `name:"John Smith"` stays
//! one token. Shell comments are not: an unquoted `#` starting a word rejects
//! the filter instead of hiding the rest of it. Parentheses at the start or end of a token mark a group:
//!
//! ```text
//! (name:John surname:Doe) title:Manager
//!  ^ open            ^ close
//! ```
//!
//! Markers are paired in the order they are met: first open with first close,
//! second open with second close, and so on. There is exactly one level of
//! grouping; a token that still starts with `(` after one is stripped is just
//! a malformed clause.

use crate::errors::FilterError;

/// One token after grouping markers were stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterElement {
    pub raw_text: String,
    pub is_group_open: bool,
    pub is_group_close: bool,
}

/// The tokenized filter: clauses outside any group, and each group's clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grouping {
    pub bare: Vec<String>,
    pub groups: Vec<Vec<String>>,
}

impl Grouping {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bare.is_empty() && self.groups.iter().all(Vec::is_empty)
    }
}

/// Split a raw filter into elements, honoring single and double quotes.
///
/// # Errors
///
/// Returns [`FilterError::UnterminatedQuote`] if a quote is never closed and
/// [`FilterError::CommentMarker`] if an unquoted word starts with `#`.
pub fn tokenize(filter: &str) -> Result<Vec<FilterElement>, FilterError> {
    if starts_comment(filter) {
        return Err(FilterError::CommentMarker);
    }
    let tokens = shlex::split(filter).ok_or(FilterError::UnterminatedQuote)?;

    let elements = tokens
        .into_iter()
        .map(|token| {
            let mut text = token.as_str();
            let is_group_open = text.starts_with('(');
            if is_group_open {
                text = &text[1..];
            }
            let is_group_close = text.ends_with(')');
            if is_group_close {
                text = &text[..text.len() - 1];
            }
            FilterElement {
                raw_text: text.to_string(),
                is_group_open,
                is_group_close,
            }
        })
        .collect();

    Ok(elements)
}

/// Whether `shlex` would read part of `filter` as a comment, i.e. an unquoted
/// `#` at the start of a word.
fn starts_comment(filter: &str) -> bool {
    let mut in_single = false;
    let mut in_double = false;
    let mut escaped = false;
    let mut word_start = true;

    for c in filter.chars() {
        if in_single {
            in_single = c != '\'';
            continue;
        }
        if in_double {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_double = false;
            }
            continue;
        }
        if escaped {
            escaped = false;
            word_start = false;
            continue;
        }
        match c {
            '#' if word_start => return true,
            c if c.is_ascii_whitespace() => word_start = true,
            '\\' => {
                escaped = true;
                word_start = false;
            }
            '\'' => {
                in_single = true;
                word_start = false;
            }
            '"' => {
                in_double = true;
                word_start = false;
            }
            _ => word_start = false,
        }
    }
    false
}

/// Indices of grouping markers in encounter order, tagged open (`true`) or close.
fn grouping_markers(elements: &[FilterElement]) -> Vec<(usize, bool)> {
    let mut markers = Vec::new();
    for (index, element) in elements.iter().enumerate() {
        if element.is_group_open {
            markers.push((index, true));
        }
        if element.is_group_close {
            markers.push((index, false));
        }
    }
    markers
}

/// Pair markers greedily, `(open, close)` by encounter order.
///
/// # Errors
///
/// Returns [`FilterError::UnbalancedGroups`] for an odd number of markers or
/// when a pair isn't an open followed by a close.
pub fn marker_pairs(elements: &[FilterElement]) -> Result<Vec<(usize, usize)>, FilterError> {
    let markers = grouping_markers(elements);
    if markers.len() % 2 != 0 {
        return Err(FilterError::UnbalancedGroups);
    }

    markers
        .chunks_exact(2)
        .map(|pair| match (pair[0], pair[1]) {
            ((start, true), (end, false)) if start <= end => Ok((start, end)),
            _ => Err(FilterError::UnbalancedGroups),
        })
        .collect()
}

/// Tokenize a filter and split it into bare clauses and AND-groups.
///
/// Empty tokens (a lone `(` or `)`) are dropped.
///
/// # Errors
///
/// Propagates [`tokenize`] and [`marker_pairs`] failures.
pub fn group_elements(filter: &str) -> Result<Grouping, FilterError> {
    let elements = tokenize(filter)?;
    let pairs = marker_pairs(&elements)?;
    tracing::debug!(?pairs, "Filter marker pairs");

    let mut grouping = Grouping::default();
    let mut cursor = 0;
    for (start, end) in pairs {
        grouping
            .bare
            .extend(non_empty(&elements[cursor..start]));
        grouping.groups.push(non_empty(&elements[start..=end]).collect());
        cursor = end + 1;
    }
    grouping.bare.extend(non_empty(&elements[cursor..]));

    Ok(grouping)
}

fn non_empty(elements: &[FilterElement]) -> impl Iterator<Item = String> + '_ {
    elements
        .iter()
        .filter(|e| !e.raw_text.is_empty())
        .map(|e| e.raw_text.clone())
}
