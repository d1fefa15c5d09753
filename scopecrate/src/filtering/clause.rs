//! Lexical parsing of a single filter clause: `attribute:[operator]value`.

use crate::errors::FilterError;

/// Comparison operator of a clause. Absent a symbol, a clause is a
/// case-insensitive contains/wildcard match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    ContainsCI,
    NotEquals,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
}

/// Operator prefixes in match priority: two-character symbols first.
const OPERATOR_PREFIXES: [(&str, Operator); 5] = [
    ("<=", Operator::LessOrEqual),
    (">=", Operator::GreaterOrEqual),
    ("!=", Operator::NotEquals),
    ("<", Operator::LessThan),
    (">", Operator::GreaterThan),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedClause {
    pub attribute: String,
    pub operator: Operator,
    pub raw_value: String,
}

/// Parse one cleaned token into a clause.
///
/// The attribute ends at the first `:`; the value may itself contain colons
/// (timestamps). Wildcards and quotes in the value are normalized by
/// [`set_wildcards`].
///
/// # Errors
///
/// Returns [`FilterError::MissingSeparator`] without a `:` and
/// [`FilterError::EmptyAttribute`] when nothing precedes it.
pub fn parse_clause(element: &str) -> Result<ParsedClause, FilterError> {
    let (attribute, remainder) = element
        .split_once(':')
        .ok_or_else(|| FilterError::MissingSeparator(element.to_string()))?;

    let attribute = attribute.trim();
    if attribute.is_empty() {
        return Err(FilterError::EmptyAttribute(element.to_string()));
    }

    let (operator, value) = OPERATOR_PREFIXES
        .iter()
        .find_map(|(symbol, operator)| {
            remainder
                .strip_prefix(symbol)
                .map(|value| (*operator, value))
        })
        .unwrap_or((Operator::ContainsCI, remainder));

    Ok(ParsedClause {
        attribute: attribute.to_string(),
        operator,
        raw_value: set_wildcards(value),
    })
}

/// Translate `*` to SQL `%`, drop quote characters and trim.
///
/// Translation is unconditional: a `*` that was quoted in the filter string is
/// still a wildcard.
#[must_use]
pub fn set_wildcards(value: &str) -> String {
    value
        .replace('*', "%")
        .replace(['\'', '"'], "")
        .trim()
        .to_string()
}
