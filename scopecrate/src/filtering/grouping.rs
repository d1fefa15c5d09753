//! Assemble clause predicates into the final filter condition.
//!
//! `final = OR(AND(bare), AND(group_1), AND(group_2), ...)`
//!
//! This is also the fail-closed boundary: any [`FilterError`] raised while
//! tokenizing, parsing, resolving or compiling any clause replaces the whole
//! filter with a constant-false predicate.

use sea_orm::{Condition, DatabaseBackend};

use super::clause::parse_clause;
use super::conditions::{PredicateCompiler, constant_false};
use super::tokenizer::group_elements;
use crate::config::EngineConfig;
use crate::core::query::JoinSpec;
use crate::descriptor::{EntityDescriptor, EntityRegistry};
use crate::errors::FilterError;

/// A compiled filter: the condition plus the relation joins it references.
#[derive(Debug, Clone)]
pub struct CompiledFilter {
    pub condition: Condition,
    pub joins: Vec<JoinSpec>,
    rejected: Option<FilterError>,
}

impl CompiledFilter {
    /// No restriction.
    #[must_use]
    pub fn match_all() -> Self {
        Self {
            condition: Condition::all(),
            joins: Vec::new(),
            rejected: None,
        }
    }

    /// Matches nothing. Carries no joins so that a rejected filter never
    /// reaches the foreign tables.
    #[must_use]
    pub fn reject(reason: FilterError) -> Self {
        Self {
            condition: Condition::all().add(constant_false()),
            joins: Vec::new(),
            rejected: Some(reason),
        }
    }

    /// Why the filter was replaced by constant false, if it was.
    #[must_use]
    pub fn rejection(&self) -> Option<&FilterError> {
        self.rejected.as_ref()
    }
}

/// Compile a raw filter string for `descriptor`. Never fails: errors turn
/// into [`CompiledFilter::reject`] and are logged.
#[must_use]
pub fn compile_filter(
    filter: &str,
    registry: &EntityRegistry,
    descriptor: &EntityDescriptor,
    backend: DatabaseBackend,
    config: &EngineConfig,
) -> CompiledFilter {
    match try_compile_filter(filter, registry, descriptor, backend, config) {
        Ok(compiled) => compiled,
        Err(reason) => {
            tracing::warn!(
                entity_type = descriptor.entity_type(),
                reason = %reason,
                "Filter rejected, matching no rows"
            );
            CompiledFilter::reject(reason)
        }
    }
}

fn try_compile_filter(
    filter: &str,
    registry: &EntityRegistry,
    descriptor: &EntityDescriptor,
    backend: DatabaseBackend,
    config: &EngineConfig,
) -> Result<CompiledFilter, FilterError> {
    if filter.len() > config.max_filter_length {
        return Err(FilterError::TooLong {
            max: config.max_filter_length,
        });
    }

    let grouping = group_elements(filter)?;
    tracing::debug!(
        bare = grouping.bare.len(),
        groups = grouping.groups.len(),
        "Filter grouped"
    );
    if grouping.is_empty() {
        return Ok(CompiledFilter::match_all());
    }

    let mut compiler = PredicateCompiler::new(registry, descriptor, backend);
    let mut alternatives = Condition::any();
    for clauses in std::iter::once(&grouping.bare).chain(grouping.groups.iter()) {
        if let Some(group) = and_group(&mut compiler, clauses)? {
            alternatives = alternatives.add(group);
        }
    }

    Ok(CompiledFilter {
        condition: Condition::all().add(alternatives),
        joins: compiler.into_joins(),
        rejected: None,
    })
}

/// AND together one clause set. An empty set contributes no term.
fn and_group(
    compiler: &mut PredicateCompiler<'_>,
    clauses: &[String],
) -> Result<Option<Condition>, FilterError> {
    if clauses.is_empty() {
        return Ok(None);
    }
    let mut group = Condition::all();
    for element in clauses {
        let clause = parse_clause(element)?;
        group = group.add(compiler.compile(&clause)?);
    }
    Ok(Some(group))
}
