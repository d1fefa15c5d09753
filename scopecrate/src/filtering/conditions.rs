use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, Utc};
use sea_orm::{
    DatabaseBackend, JoinType,
    sea_query::{Alias, Expr, Func, SimpleExpr},
};
use uuid::Uuid;

use super::clause::{Operator, ParsedClause};
use super::resolver::{ResolvedField, resolve_field};
use crate::core::query::JoinSpec;
use crate::descriptor::{EntityDescriptor, EntityRegistry, FieldKind, LookupTarget, RelationField};
use crate::errors::FilterError;

/// Prefix for aliases of tables joined by relation clauses.
const RELATION_ALIAS_PREFIX: &str = "rel_";

/// Uppercased LIKE pattern for a (wildcard-translated) filter value.
///
/// A value without `%` is a substring match; with `%` it's used as written.
#[must_use]
pub fn like_pattern(value: &str) -> String {
    if value.contains('%') {
        value.to_uppercase()
    } else {
        format!("%{}%", value.to_uppercase())
    }
}

/// Build condition for a string expression with LIKE (case-insensitive)
#[must_use]
pub fn build_like_condition(column: SimpleExpr, value: &str) -> SimpleExpr {
    SimpleExpr::FunctionCall(Func::upper(column)).like(like_pattern(value))
}

/// A predicate that matches no row.
#[must_use]
pub fn constant_false() -> SimpleExpr {
    Expr::val(1).eq(0)
}

/// Apply a comparison operator. `ContainsCI` degrades to equality for kinds
/// that have no substring semantics.
fn apply_comparison<V>(column: SimpleExpr, operator: Operator, value: V) -> SimpleExpr
where
    V: Into<SimpleExpr>,
{
    let column = Expr::expr(column);
    match operator {
        Operator::ContainsCI => column.eq(value),
        Operator::NotEquals => column.ne(value),
        Operator::LessThan => column.lt(value),
        Operator::LessOrEqual => column.lte(value),
        Operator::GreaterThan => column.gt(value),
        Operator::GreaterOrEqual => column.gte(value),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Parse a timestamp filter value. The flag is `true` for date-only input.
///
/// Accepted: RFC 3339, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS`,
/// `YYYY-MM-DD` (midnight UTC).
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<(DateTime<Utc>, bool)> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some((parsed.with_timezone(&Utc), false));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some((naive.and_utc(), false));
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| (naive.and_utc(), true))
}

/// Compiles parsed clauses of one entity into predicates.
///
/// Relation clauses register a LEFT JOIN per relation; the joins are collected
/// and handed to the query together with the final condition.
pub struct PredicateCompiler<'a> {
    registry: &'a EntityRegistry,
    descriptor: &'a EntityDescriptor,
    backend: DatabaseBackend,
    joins: Vec<JoinSpec>,
}

impl<'a> PredicateCompiler<'a> {
    #[must_use]
    pub fn new(
        registry: &'a EntityRegistry,
        descriptor: &'a EntityDescriptor,
        backend: DatabaseBackend,
    ) -> Self {
        Self {
            registry,
            descriptor,
            backend,
            joins: Vec::new(),
        }
    }

    /// Joins required by the relation clauses compiled so far.
    #[must_use]
    pub fn into_joins(self) -> Vec<JoinSpec> {
        self.joins
    }

    /// Resolve and compile one clause.
    ///
    /// # Errors
    ///
    /// Any resolution or coercion failure; the caller fails the whole filter.
    pub fn compile(&mut self, clause: &ParsedClause) -> Result<SimpleExpr, FilterError> {
        match resolve_field(self.registry, self.descriptor, &clause.attribute)? {
            ResolvedField::Native { name, kind } => self.native_predicate(name, kind, clause),
            ResolvedField::Relation { relation, foreign } => {
                self.relation_predicate(relation, foreign, clause)
            }
        }
    }

    fn column(&self, field: &str) -> SimpleExpr {
        Expr::col((Alias::new(self.descriptor.table()), Alias::new(field))).into()
    }

    fn native_predicate(
        &self,
        field: &str,
        kind: FieldKind,
        clause: &ParsedClause,
    ) -> Result<SimpleExpr, FilterError> {
        let value = clause.raw_value.as_str();
        let operator = clause.operator;
        let column = self.column(field);
        let invalid = || FilterError::InvalidValue {
            field: field.to_string(),
            kind,
            value: value.to_string(),
        };
        let unsupported = || FilterError::UnsupportedOperator {
            field: field.to_string(),
            kind,
            operator,
        };

        match kind {
            FieldKind::String => Ok(match operator {
                Operator::ContainsCI => build_like_condition(column, value),
                _ => apply_comparison(column, operator, value.to_string()),
            }),
            FieldKind::Number => {
                if let Ok(int_value) = value.parse::<i64>() {
                    Ok(apply_comparison(column, operator, int_value))
                } else if let Some(float_value) =
                    value.parse::<f64>().ok().filter(|f| f.is_finite())
                {
                    Ok(apply_comparison(column, operator, float_value))
                } else {
                    Err(invalid())
                }
            }
            FieldKind::Boolean => {
                let flag = parse_bool(value).ok_or_else(invalid)?;
                match operator {
                    Operator::ContainsCI | Operator::NotEquals => {
                        Ok(apply_comparison(column, operator, flag))
                    }
                    _ => Err(unsupported()),
                }
            }
            FieldKind::Timestamp => {
                let (timestamp, date_only) = parse_timestamp(value).ok_or_else(invalid)?;
                if operator == Operator::ContainsCI && date_only {
                    let next_day = timestamp.checked_add_days(Days::new(1)).ok_or_else(invalid)?;
                    return Ok(Expr::expr(column.clone())
                        .gte(timestamp)
                        .and(Expr::expr(column).lt(next_day)));
                }
                Ok(apply_comparison(column, operator, timestamp))
            }
            FieldKind::Json => match operator {
                Operator::ContainsCI => Ok(build_like_condition(self.json_as_text(column), value)),
                _ => Err(unsupported()),
            },
            FieldKind::Uuid => {
                let uid = Uuid::parse_str(value).map_err(|_| invalid())?;
                match operator {
                    Operator::ContainsCI | Operator::NotEquals => {
                        Ok(apply_comparison(column, operator, uid))
                    }
                    _ => Err(unsupported()),
                }
            }
        }
    }

    fn json_as_text(&self, column: SimpleExpr) -> SimpleExpr {
        match self.backend {
            DatabaseBackend::Postgres => Expr::expr(column).cast_as(Alias::new("TEXT")),
            DatabaseBackend::MySql => Expr::expr(column).cast_as(Alias::new("CHAR")),
            // SQLite stores JSON as text already
            _ => column,
        }
    }

    fn relation_predicate(
        &mut self,
        relation: &RelationField,
        foreign: &EntityDescriptor,
        clause: &ParsedClause,
    ) -> Result<SimpleExpr, FilterError> {
        if clause.operator != Operator::ContainsCI {
            return Err(FilterError::UnsupportedRelationOperator {
                relation: relation.name.clone(),
                operator: clause.operator,
            });
        }

        let alias = format!("{RELATION_ALIAS_PREFIX}{}", relation.name);
        if !self.joins.iter().any(|join| join.alias == alias) {
            self.joins.push(JoinSpec {
                join_type: JoinType::LeftJoin,
                table: foreign.table().to_string(),
                alias: alias.clone(),
                alias_column: foreign.id_field().to_string(),
                from: self.descriptor.table().to_string(),
                from_column: relation.join_key(),
            });
        }

        let target = LookupTarget::new(foreign, &alias, self.backend);
        (foreign.related_lookup())(&target, &clause.raw_value)
    }
}
