//! Query filter compilation.
//!
//! Callers submit dynamically composed filter tuples (field code, operator
//! code, value). The compiler validates them against an immutable whitelist,
//! enforces the single-inequality-field rule the datastore requires, coerces
//! numeric values, and emits an ordered [`QueryPlan`] that any compatible
//! backend can execute. Pure: no side effects, no ambient state.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Comparison operators accepted in filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
    Ne,
}

impl Operator {
    /// The datastore comparison symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Ne => "!=",
        }
    }

    /// Every operator except `=` counts as an inequality.
    pub fn is_inequality(&self) -> bool {
        !matches!(self, Operator::Eq)
    }
}

/// A whitelisted queryable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryField {
    /// Storage column the wire code maps to.
    pub column: &'static str,
    /// Numeric fields coerce their wire value to an integer.
    pub numeric: bool,
}

/// Immutable whitelist configuration for one queryable entity kind.
///
/// Built once at startup and passed into [`compile`] explicitly.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    fields: HashMap<&'static str, QueryField>,
    operators: HashMap<&'static str, Operator>,
    /// Deterministic secondary sort key appended to every plan.
    default_order: &'static str,
}

impl FilterConfig {
    /// The whitelist for conference queries.
    pub fn conferences() -> Self {
        let fields = HashMap::from([
            (
                "CITY",
                QueryField {
                    column: "city",
                    numeric: false,
                },
            ),
            (
                "TOPIC",
                QueryField {
                    column: "topics",
                    numeric: false,
                },
            ),
            (
                "MONTH",
                QueryField {
                    column: "month",
                    numeric: true,
                },
            ),
            (
                "MAX_ATTENDEES",
                QueryField {
                    column: "max_attendees",
                    numeric: true,
                },
            ),
        ]);
        Self {
            fields,
            operators: Self::standard_operators(),
            default_order: "name",
        }
    }

    fn standard_operators() -> HashMap<&'static str, Operator> {
        HashMap::from([
            ("EQ", Operator::Eq),
            ("GT", Operator::Gt),
            ("GTEQ", Operator::Ge),
            ("LT", Operator::Lt),
            ("LTEQ", Operator::Le),
            ("NE", Operator::Ne),
        ])
    }

    /// Resolve an operator code on its own (used by the single-filter
    /// endpoints that bypass field mapping).
    pub fn operator(&self, code: &str) -> Result<Operator> {
        self.operators
            .get(code)
            .copied()
            .ok_or_else(|| Error::InvalidFilter(format!("operator '{code}'")))
    }
}

/// One caller-supplied filter tuple, as it arrives off the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    pub field: String,
    pub operator: String,
    pub value: String,
}

impl FilterSpec {
    /// Assemble a spec from three optional parts.
    ///
    /// All present yields `Some`, all absent yields `None`, and a partial
    /// tuple fails with [`Error::IncompleteFilter`].
    pub fn from_parts(
        field: Option<String>,
        operator: Option<String>,
        value: Option<String>,
    ) -> Result<Option<FilterSpec>> {
        match (field, operator, value) {
            (Some(field), Some(operator), Some(value)) => Ok(Some(FilterSpec {
                field,
                operator,
                value,
            })),
            (None, None, None) => Ok(None),
            _ => Err(Error::IncompleteFilter),
        }
    }
}

/// A typed filter value after coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Number(i64),
    Text(String),
}

/// One validated clause of a query plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterClause {
    /// Storage column (whitelisted; never raw caller input).
    pub column: &'static str,
    pub operator: Operator,
    pub value: FilterValue,
}

/// A validated, ordered query: filter clauses plus the sort-key sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub clauses: Vec<FilterClause>,
    /// Sort keys in priority order. When an inequality field is present it
    /// comes first (datastore requirement); the name column always closes
    /// the sequence for stable output ordering.
    pub order_by: Vec<&'static str>,
}

/// Compile caller-supplied filters into a query plan, or fail.
pub fn compile(config: &FilterConfig, specs: &[FilterSpec]) -> Result<QueryPlan> {
    let mut clauses = Vec::with_capacity(specs.len());
    let mut inequality_column: Option<&'static str> = None;

    for spec in specs {
        let field = config
            .fields
            .get(spec.field.as_str())
            .ok_or_else(|| Error::InvalidFilter(format!("field '{}'", spec.field)))?;
        let operator = config.operator(&spec.operator)?;

        if operator.is_inequality() {
            match inequality_column {
                Some(column) if column != field.column => {
                    return Err(Error::MultipleInequalityFields);
                }
                _ => inequality_column = Some(field.column),
            }
        }

        let value = if field.numeric {
            let n = spec.value.trim().parse::<i64>().map_err(|_| {
                Error::InvalidFilter(format!(
                    "value '{}' is not an integer for field '{}'",
                    spec.value, spec.field
                ))
            })?;
            FilterValue::Number(n)
        } else {
            FilterValue::Text(spec.value.clone())
        };

        clauses.push(FilterClause {
            column: field.column,
            operator,
            value,
        });
    }

    let mut order_by = Vec::with_capacity(2);
    if let Some(column) = inequality_column {
        order_by.push(column);
    }
    if order_by.last() != Some(&config.default_order) {
        order_by.push(config.default_order);
    }

    Ok(QueryPlan { clauses, order_by })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(field: &str, operator: &str, value: &str) -> FilterSpec {
        FilterSpec {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    #[test]
    fn equality_only_sorts_by_name() {
        let config = FilterConfig::conferences();
        let plan = compile(&config, &[spec("CITY", "EQ", "London")]).unwrap();

        assert_eq!(plan.order_by, vec!["name"]);
        assert_eq!(
            plan.clauses,
            vec![FilterClause {
                column: "city",
                operator: Operator::Eq,
                value: FilterValue::Text("London".into()),
            }]
        );
    }

    #[test]
    fn inequality_field_leads_sort_order() {
        let config = FilterConfig::conferences();
        let plan = compile(
            &config,
            &[spec("MONTH", "GT", "3"), spec("CITY", "EQ", "London")],
        )
        .unwrap();

        assert_eq!(plan.order_by, vec!["month", "name"]);
        assert_eq!(
            plan.clauses,
            vec![
                FilterClause {
                    column: "month",
                    operator: Operator::Gt,
                    value: FilterValue::Number(3),
                },
                FilterClause {
                    column: "city",
                    operator: Operator::Eq,
                    value: FilterValue::Text("London".into()),
                },
            ]
        );
    }

    #[test]
    fn two_inequality_fields_rejected() {
        let config = FilterConfig::conferences();
        let result = compile(
            &config,
            &[spec("MONTH", "GT", "3"), spec("MAX_ATTENDEES", "LT", "100")],
        );
        assert_eq!(result, Err(Error::MultipleInequalityFields));
    }

    #[test]
    fn repeated_inequality_on_same_field_allowed() {
        let config = FilterConfig::conferences();
        let plan = compile(
            &config,
            &[spec("MONTH", "GT", "3"), spec("MONTH", "LTEQ", "9")],
        )
        .unwrap();

        assert_eq!(plan.clauses.len(), 2);
        assert_eq!(plan.order_by, vec!["month", "name"]);
    }

    #[test]
    fn ne_counts_as_inequality() {
        let config = FilterConfig::conferences();
        let result = compile(
            &config,
            &[spec("CITY", "NE", "Paris"), spec("MONTH", "GT", "1")],
        );
        assert_eq!(result, Err(Error::MultipleInequalityFields));

        let plan = compile(&config, &[spec("CITY", "NE", "Paris")]).unwrap();
        assert_eq!(plan.order_by, vec!["city", "name"]);
    }

    #[test]
    fn unknown_field_rejected_anywhere() {
        let config = FilterConfig::conferences();
        for specs in [
            vec![spec("COLOR", "EQ", "red")],
            vec![spec("CITY", "EQ", "London"), spec("COLOR", "EQ", "red")],
        ] {
            let result = compile(&config, &specs);
            assert!(matches!(result, Err(Error::InvalidFilter(_))), "{specs:?}");
        }
    }

    #[test]
    fn unknown_operator_rejected() {
        let config = FilterConfig::conferences();
        let result = compile(&config, &[spec("CITY", "LIKE", "Lon%")]);
        assert!(matches!(result, Err(Error::InvalidFilter(m)) if m.contains("LIKE")));
    }

    #[test]
    fn numeric_fields_coerce_values() {
        let config = FilterConfig::conferences();
        let plan = compile(&config, &[spec("MAX_ATTENDEES", "GTEQ", " 250 ")]).unwrap();
        assert_eq!(plan.clauses[0].value, FilterValue::Number(250));

        let result = compile(&config, &[spec("MONTH", "EQ", "June")]);
        assert!(matches!(result, Err(Error::InvalidFilter(m)) if m.contains("June")));
    }

    #[test]
    fn empty_filter_list_is_valid() {
        let config = FilterConfig::conferences();
        let plan = compile(&config, &[]).unwrap();
        assert!(plan.clauses.is_empty());
        assert_eq!(plan.order_by, vec!["name"]);
    }

    #[test]
    fn from_parts_all_or_nothing() {
        let all = FilterSpec::from_parts(
            Some("CITY".into()),
            Some("EQ".into()),
            Some("London".into()),
        )
        .unwrap();
        assert_eq!(all, Some(spec("CITY", "EQ", "London")));

        assert_eq!(FilterSpec::from_parts(None, None, None).unwrap(), None);

        let partial = FilterSpec::from_parts(Some("CITY".into()), None, Some("London".into()));
        assert_eq!(partial, Err(Error::IncompleteFilter));
    }

    #[test]
    fn operator_symbols() {
        let config = FilterConfig::conferences();
        assert_eq!(config.operator("EQ").unwrap().symbol(), "=");
        assert_eq!(config.operator("GTEQ").unwrap().symbol(), ">=");
        assert_eq!(config.operator("NE").unwrap().symbol(), "!=");
        assert!(config.operator("==").is_err());
    }
}
