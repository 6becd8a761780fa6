//! List-documents query builder.
//!
//! Queries are sent as repeated `queries[]` URL parameters using the
//! service's call syntax, e.g. `orderDesc("$createdAt")` or `limit(10)`.

use std::fmt;

use serde_json::Value;

/// System attribute holding the creation timestamp.
pub const CREATED_AT: &str = "$createdAt";

#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    OrderAsc(String),
    OrderDesc(String),
    Limit(u32),
    Equal(String, Vec<Value>),
}

impl Query {
    pub fn order_asc(attribute: impl Into<String>) -> Self {
        Query::OrderAsc(attribute.into())
    }

    pub fn order_desc(attribute: impl Into<String>) -> Self {
        Query::OrderDesc(attribute.into())
    }

    pub fn limit(limit: u32) -> Self {
        Query::Limit(limit)
    }

    pub fn equal(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        let values = match value.into() {
            Value::Array(values) => values,
            single => vec![single],
        };
        Query::Equal(attribute.into(), values)
    }
}

fn quoted(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::OrderAsc(attr) => write!(f, "orderAsc({})", quoted(attr)),
            Query::OrderDesc(attr) => write!(f, "orderDesc({})", quoted(attr)),
            Query::Limit(n) => write!(f, "limit({n})"),
            Query::Equal(attr, values) => {
                write!(f, "equal({}, {})", quoted(attr), Value::from(values.clone()))
            }
        }
    }
}
