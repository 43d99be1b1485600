//! Statement and row types exchanged with a [`Storage`](crate::Storage).

use serde_json::{Map, Value};

/// One result row: column name → JSON value.
pub type Row = Map<String, Value>;

/// A bound statement parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Text(String),
    Int(i64),
    Null,
}

impl Param {
    /// The parameter as JSON, the way [`MemoryStorage`](crate::MemoryStorage)
    /// stores it.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Int(n) => Value::from(*n),
            Self::Null => Value::Null,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Param {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl<T: Into<Param>> From<Option<T>> for Param {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A fixed SQL text from [`crate::sql`] plus its positional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: &'static str,
    pub params: Vec<Param>,
}

impl Statement {
    pub fn new(sql: &'static str) -> Self {
        Self { sql, params: Vec::new() }
    }

    /// Append a positional parameter.
    pub fn bind(mut self, param: impl Into<Param>) -> Self {
        self.params.push(param.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_keeps_positional_order() {
        let stmt = Statement::new("SELECT ?, ?, ?")
            .bind("a")
            .bind(7_i64)
            .bind(None::<String>);

        assert_eq!(
            stmt.params,
            vec![Param::Text("a".into()), Param::Int(7), Param::Null]
        );
    }

    #[test]
    fn some_option_binds_inner_value() {
        assert_eq!(Param::from(Some("x".to_string())), Param::Text("x".into()));
        assert_eq!(Param::Int(3).to_json(), serde_json::json!(3));
        assert_eq!(Param::Null.as_text(), None);
    }
}
