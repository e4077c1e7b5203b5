//! The "parameter not set" value.
//!
//! Builders in this crate return `None` for an unset parameter. Each backend
//! endpoint spells that differently; `Absent` performs the translation at
//! the request boundary.

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absent {
    /// `""`
    Empty,
    /// A single placeholder character such as `_`.
    Placeholder(char),
    /// JSON `null`.
    Null,
}

impl Absent {
    /// Filter strings use `_`.
    pub const FILTER: Absent = Absent::Placeholder('_');
    /// Instant lists use the empty string.
    pub const INSTANTS: Absent = Absent::Empty;
    /// Graph and map arguments use `null`.
    pub const ARGUMENT: Absent = Absent::Null;

    pub fn encode<T: Into<Value>>(self, value: Option<T>) -> Value {
        match value {
            Some(v) => v.into(),
            None => match self {
                Absent::Empty => Value::String(String::new()),
                Absent::Placeholder(c) => Value::String(c.to_string()),
                Absent::Null => Value::Null,
            },
        }
    }

    /// Text form; `None` only for [`Absent::Null`].
    pub fn render(self, value: Option<String>) -> Option<String> {
        match (value, self) {
            (Some(v), _) => Some(v),
            (None, Absent::Empty) => Some(String::new()),
            (None, Absent::Placeholder(c)) => Some(c.to_string()),
            (None, Absent::Null) => None,
        }
    }
}
