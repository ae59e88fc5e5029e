//! Raw records as produced by a record source.

use serde_json::{Map, Value};
use std::sync::Arc;

/// One unmapped input record.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    /// A delimited row, positionally aligned to a [`Header`].
    OrderedFields(Vec<String>),
    /// One decoded JSON object.
    Object(Map<String, Value>),
}

impl RawRecord {
    pub fn kind(&self) -> &'static str {
        match self {
            RawRecord::OrderedFields(_) => "delimited",
            RawRecord::Object(_) => "JSON object",
        }
    }
}

/// Field names captured from the first line of delimited input.
///
/// Immutable once constructed; clones share the same names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    names: Arc<[String]>,
}

impl Header {
    pub fn new(names: Vec<String>) -> Self {
        Self {
            names: names.into(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl<S: Into<String>> FromIterator<S> for Header {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}
