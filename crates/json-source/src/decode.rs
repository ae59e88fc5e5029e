//! Decoding of JSON input into records

use ingest_core::{DecodeError, RawRecord, ShapeError, SourceReadError};
use serde_json::{Map, Value};

/// The two supported input shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonRecords {
    /// A single top-level object
    Single(Map<String, Value>),
    /// A top-level array whose elements are all objects
    Many(Vec<Map<String, Value>>),
}

/// Failure to turn input bytes into [`JsonRecords`].
#[derive(Debug, thiserror::Error)]
pub enum JsonInputError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Decode `input` and check its shape.
///
/// Every array element is checked before anything is returned, so a shape
/// error is always reported before any record reaches the store.
pub fn decode(input: &[u8]) -> Result<JsonRecords, JsonInputError> {
    let value: Value = serde_json::from_slice(input)
        .map_err(|e| JsonInputError::Decode(DecodeError(e)))?;

    match value {
        Value::Object(object) => Ok(JsonRecords::Single(object)),
        Value::Array(elements) => {
            let mut objects = Vec::with_capacity(elements.len());
            for (index, element) in elements.into_iter().enumerate() {
                match element {
                    Value::Object(object) => objects.push(object),
                    other => {
                        return Err(JsonInputError::Shape(ShapeError::NotAnObject {
                            index,
                            found: kind(&other),
                        }))
                    }
                }
            }
            tracing::debug!("Decoded JSON array of {} objects", objects.len());
            Ok(JsonRecords::Many(objects))
        }
        other => Err(JsonInputError::Shape(ShapeError::Unsupported {
            found: kind(&other),
        })),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl JsonRecords {
    pub fn len(&self) -> usize {
        match self {
            JsonRecords::Single(_) => 1,
            JsonRecords::Many(objects) => objects.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records in input order, ready for the batch loader.
    pub fn into_records(self) -> impl Iterator<Item = Result<RawRecord, SourceReadError>> {
        let objects = match self {
            JsonRecords::Single(object) => vec![object],
            JsonRecords::Many(objects) => objects,
        };
        objects.into_iter().map(|object| Ok(RawRecord::Object(object)))
    }
}
