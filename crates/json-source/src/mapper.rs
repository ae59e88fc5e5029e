//! Mapping of JSON objects onto document fields

use ingest_core::{Document, MappingError, RawRecord, RecordMapper};

/// Copies every key of a JSON object into the document unchanged.
///
/// Nested objects and arrays are stored as they are, with no flattening.
/// The target document is replaced, so it must be mapped before its
/// identifier is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMapper;

impl RecordMapper for JsonMapper {
    fn map(&self, record: &RawRecord, document: &mut Document) -> Result<(), MappingError> {
        let RawRecord::Object(object) = record else {
            return Err(MappingError::UnexpectedRecord(record.kind()));
        };
        *document = Document::from_map(object.clone());
        Ok(())
    }
}
