use crate::document::Document;
use crate::error::MappingError;
use crate::record::RawRecord;

/// Converts one raw record into document fields.
///
/// Mappers only assign fields; the identifier is set separately by
/// [`crate::IdSynthesizer`]. On error the document may hold a partial set of
/// fields and must be cleaned before reuse.
pub trait RecordMapper {
    fn map(&self, record: &RawRecord, document: &mut Document) -> Result<(), MappingError>;
}
