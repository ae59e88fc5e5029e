//! Positional mapping of delimited rows onto document fields.

use ingest_core::{Document, Header, MappingError, RawRecord, RecordMapper};

/// Maps column `i` of a row to the field named `header[i]`.
///
/// Column 0 carries the natural key used for the identifier and is never
/// stored as a field. Rows shorter than the header leave the trailing fields
/// unset; rows longer than the header are rejected.
#[derive(Debug, Clone)]
pub struct DelimitedMapper {
    header: Header,
}

impl DelimitedMapper {
    pub fn new(header: Header) -> Self {
        Self { header }
    }
}

impl RecordMapper for DelimitedMapper {
    fn map(&self, record: &RawRecord, document: &mut Document) -> Result<(), MappingError> {
        let RawRecord::OrderedFields(fields) = record else {
            return Err(MappingError::UnexpectedRecord(record.kind()));
        };
        if fields.len() > self.header.len() {
            return Err(MappingError::TooManyColumns {
                columns: fields.len(),
                header: self.header.len(),
            });
        }

        for (i, value) in fields.iter().enumerate().skip(1) {
            if let Some(name) = self.header.get(i) {
                document.set_string(name, value.as_str());
            }
        }
        Ok(())
    }
}
