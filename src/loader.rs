//! Record loading from JSON documents.
//!
//! The cascade is transport-agnostic: whatever fetched the document, it
//! arrives here as a fully materialized JSON value. Both a bare array of
//! records and a wrapped `{"records": [...]}` object are accepted
//! (`"AllItems"` and `"items"` work as aliases for the wrapped form).

use std::io::Read;

use serde::Deserialize;
use tracing::debug;

use crate::error::CascadeResult;
use crate::record::Record;

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordDocument {
    List(Vec<Record>),
    Wrapped {
        #[serde(alias = "AllItems", alias = "items")]
        records: Vec<Record>,
    },
}

impl RecordDocument {
    fn into_records(self) -> Vec<Record> {
        match self {
            RecordDocument::List(records) => records,
            RecordDocument::Wrapped { records } => records,
        }
    }
}

/// Parse a record collection from a JSON string.
pub fn records_from_json(src: &str) -> CascadeResult<Vec<Record>> {
    let document: RecordDocument = serde_json::from_str(src)?;
    let records = document.into_records();
    debug!(count = records.len(), "parsed record document");
    Ok(records)
}

/// Parse a record collection from a reader (e.g. an open file).
pub fn records_from_reader(reader: impl Read) -> CascadeResult<Vec<Record>> {
    let document: RecordDocument = serde_json::from_reader(reader)?;
    Ok(document.into_records())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_array() {
        let records = records_from_json(r#"[{"Region":"NORTH"},{"Region":"SOUTH"}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text("Region").as_deref(), Some("NORTH"));
    }

    #[test]
    fn test_wrapped_document() {
        let records =
            records_from_json(r#"{"records":[{"City":"Laurel"}]}"#).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_all_items_alias() {
        let records =
            records_from_json(r#"{"AllItems":[{"City":"Newark"},{"City":"Felton"}]}"#).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_malformed_document_errors() {
        assert!(records_from_json("not json").is_err());
        assert!(records_from_json(r#"{"records": 4}"#).is_err());
    }

    #[test]
    fn test_from_reader() {
        let records = records_from_reader(r#"[{"Park":"Trap Pond"}]"#.as_bytes()).unwrap();
        assert_eq!(records[0].text("Park").as_deref(), Some("Trap Pond"));
    }
}
