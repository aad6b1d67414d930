//! Record fetching and EAD normalization.
//!
//! The transport returns the export byte-for-byte; before anything
//! downstream sees it, the XML is re-parsed and re-serialized through a
//! quick-xml event roundtrip. That both normalizes the markup and rejects
//! exports the source truncated or mangled, before they reach the
//! destination's converter.

use quick_xml::events::Event;
use quick_xml::{Reader, Writer};

use eadsync_core::repo::SourceRepository;
use eadsync_core::types::Resource;

use crate::error::NormalizeError;

/// Fetch and normalize one record's EAD export.
///
/// Any transport or parse failure logs at error level and yields `None`;
/// the orchestrator skips the record and the run continues.
pub fn fetch_description(source: &mut dyn SourceRepository, resource: &Resource) -> Option<String> {
    let raw = match source.resource_description(resource.record_id()) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::error!("[source] failed to fetch {}: {err}", resource.uri);
            return None;
        }
    };
    match normalize_ead(&raw) {
        Ok(xml) => Some(xml),
        Err(err) => {
            tracing::error!("[source] unusable EAD export for {}: {err}", resource.uri);
            None
        }
    }
}

/// Event-stream roundtrip: parse the export and write it back out.
pub fn normalize_ead(xml: &str) -> Result<String, NormalizeError> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::new());
    loop {
        match reader.read_event()? {
            Event::Eof => break,
            event => writer.write_event(event)?,
        }
    }
    Ok(String::from_utf8(writer.into_inner())?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
