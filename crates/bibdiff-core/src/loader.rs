//! Reading source documents from disk
//!
//! A source that cannot be read becomes an empty collection in its slot, so
//! one bad file never removes a column or blocks the other sources.

use tracing::{info, warn};

use crate::comparison::parse_collection;
use crate::config::{BibdiffConfig, SourceConfig, TitlePolicy};
use crate::error::LoadError;
use crate::record::SourceCollection;

/// Decode file bytes: UTF-8 when valid, Windows-1252 otherwise.
///
/// A leading byte-order mark is dropped.
pub fn decode_bytes(bytes: &[u8]) -> String {
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        // Latin-1 exports from Windows tools; 0x80-0x9F hold quotes and dashes
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    };

    match text.strip_prefix('\u{FEFF}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

/// Read, decode, parse and normalize one source
pub fn try_load_source(
    source: &SourceConfig,
    policy: &TitlePolicy,
) -> Result<SourceCollection, LoadError> {
    let bytes = std::fs::read(&source.path).map_err(|err| LoadError::Io {
        name: source.name.clone(),
        path: source.path.clone(),
        source: err,
    })?;

    let collection = parse_collection(&source.name, &decode_bytes(&bytes), policy);
    info!(
        source = %source.name,
        path = %source.path.display(),
        records = collection.len(),
        "loaded source"
    );
    Ok(collection)
}

/// Like [`try_load_source`], with a failure logged and turned into an empty
/// collection.
pub fn load_source(source: &SourceConfig, policy: &TitlePolicy) -> SourceCollection {
    try_load_source(source, policy).unwrap_or_else(|err| {
        warn!(source = %source.name, error = %err, "source unavailable");
        SourceCollection::empty(&source.name)
    })
}

/// One collection per configured source, in configured order
pub fn load_sources(config: &BibdiffConfig) -> Vec<SourceCollection> {
    config
        .sources
        .iter()
        .map(|source| load_source(source, &config.title))
        .collect()
}
