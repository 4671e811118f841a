//! Test fixture loading utilities

use std::path::PathBuf;

use bibdiff_core::{BibdiffConfig, SourceConfig};

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Configuration over the three exported sources, in column order
pub fn sources_config() -> BibdiffConfig {
    let mut config = BibdiffConfig::new();
    for name in ["ads", "orcid", "scholar"] {
        config.sources.push(SourceConfig::new(
            name,
            fixture_path(&format!("sources/{}.bib", name)),
        ));
    }
    config
}
