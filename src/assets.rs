//! Embedded canonical collectors.
//!
//! The authority ships its canonical collector set compiled into the binary
//! via `include_dir!` over `assets/collectors/`. The publisher iterates this
//! bundle to decide what to materialize, so the published set always matches
//! what was built.

use include_dir::{include_dir, Dir};

use crate::error::FactsError;

static COLLECTOR_ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets/collectors");

/// Raw bytes of a bundled collector, keyed by collector name.
pub fn collector_asset(name: &str) -> Result<&'static [u8], FactsError> {
    COLLECTOR_ASSETS
        .get_file(name)
        .map(|f| f.contents())
        .ok_or_else(|| FactsError::AssetMissing {
            name: name.to_string(),
        })
}

/// Names of every collector in the bundle.
pub fn collector_names() -> Vec<&'static str> {
    COLLECTOR_ASSETS
        .files()
        .filter_map(|f| f.path().file_name().and_then(|n| n.to_str()))
        .collect()
}
