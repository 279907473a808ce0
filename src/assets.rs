//! Asset bundles compiled into the binary.
//!
//! Both bundles point at the same directory; they differ only in the
//! inclusion pattern applied when the crate is built.

use rust_embed::RustEmbed;

/// `file/sample1.json`, embedded on its own.
pub static SAMPLE1_JSON: &[u8] = include_bytes!("../assets/file/sample1.json");

/// Every file under `assets/file/`, keyed as `file/<name>`.
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/assets/file/"]
#[prefix = "file/"]
pub struct SampleFiles;

/// Only the `*.json` files under `assets/file/`, keyed as `file/<name>`.
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/assets/file/"]
#[prefix = "file/"]
#[include = "*.json"]
pub struct SampleJsonFiles;
