#![no_main]
use catalog_diff::parsers::{parse_catalog_bytes, CatalogFormat};
use catalog_diff::SchemaGeneration;
use libfuzzer_sys::fuzz_target;

/// Fuzz the PSON parser.
///
/// PSON accepts arbitrary bytes, including invalid UTF-8, so the raw input is
/// fed straight through for both schema generations.
fuzz_target!(|data: &[u8]| {
    let _ = parse_catalog_bytes(data, CatalogFormat::Pson, SchemaGeneration::Current);
    let _ = parse_catalog_bytes(data, CatalogFormat::Pson, SchemaGeneration::Legacy);
});
