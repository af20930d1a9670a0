#![no_main]
use catalog_diff::parsers::{parse_catalog_bytes, CatalogFormat};
use catalog_diff::SchemaGeneration;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = parse_catalog_bytes(data, CatalogFormat::Marshal, SchemaGeneration::Legacy);
});
