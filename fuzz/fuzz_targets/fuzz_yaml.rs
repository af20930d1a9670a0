#![no_main]
use catalog_diff::parsers::{parse_catalog_bytes, CatalogFormat};
use catalog_diff::SchemaGeneration;
use libfuzzer_sys::fuzz_target;

/// Fuzz the YAML parser, including tag stripping of ruby object tags.
fuzz_target!(|data: &[u8]| {
    if std::str::from_utf8(data).is_ok() {
        let _ = parse_catalog_bytes(data, CatalogFormat::Yaml, SchemaGeneration::Legacy);
        let _ = parse_catalog_bytes(data, CatalogFormat::Yaml, SchemaGeneration::Current);
    }
});
