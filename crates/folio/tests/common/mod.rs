//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use folio::catalog::{Catalog, Item};

/// Path to the bundled ten-book sample catalog.
pub fn sample_catalog_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join("books-sample.json")
}

/// The sample catalog, decoded.
pub fn sample_catalog() -> Catalog {
    let raw = std::fs::read_to_string(sample_catalog_path()).unwrap();
    let items: Vec<Item> = serde_json::from_str(&raw).unwrap();
    Catalog::new(items)
}

/// `n` generated items cycling through three genres.
pub fn generated_items(n: u64) -> Vec<Item> {
    (1..=n)
        .map(|id| {
            let genre = ["Fantasy", "Classic", "Dystopian"][usize::try_from(id % 3).unwrap()];
            Item::new(id, format!("Book {id}"), format!("Author {}", id % 5), genre)
        })
        .collect()
}
