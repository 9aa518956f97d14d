//! Catalog file loading and tree indexing.
//!
//! The catalog is a UTF-8 flat file whose first line announces the record
//! count, followed by one `id;name;price` line per product. Loading
//! returns a plain buffer so the same input sequence can be fed to several
//! trees and their construction compared.

use std::fs;
use std::path::Path;

use arbors::map::OrderedMap;
use tracing::debug;

use crate::domain::{CatalogError, Product};

/// Reads the catalog file into a product buffer.
///
/// # Errors
///
/// Returns [`CatalogError`] when the file cannot be read, the header line
/// is missing or not a number, a record line is malformed, or fewer
/// records are present than the header declares.
pub fn load_products(path: &Path) -> Result<Vec<Product>, CatalogError> {
    let content = fs::read_to_string(path)?;
    let mut lines = content.lines();

    let header = lines.next().ok_or(CatalogError::EmptyFile)?;
    let declared: usize = header
        .trim()
        .parse()
        .map_err(|_| CatalogError::InvalidCount {
            value: header.to_string(),
        })?;

    let mut products = Vec::with_capacity(declared);
    for line in lines.take(declared) {
        products.push(line.parse::<Product>()?);
    }
    if products.len() < declared {
        return Err(CatalogError::TruncatedFile {
            expected: declared,
            found: products.len(),
        });
    }

    debug!(count = products.len(), path = %path.display(), "catalog loaded");
    Ok(products)
}

/// Indexes a product buffer into any [`OrderedMap`] under an extraction
/// rule, one insertion per record in buffer order.
///
/// The map type decides the backing structure, the extraction rule decides
/// the key, and this function stays agnostic of both, which is what lets
/// the menu build by-name and by-id indexes over either tree variant from
/// one buffer.
pub fn index_products<K, M, F>(products: &[Product], mut key_extractor: F) -> M
where
    M: OrderedMap<K, Product> + Default,
    F: FnMut(&Product) -> K,
{
    let mut map = M::default();
    for product in products {
        map.insert(key_extractor(product), product.clone());
    }
    map
}

// =============================================================================
// Tests
// =============================================================================
