//! Catalog domain records.
//!
//! This module provides the [`Product`] record parsed from catalog file
//! lines and the [`Supplier`] record with process-wide sequential document
//! issuance, together with the application error type [`CatalogError`].

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};

use thiserror::Error;

/// Errors raised while loading or manipulating the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read the catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog file has no record-count header line.
    #[error("the catalog file is empty")]
    EmptyFile,

    /// The record-count header line is not a number.
    #[error("invalid record count {value:?}")]
    InvalidCount {
        /// The header line as read from the file.
        value: String,
    },

    /// A record line does not follow the `id;name;price` layout.
    #[error("malformed record {line:?}: {reason}")]
    MalformedRecord {
        /// The offending line.
        line: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The file declares more records than it contains.
    #[error("catalog file declares {expected} records but contains {found}")]
    TruncatedFile {
        /// Records announced by the header line.
        expected: usize,
        /// Records actually present.
        found: usize,
    },

    /// A supplier name must contain at least a first and a last name.
    #[error("a supplier needs at least a first and a last name, got {name:?}")]
    InvalidSupplierName {
        /// The rejected name.
        name: String,
    },
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product, one per line of the catalog file.
///
/// Prices are held in cents so records stay exactly comparable; the
/// [`Display`](fmt::Display) implementation renders them back in decimal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Numeric identifier, the key of the by-id indexes.
    pub id: u32,
    /// Display name, the key of the by-name indexes.
    pub name: String,
    /// Unit price in cents.
    pub price_cents: u64,
}

impl FromStr for Product {
    type Err = CatalogError;

    /// Parses a `id;name;price` catalog line.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: &str| CatalogError::MalformedRecord {
            line: line.to_string(),
            reason: reason.to_string(),
        };

        let mut fields = line.split(';');
        let id_field = fields.next().ok_or_else(|| malformed("missing id"))?;
        let name_field = fields.next().ok_or_else(|| malformed("missing name"))?;
        let price_field = fields.next().ok_or_else(|| malformed("missing price"))?;
        if fields.next().is_some() {
            return Err(malformed("too many fields"));
        }

        let id = id_field
            .trim()
            .parse()
            .map_err(|_| malformed("id is not a number"))?;
        let name = name_field.trim();
        if name.is_empty() {
            return Err(malformed("name is empty"));
        }
        let price_cents = parse_price_cents(price_field.trim())
            .ok_or_else(|| malformed("price is not a decimal amount"))?;

        Ok(Self {
            id,
            name: name.to_string(),
            price_cents,
        })
    }
}

impl fmt::Display for Product {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "#{} {} ({}.{:02})",
            self.id,
            self.name,
            self.price_cents / 100,
            self.price_cents % 100
        )
    }
}

/// Parses a decimal price with up to two fraction digits into cents.
fn parse_price_cents(text: &str) -> Option<u64> {
    let mut parts = text.splitn(2, '.');
    let whole: u64 = parts.next()?.parse().ok()?;
    let cents = match parts.next() {
        None => 0,
        Some(fraction) => match fraction.len() {
            1 => fraction.parse::<u64>().ok()? * 10,
            2 => fraction.parse::<u64>().ok()?,
            _ => return None,
        },
    };
    whole.checked_mul(100)?.checked_add(cents)
}

// =============================================================================
// Supplier
// =============================================================================

/// Document numbers are issued sequentially, starting above 10_000 so they
/// never collide with product ids.
static NEXT_DOCUMENT: AtomicU32 = AtomicU32::new(10_001);

/// A product supplier with a process-unique document number and the
/// history of products it supplies.
#[derive(Debug, Clone)]
pub struct Supplier {
    document: u32,
    name: String,
    products: Vec<Product>,
}

impl Supplier {
    /// Registers a new supplier, issuing the next document number.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidSupplierName`] unless the trimmed
    /// name contains at least two words.
    pub fn new(name: &str) -> Result<Self, CatalogError> {
        let name = name.trim();
        if name.split_whitespace().count() < 2 {
            return Err(CatalogError::InvalidSupplierName {
                name: name.to_string(),
            });
        }
        Ok(Self {
            document: NEXT_DOCUMENT.fetch_add(1, Ordering::Relaxed),
            name: name.to_string(),
            products: Vec::new(),
        })
    }

    /// The supplier's document number.
    #[must_use]
    pub const fn document(&self) -> u32 {
        self.document
    }

    /// The supplier's validated name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Records a product in this supplier's history.
    pub fn add_product(&mut self, product: Product) {
        self.products.push(product);
    }

    /// The products recorded so far, in registration order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

/// Suppliers are identified by document number alone.
impl PartialEq for Supplier {
    fn eq(&self, other: &Self) -> bool {
        self.document == other.document
    }
}

impl Eq for Supplier {}

impl std::hash::Hash for Supplier {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.document.hash(state);
    }
}

impl fmt::Display for Supplier {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(formatter, "Supplier: {} (document {})", self.name, self.document)?;
        writeln!(formatter, "Products supplied: {}", self.products.len())?;
        for product in &self.products {
            writeln!(formatter, "  * {product}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
