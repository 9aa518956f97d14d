//! Catalog sample application library.
//!
//! A small product-inventory system built on the `arbors` tree maps,
//! mirroring the workloads the library exists to compare: the same catalog
//! is indexed by name or by numeric id, into the unbalanced or the
//! balanced variant, and the two are timed side by side.
//!
//! The binary in `main.rs` wraps these modules in a console menu; the
//! modules themselves are plain, testable building blocks:
//!
//! - [`domain`]: the `Product` record parsed from catalog lines and the
//!   `Supplier` with sequential document issuance
//! - [`loader`]: flat-file catalog reading and tree indexing
//! - [`config`]: environment-based configuration

pub mod config;
pub mod domain;
pub mod loader;

pub use config::AppConfig;
pub use domain::{CatalogError, Product, Supplier};
pub use loader::{index_products, load_products};
