//! Application configuration management.
//!
//! Configuration is loaded once at startup from environment variables,
//! with working defaults for every value so the sample runs out of the
//! box.

use std::env;
use std::path::PathBuf;

/// Application configuration.
///
/// # Environment Variables
///
/// - `CATALOG_DATA_PATH`: path of the catalog flat file
///   (optional, default: `data/products.txt`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Path of the catalog flat file.
    pub data_path: PathBuf,
}

impl AppConfig {
    /// Loads configuration from environment variables, falling back to
    /// the defaults for anything unset.
    #[must_use]
    pub fn from_env() -> Self {
        let data_path = env::var("CATALOG_DATA_PATH")
            .map_or_else(|_| PathBuf::from("data/products.txt"), PathBuf::from);
        Self { data_path }
    }
}
