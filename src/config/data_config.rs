//! Data-store connection settings
//!
//! The connection descriptor is read from the environment (with `.env` support)
//! and handed to the driver unparsed; this crate validates nothing beyond what
//! the driver itself rejects.

use std::env;

/// Connection settings for a [`Database`](crate::db::Database).
///
/// # Environment variables
///
/// - `MONGODB_URI` - MongoDB connection URI (default: `mongodb://localhost:27017`)
/// - `DATABASE_NAME` - database to select on that deployment (default: `mongo_data_dev`)
///
/// # Examples
///
/// ```rust,ignore
/// use mongo_data::config::DataConfig;
///
/// let from_env = DataConfig::from_env();
/// let explicit = DataConfig::new("mongodb://localhost:27017", "orders");
/// ```
#[derive(Debug, Clone)]
pub struct DataConfig {
    /// MongoDB connection URI.
    pub connection_uri: String,
    /// Name of the database all repositories built from this handle use.
    pub database_name: String,
    /// Application name reported to the server (useful in server logs).
    pub app_name: Option<String>,
}

impl DataConfig {
    /// Creates settings from explicit values.
    pub fn new(connection_uri: impl Into<String>, database_name: impl Into<String>) -> Self {
        Self {
            connection_uri: connection_uri.into(),
            database_name: database_name.into(),
            app_name: Some("mongo-data".to_string()),
        }
    }

    /// Reads settings from the environment, loading a `.env` file when present.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let connection_uri = env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let database_name =
            env::var("DATABASE_NAME").unwrap_or_else(|_| "mongo_data_dev".to_string());

        Self {
            connection_uri,
            database_name,
            app_name: Some("mongo-data".to_string()),
        }
    }

    /// Overrides the application name reported to the server.
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_settings() {
        let config = DataConfig::new("mongodb://db.internal:27017", "orders");

        assert_eq!(config.connection_uri, "mongodb://db.internal:27017");
        assert_eq!(config.database_name, "orders");
        assert_eq!(config.app_name.as_deref(), Some("mongo-data"));
    }

    #[test]
    fn test_app_name_override() {
        let config = DataConfig::new("mongodb://localhost:27017", "orders")
            .with_app_name("orders-worker");

        assert_eq!(config.app_name.as_deref(), Some("orders-worker"));
    }
}
