//! Database connection management
//!
//! [`Database`] is the store handle at the root of the data-store lifetime: it
//! owns one MongoDB client plus a selected database name and hands out typed
//! collection handles. Repositories hold a cheap clone of it (the driver's
//! `Client` is an internally shared handle), so one `Database` created at
//! process start serves every repository built from it.
//!
//! There is deliberately no ambient global connection; the handle is passed
//! explicitly to each repository constructor.
//!
//! # Basic usage
//!
//! ```rust,ignore
//! use mongo_data::config::DataConfig;
//! use mongo_data::db::Database;
//!
//! #[tokio::main]
//! async fn main() -> mongo_data::errors::DataResult<()> {
//!     let database = Database::connect(&DataConfig::from_env()).await?;
//!     let customers = database.repository::<Customer>()?;
//!     Ok(())
//! }
//! ```

use log::info;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};

use crate::config::DataConfig;
use crate::entities::Entity;
use crate::errors::{DataError, DataResult};
use crate::repositories::BaseRepository;

/// MongoDB connection wrapper shared by all repositories.
#[derive(Clone)]
pub struct Database {
    /// MongoDB client instance.
    client: Client,
    /// Name of the selected database.
    database_name: String,
}

impl Database {
    /// Establishes a connection described by `config` and verifies it with a
    /// server ping.
    ///
    /// # Errors
    ///
    /// - [`DataError::InvalidConfiguration`] when the connection URI cannot be
    ///   parsed or the client cannot be constructed from it.
    /// - [`DataError::Read`] when the ping round-trip fails.
    pub async fn connect(config: &DataConfig) -> DataResult<Self> {
        let mut client_options = ClientOptions::parse(&config.connection_uri)
            .await
            .map_err(|e| {
                DataError::InvalidConfiguration(format!("invalid connection URI: {e}"))
            })?;
        client_options.app_name = config.app_name.clone();

        let client = Client::with_options(client_options).map_err(|e| {
            DataError::InvalidConfiguration(format!("failed to build MongoDB client: {e}"))
        })?;

        // Connection test; fails early instead of on the first repository call.
        client
            .database(&config.database_name)
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await
            .map_err(|source| DataError::Read {
                collection: config.database_name.clone(),
                source,
            })?;

        info!("MongoDB connection established: {}", config.database_name);

        Ok(Self {
            client,
            database_name: config.database_name.clone(),
        })
    }

    /// Connects using settings read from the environment.
    pub async fn from_env() -> DataResult<Self> {
        Self::connect(&DataConfig::from_env()).await
    }

    /// Builds a repository for `T` over this handle, resolving the entity's
    /// collection name once.
    pub fn repository<T: Entity>(&self) -> DataResult<BaseRepository<T>> {
        BaseRepository::new(self)
    }

    /// Returns the selected `mongodb::Database` instance.
    pub fn database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    /// Returns a typed collection handle inside the selected database.
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.database().collection::<T>(name)
    }

    /// Returns the underlying client for advanced, client-level operations
    /// (sessions, server administration).
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Returns the selected database name.
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Irreversibly drops the entire selected database. Used by test scopes
    /// that create a throwaway database per run.
    pub async fn drop_database(&self) -> DataResult<()> {
        self.database()
            .drop()
            .await
            .map_err(|source| DataError::Write {
                collection: self.database_name.clone(),
                source,
            })?;
        info!("dropped database: {}", self.database_name);
        Ok(())
    }
}
