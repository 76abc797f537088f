//! Blocking facade over the async repository
//!
//! Every operation has a blocking form with result semantics identical to its
//! async counterpart. The facade parks the calling thread on a lazily-started
//! shared runtime for the duration of each store round-trip, the same bridge
//! design the driver's own synchronous API uses.
//!
//! Must not be called from inside an async context; blocking callers only.
//!
//! # Examples
//!
//! ```rust,ignore
//! use mongo_data::config::DataConfig;
//! use mongo_data::repositories::blocking::BlockingDatabase;
//!
//! fn main() -> mongo_data::errors::DataResult<()> {
//!     let database = BlockingDatabase::connect(&DataConfig::from_env())?;
//!     let customers = database.repository::<Customer>()?;
//!
//!     let saved = customers.add(Customer::named("Customer A"))?;
//!     assert!(customers.get_by_id(&saved.id().unwrap())?.is_some());
//!     Ok(())
//! }
//! ```

use once_cell::sync::Lazy;
use tokio::runtime::Runtime;

use mongodb::bson::oid::ObjectId;
use mongodb::IndexModel;

use crate::config::DataConfig;
use crate::db::Database;
use crate::entities::Entity;
use crate::errors::DataResult;
use crate::query::{Filter, FilterBuilder, IndexBuilder, ProjectionBuilder, UpdateBuilder};
use crate::repositories::base_repository::{BaseRepository, CollectionStats};

// Shared bridge runtime for all blocking calls. Started on first use and kept
// for the life of the process.
static RUNTIME: Lazy<Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("mongo-data-blocking")
        .build()
        .expect("failed to start the blocking bridge runtime")
});

/// Blocking counterpart of [`Database`].
#[derive(Clone)]
pub struct BlockingDatabase {
    inner: Database,
}

impl BlockingDatabase {
    /// Establishes and ping-verifies a connection, blocking until done.
    pub fn connect(config: &DataConfig) -> DataResult<Self> {
        let inner = RUNTIME.block_on(Database::connect(config))?;
        Ok(Self { inner })
    }

    /// Connects using settings read from the environment.
    pub fn from_env() -> DataResult<Self> {
        Self::connect(&DataConfig::from_env())
    }

    /// Builds a blocking repository for `T` over this handle.
    pub fn repository<T: Entity>(&self) -> DataResult<BlockingRepository<T>> {
        Ok(BlockingRepository {
            inner: self.inner.repository::<T>()?,
        })
    }

    /// The async handle this facade wraps.
    pub fn as_async(&self) -> &Database {
        &self.inner
    }

    /// Selected database name.
    pub fn database_name(&self) -> &str {
        self.inner.database_name()
    }

    /// Irreversibly drops the entire selected database.
    pub fn drop_database(&self) -> DataResult<()> {
        RUNTIME.block_on(self.inner.drop_database())
    }
}

/// Blocking counterpart of [`BaseRepository`]. Lazy cursors become eager
/// vectors here; restart a query by re-issuing it.
pub struct BlockingRepository<T: Entity> {
    inner: BaseRepository<T>,
}

impl<T: Entity> Clone for BlockingRepository<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Entity> BlockingRepository<T> {
    /// The resolved collection name this repository operates on.
    pub fn collection_name(&self) -> &str {
        self.inner.collection_name()
    }

    /// The async repository this facade wraps.
    pub fn as_async(&self) -> &BaseRepository<T> {
        &self.inner
    }

    pub fn add(&self, entity: T) -> DataResult<T> {
        RUNTIME.block_on(self.inner.add(entity))
    }

    pub fn add_many(&self, entities: Vec<T>) -> DataResult<Vec<T>> {
        RUNTIME.block_on(self.inner.add_many(entities))
    }

    pub fn get_by_id(&self, id: &ObjectId) -> DataResult<Option<T>> {
        RUNTIME.block_on(self.inner.get_by_id(id))
    }

    pub fn require_by_id(&self, id: &ObjectId) -> DataResult<T> {
        RUNTIME.block_on(self.inner.require_by_id(id))
    }

    pub fn find_one(&self, filter: Filter) -> DataResult<Option<T>> {
        RUNTIME.block_on(self.inner.find_one(filter))
    }

    pub fn find(&self, filter: Filter) -> DataResult<Vec<T>> {
        RUNTIME.block_on(self.inner.find_all(filter))
    }

    pub fn find_page(&self, filter: Filter, page_index: u64, page_size: u64) -> DataResult<Vec<T>> {
        RUNTIME.block_on(async {
            let cursor = self.inner.find_page(filter, page_index, page_size).await?;
            self.inner.collect(cursor).await
        })
    }

    pub fn count(&self) -> DataResult<u64> {
        RUNTIME.block_on(self.inner.count())
    }

    pub fn count_where(&self, filter: Filter) -> DataResult<u64> {
        RUNTIME.block_on(self.inner.count_where(filter))
    }

    pub fn estimated_count(&self) -> DataResult<u64> {
        RUNTIME.block_on(self.inner.estimated_count())
    }

    pub fn any(&self) -> DataResult<bool> {
        RUNTIME.block_on(self.inner.any())
    }

    pub fn any_where(&self, filter: Filter) -> DataResult<bool> {
        RUNTIME.block_on(self.inner.any_where(filter))
    }

    /// Upsert; same routing rule as the async form (no id → insert).
    pub fn update(&self, entity: T) -> DataResult<T> {
        RUNTIME.block_on(self.inner.update(entity))
    }

    /// Bounded-concurrency batch upsert; same semantics as the async form.
    pub fn update_many(&self, entities: Vec<T>) -> DataResult<()> {
        RUNTIME.block_on(self.inner.update_many(entities))
    }

    pub fn delete_by_id(&self, id: &ObjectId) -> DataResult<u64> {
        RUNTIME.block_on(self.inner.delete_by_id(id))
    }

    pub fn delete(&self, entity: &T) -> DataResult<u64> {
        RUNTIME.block_on(self.inner.delete(entity))
    }

    pub fn delete_where(&self, filter: Filter) -> DataResult<u64> {
        RUNTIME.block_on(self.inner.delete_where(filter))
    }

    pub fn delete_all(&self) -> DataResult<u64> {
        RUNTIME.block_on(self.inner.delete_all())
    }

    pub fn drop_collection(&self) -> DataResult<()> {
        RUNTIME.block_on(self.inner.drop_collection())
    }

    pub fn filter(&self) -> FilterBuilder {
        self.inner.filter()
    }

    pub fn updater(&self) -> UpdateBuilder {
        self.inner.updater()
    }

    pub fn projector(&self) -> ProjectionBuilder {
        self.inner.projector()
    }

    pub fn indexer(&self) -> IndexBuilder {
        self.inner.indexer()
    }

    pub fn stats(&self) -> DataResult<CollectionStats> {
        RUNTIME.block_on(self.inner.stats())
    }

    pub fn create_index(&self, model: IndexModel) -> DataResult<String> {
        RUNTIME.block_on(self.inner.create_index(model))
    }
}

impl<T: Entity + Default> BlockingRepository<T> {
    /// Ascending-index creation with the same placeholder handling as the
    /// async form.
    pub fn create_index_ascending(&self, field: &str) -> DataResult<String> {
        RUNTIME.block_on(self.inner.create_index_ascending(field))
    }
}
