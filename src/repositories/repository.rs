//! Core repository contract
//!
//! The trait covers the CRUD surface shared by every repository
//! implementation, giving services a seam to mock in tests.
//! [`BaseRepository`](crate::repositories::BaseRepository) is the stock
//! implementation; the full surface (paging, builders, aggregation, index
//! management) lives there as inherent methods.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::entities::Entity;
use crate::errors::DataResult;

/// Typed CRUD contract over one resolved collection.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Inserts one record, assigning its id when the store generates one.
    async fn add(&self, entity: T) -> DataResult<T>;

    /// Returns the record with the given identity, or `None`.
    async fn get_by_id(&self, id: &ObjectId) -> DataResult<Option<T>>;

    /// Upserts one record: replaces the document matching its id, inserting
    /// when absent. An entity without an id is routed to [`Repository::add`].
    async fn update(&self, entity: T) -> DataResult<T>;

    /// Deletes the record with the given identity; deleting a missing id is a
    /// no-op. Returns the number of documents removed (0 or 1).
    async fn delete_by_id(&self, id: &ObjectId) -> DataResult<u64>;

    /// Exact number of records in the collection.
    async fn count(&self) -> DataResult<u64>;

    /// True when the collection holds at least one record.
    async fn any(&self) -> DataResult<bool>;
}
