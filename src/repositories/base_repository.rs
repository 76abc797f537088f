//! Generic repository over one resolved collection
//!
//! [`BaseRepository`] is the per-entity-type facade: CRUD, existence,
//! counting, paging, upsert, index creation and the aggregation surface, all
//! against the single collection resolved for `T` at construction. It is
//! stateless beyond the collection handle and safe for concurrent use; every
//! consistency guarantee comes from MongoDB's per-document atomicity.
//!
//! # Examples
//!
//! ```rust,ignore
//! use mongo_data::db::Database;
//! use mongo_data::query::field;
//!
//! let database = Database::from_env().await?;
//! let customers = database.repository::<Customer>()?;
//!
//! let saved = customers.add(Customer::named("Customer A")).await?;
//! let page = customers
//!     .find_page(field("first_name").contains("Customer"), 0, 20)
//!     .await?;
//! customers.delete_where(field("first_name").contains("Client")).await?;
//! ```

use async_trait::async_trait;
use log::{debug, warn};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document, doc};
use mongodb::{Collection, Cursor, IndexModel};

use futures_util::TryStreamExt;

use crate::db::Database;
use crate::entities::{Entity, resolve_collection_name};
use crate::errors::{DataError, DataResult};
use crate::query::{Filter, FilterBuilder, IndexBuilder, ProjectionBuilder, UpdateBuilder};
use crate::repositories::batch::{self, MAX_CONCURRENT_UPSERTS};
use crate::repositories::queryable::Queryable;
use crate::repositories::repository::Repository;

/// Storage statistics for one collection, from the `collStats` command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionStats {
    /// Total uncompressed size of the documents, in bytes.
    pub data_size: i64,
    /// Allocated storage size, in bytes.
    pub storage_size: i64,
    /// Combined size of all indexes, in bytes.
    pub total_index_size: i64,
    /// Whether the collection is capped.
    pub capped: bool,
}

impl CollectionStats {
    fn from_document(reply: &Document) -> Self {
        Self {
            data_size: numeric(reply, "size"),
            storage_size: numeric(reply, "storageSize"),
            total_index_size: numeric(reply, "totalIndexSize"),
            capped: reply.get_bool("capped").unwrap_or(false),
        }
    }
}

// collStats reports numbers as int32, int64 or double depending on magnitude
// and server version.
fn numeric(document: &Document, key: &str) -> i64 {
    match document.get(key) {
        Some(Bson::Int32(value)) => i64::from(*value),
        Some(Bson::Int64(value)) => *value,
        Some(Bson::Double(value)) => *value as i64,
        _ => 0,
    }
}

/// Validates paging parameters and derives the skip/limit window.
///
/// Page indices are zero-based; `page_size` must be greater than zero.
pub(crate) fn page_window(page_index: u64, page_size: u64) -> DataResult<(u64, i64)> {
    if page_size == 0 {
        return Err(DataError::InvalidArgument(
            "page_size must be greater than zero".to_string(),
        ));
    }

    let skip = page_index.checked_mul(page_size).ok_or_else(|| {
        DataError::InvalidArgument(format!(
            "page window overflows: page_index {page_index} * page_size {page_size}"
        ))
    })?;
    let limit = i64::try_from(page_size).map_err(|_| {
        DataError::InvalidArgument(format!("page_size {page_size} exceeds the supported maximum"))
    })?;

    Ok((skip, limit))
}

/// Typed data-access facade over one MongoDB collection.
///
/// Constructed from a [`Database`] handle; resolves the collection name for
/// `T` exactly once and retains the typed handle. Cloning is cheap and shares
/// the underlying connection.
pub struct BaseRepository<T: Entity> {
    collection: Collection<T>,
    database: mongodb::Database,
    collection_name: String,
}

// Manual impl: the handle clones cheaply regardless of whether T does.
impl<T: Entity> Clone for BaseRepository<T> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            database: self.database.clone(),
            collection_name: self.collection_name.clone(),
        }
    }
}

impl<T: Entity> BaseRepository<T> {
    /// Builds the repository, resolving the entity's collection name.
    ///
    /// # Errors
    ///
    /// [`DataError::InvalidConfiguration`] when the resolved name is empty.
    pub fn new(database: &Database) -> DataResult<Self> {
        let collection_name = resolve_collection_name::<T>()?;
        Ok(Self {
            collection: database.collection::<T>(&collection_name),
            database: database.database(),
            collection_name,
        })
    }

    /// The resolved collection name this repository operates on.
    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    /// The underlying typed collection handle, for advanced driver-level
    /// operations the facade does not cover.
    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }

    fn id_filter(id: &ObjectId) -> Document {
        doc! { "_id": id }
    }

    fn read_error(&self, source: mongodb::error::Error) -> DataError {
        DataError::Read {
            collection: self.collection_name.clone(),
            source,
        }
    }

    fn write_error(&self, source: mongodb::error::Error) -> DataError {
        DataError::Write {
            collection: self.collection_name.clone(),
            source,
        }
    }

    // ---- create ----

    /// Inserts one record and returns it with its identity populated.
    pub async fn add(&self, mut entity: T) -> DataResult<T> {
        let result = self
            .collection
            .insert_one(&entity)
            .await
            .map_err(|e| self.write_error(e))?;

        if entity.id().is_none() {
            if let Bson::ObjectId(id) = result.inserted_id {
                entity.set_id(id);
            }
        }

        Ok(entity)
    }

    /// Inserts many records in one request and returns them with identities
    /// populated. Partial-failure behavior is whatever the store reports; no
    /// client-side rollback is attempted.
    pub async fn add_many(&self, entities: Vec<T>) -> DataResult<Vec<T>> {
        if entities.is_empty() {
            return Ok(entities);
        }

        let mut entities = entities;
        let result = self
            .collection
            .insert_many(&entities)
            .await
            .map_err(|e| self.write_error(e))?;

        for (index, inserted_id) in &result.inserted_ids {
            if let (Some(entity), Bson::ObjectId(id)) = (entities.get_mut(*index), inserted_id) {
                if entity.id().is_none() {
                    entity.set_id(*id);
                }
            }
        }

        Ok(entities)
    }

    // ---- read ----

    /// Returns the record with the given identity, or `None` when no record
    /// matches.
    pub async fn get_by_id(&self, id: &ObjectId) -> DataResult<Option<T>> {
        self.collection
            .find_one(Self::id_filter(id))
            .await
            .map_err(|e| self.read_error(e))
    }

    /// Like [`BaseRepository::get_by_id`] but treats absence as
    /// [`DataError::NotFound`], for call sites where the record must exist.
    pub async fn require_by_id(&self, id: &ObjectId) -> DataResult<T> {
        self.get_by_id(id).await?.ok_or_else(|| {
            DataError::NotFound(format!(
                "no '{}' document with id {}",
                self.collection_name, id
            ))
        })
    }

    /// Returns the first record matching the filter, or `None`.
    pub async fn find_one(&self, filter: Filter) -> DataResult<Option<T>> {
        self.collection
            .find_one(filter.to_document())
            .await
            .map_err(|e| self.read_error(e))
    }

    /// Returns a lazy cursor over every record matching the filter. Result
    /// order follows the store's natural or index order; compose a sort via
    /// [`BaseRepository::queryable`] when ordering matters.
    pub async fn find(&self, filter: Filter) -> DataResult<Cursor<T>> {
        self.collection
            .find(filter.to_document())
            .await
            .map_err(|e| self.read_error(e))
    }

    /// Returns one zero-based page of matching records:
    /// `skip = page_index * page_size`, at most `page_size` results.
    ///
    /// # Errors
    ///
    /// [`DataError::InvalidArgument`] when `page_size` is zero, before any
    /// I/O happens.
    pub async fn find_page(
        &self,
        filter: Filter,
        page_index: u64,
        page_size: u64,
    ) -> DataResult<Cursor<T>> {
        let (skip, limit) = page_window(page_index, page_size)?;
        self.collection
            .find(filter.to_document())
            .skip(skip)
            .limit(limit)
            .await
            .map_err(|e| self.read_error(e))
    }

    /// Collects every record matching the filter into a vector.
    pub async fn find_all(&self, filter: Filter) -> DataResult<Vec<T>> {
        let cursor = self.find(filter).await?;
        self.collect(cursor).await
    }

    pub(crate) async fn collect(&self, cursor: Cursor<T>) -> DataResult<Vec<T>> {
        cursor.try_collect().await.map_err(|e| self.read_error(e))
    }

    // ---- count / existence ----

    /// Exact number of records in the collection (full scan).
    pub async fn count(&self) -> DataResult<u64> {
        self.count_where(Filter::empty()).await
    }

    /// Exact number of records matching the filter.
    pub async fn count_where(&self, filter: Filter) -> DataResult<u64> {
        self.collection
            .count_documents(filter.to_document())
            .await
            .map_err(|e| self.read_error(e))
    }

    /// Store-maintained approximate record count, from collection metadata.
    pub async fn estimated_count(&self) -> DataResult<u64> {
        self.collection
            .estimated_document_count()
            .await
            .map_err(|e| self.read_error(e))
    }

    /// True when the collection holds at least one record.
    pub async fn any(&self) -> DataResult<bool> {
        self.any_where(Filter::empty()).await
    }

    /// True when at least one record matches the filter. Short-circuits via a
    /// limit-1 count and never materializes matches.
    pub async fn any_where(&self, filter: Filter) -> DataResult<bool> {
        let matches = self
            .collection
            .count_documents(filter.to_document())
            .limit(1)
            .await
            .map_err(|e| self.read_error(e))?;
        Ok(matches > 0)
    }

    // ---- update ----

    /// Upserts one record: replaces the document matching the entity's id, or
    /// inserts it when no document matches. An entity without an id is routed
    /// to [`BaseRepository::add`] so the store can assign one; replacing
    /// against a null id would create a document no id lookup can reach.
    pub async fn update(&self, entity: T) -> DataResult<T> {
        let id = match entity.id() {
            Some(id) => id,
            None => return self.add(entity).await,
        };

        self.collection
            .replace_one(Self::id_filter(&id), &entity)
            .upsert(true)
            .await
            .map_err(|e| self.write_error(e))?;

        Ok(entity)
    }

    /// Upserts every entity independently with at most
    /// [`MAX_CONCURRENT_UPSERTS`] operations in flight. No cross-document
    /// atomicity; the first member failure fails the whole batch with no
    /// per-item reporting.
    pub async fn update_many(&self, entities: Vec<T>) -> DataResult<()> {
        batch::for_each_bounded(entities, MAX_CONCURRENT_UPSERTS, |entity| async move {
            self.update(entity).await.map(|_| ())
        })
        .await
        .map_err(|e| {
            warn!(
                "batch update failed on collection '{}': {e}",
                self.collection_name
            );
            DataError::BatchFailure(Box::new(e))
        })
    }

    // ---- delete ----

    /// Deletes the record with the given identity. Deleting a missing id is a
    /// no-op; returns the number of documents removed (0 or 1).
    pub async fn delete_by_id(&self, id: &ObjectId) -> DataResult<u64> {
        self.collection
            .delete_one(Self::id_filter(id))
            .await
            .map(|r| r.deleted_count)
            .map_err(|e| self.write_error(e))
    }

    /// Deletes the given entity by its identity. An entity that was never
    /// persisted (no id) deletes nothing.
    pub async fn delete(&self, entity: &T) -> DataResult<u64> {
        match entity.id() {
            Some(id) => self.delete_by_id(&id).await,
            None => Ok(0),
        }
    }

    /// Deletes every record matching the filter, returning the removed count.
    pub async fn delete_where(&self, filter: Filter) -> DataResult<u64> {
        self.collection
            .delete_many(filter.to_document())
            .await
            .map(|r| r.deleted_count)
            .map_err(|e| self.write_error(e))
    }

    /// Deletes every record in the collection.
    pub async fn delete_all(&self) -> DataResult<u64> {
        self.delete_where(Filter::empty()).await
    }

    /// Irreversibly removes the entire collection, documents and indexes.
    /// Dropping an absent collection is not an error.
    pub async fn drop_collection(&self) -> DataResult<()> {
        self.collection
            .drop()
            .await
            .map_err(|e| self.write_error(e))
    }

    // ---- builders / query surface ----

    /// Filter expression builder scoped to this entity type.
    pub fn filter(&self) -> FilterBuilder {
        FilterBuilder
    }

    /// Update expression builder scoped to this entity type.
    pub fn updater(&self) -> UpdateBuilder {
        UpdateBuilder
    }

    /// Projection expression builder scoped to this entity type.
    pub fn projector(&self) -> ProjectionBuilder {
        ProjectionBuilder
    }

    /// Index-key expression builder scoped to this entity type.
    pub fn indexer(&self) -> IndexBuilder {
        IndexBuilder
    }

    /// The full record set as a lazy, composable aggregation pipeline.
    pub fn queryable(&self) -> Queryable<T> {
        Queryable::new(self.collection.clone(), self.collection_name.clone(), false)
    }

    /// Like [`BaseRepository::queryable`], but allows the server to spill
    /// aggregation stages to temporary disk files for large data sets.
    pub fn queryable_large_data_set(&self) -> Queryable<T> {
        Queryable::new(self.collection.clone(), self.collection_name.clone(), true)
    }

    // ---- administration ----

    /// Storage statistics for this collection.
    pub async fn stats(&self) -> DataResult<CollectionStats> {
        let reply = self
            .database
            .run_command(doc! { "collStats": &self.collection_name })
            .await
            .map_err(|e| self.read_error(e))?;
        Ok(CollectionStats::from_document(&reply))
    }

    /// Creates an index from an explicit model, returning the index name.
    pub async fn create_index(&self, model: IndexModel) -> DataResult<String> {
        self.collection
            .create_index(model)
            .await
            .map(|r| r.index_name)
            .map_err(|e| self.write_error(e))
    }
}

impl<T: Entity + Default> BaseRepository<T> {
    /// Creates an ascending index on the given field, tolerating an empty
    /// collection.
    ///
    /// Index creation against an empty collection can hide store-side
    /// restrictions that only surface on insert, so an empty collection first
    /// receives a default-constructed placeholder record. The placeholder is
    /// removed on every exit path; an index-creation failure still propagates
    /// after cleanup and is never masked by a cleanup failure.
    pub async fn create_index_ascending(&self, field: &str) -> DataResult<String> {
        let placeholder = if self.any().await? {
            None
        } else {
            debug!(
                "inserting index placeholder into empty collection '{}'",
                self.collection_name
            );
            Some(self.add(T::default()).await?)
        };

        let created = self
            .collection
            .create_index(self.indexer().ascending(field).to_model())
            .await;

        if let Some(placeholder) = placeholder {
            if let Some(id) = placeholder.id() {
                if let Err(cleanup) = self.delete_by_id(&id).await {
                    warn!(
                        "failed to remove index placeholder {id} from '{}': {cleanup}",
                        self.collection_name
                    );
                    if created.is_ok() {
                        return Err(cleanup);
                    }
                }
            }
        }

        created
            .map(|r| r.index_name)
            .map_err(|e| self.write_error(e))
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for BaseRepository<T> {
    async fn add(&self, entity: T) -> DataResult<T> {
        BaseRepository::add(self, entity).await
    }

    async fn get_by_id(&self, id: &ObjectId) -> DataResult<Option<T>> {
        BaseRepository::get_by_id(self, id).await
    }

    async fn update(&self, entity: T) -> DataResult<T> {
        BaseRepository::update(self, entity).await
    }

    async fn delete_by_id(&self, id: &ObjectId) -> DataResult<u64> {
        BaseRepository::delete_by_id(self, id).await
    }

    async fn count(&self) -> DataResult<u64> {
        BaseRepository::count(self).await
    }

    async fn any(&self) -> DataResult<bool> {
        BaseRepository::any(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_window_zero_size_is_rejected() {
        let error = page_window(0, 0).unwrap_err();
        assert!(matches!(error, DataError::InvalidArgument(_)));
    }

    #[test]
    fn test_page_window_is_zero_based() {
        assert_eq!(page_window(0, 25).unwrap(), (0, 25));
        assert_eq!(page_window(3, 25).unwrap(), (75, 25));
    }

    #[test]
    fn test_page_window_overflow_is_an_argument_error() {
        let error = page_window(u64::MAX, 2).unwrap_err();
        assert!(matches!(error, DataError::InvalidArgument(_)));
    }

    #[test]
    fn test_collection_stats_reads_mixed_numeric_types() {
        let reply = doc! {
            "size": 1024i32,
            "storageSize": 4096i64,
            "totalIndexSize": 512.0,
            "capped": false,
        };

        let stats = CollectionStats::from_document(&reply);
        assert_eq!(stats.data_size, 1024);
        assert_eq!(stats.storage_size, 4096);
        assert_eq!(stats.total_index_size, 512);
        assert!(!stats.capped);
    }

    #[test]
    fn test_collection_stats_tolerates_missing_fields() {
        let stats = CollectionStats::from_document(&doc! {});
        assert_eq!(stats, CollectionStats::default());
    }
}
