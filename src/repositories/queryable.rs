//! Lazy aggregation surface over one collection
//!
//! [`Queryable`] exposes the full record set as a composable pipeline that the
//! store evaluates. Built via
//! [`BaseRepository::queryable`](crate::repositories::BaseRepository::queryable)
//! or [`queryable_large_data_set`](crate::repositories::BaseRepository::queryable_large_data_set);
//! the latter lets the server spill aggregation stages to temporary disk files
//! instead of requiring the working set to fit in memory.

use mongodb::bson::{Document, doc, from_document};
use mongodb::{Collection, Cursor};

use futures_util::TryStreamExt;

use crate::entities::Entity;
use crate::errors::{DataError, DataResult};
use crate::query::{Filter, Projection};

/// A lazily-composed aggregation pipeline. No I/O happens until
/// [`Queryable::run`] or [`Queryable::collect_entities`].
pub struct Queryable<T: Entity> {
    collection: Collection<T>,
    collection_name: String,
    pipeline: Vec<Document>,
    allow_disk_use: bool,
}

impl<T: Entity> Clone for Queryable<T> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            collection_name: self.collection_name.clone(),
            pipeline: self.pipeline.clone(),
            allow_disk_use: self.allow_disk_use,
        }
    }
}

impl<T: Entity> Queryable<T> {
    pub(crate) fn new(
        collection: Collection<T>,
        collection_name: String,
        allow_disk_use: bool,
    ) -> Self {
        Self {
            collection,
            collection_name,
            pipeline: Vec::new(),
            allow_disk_use,
        }
    }

    /// Appends a `$match` stage.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.pipeline.push(doc! { "$match": filter.to_document() });
        self
    }

    /// Appends a `$sort` stage, e.g. `doc! { "name": 1 }`.
    pub fn sort(mut self, keys: Document) -> Self {
        self.pipeline.push(doc! { "$sort": keys });
        self
    }

    /// Appends a `$skip` stage.
    pub fn skip(mut self, count: u64) -> Self {
        self.pipeline.push(doc! { "$skip": count as i64 });
        self
    }

    /// Appends a `$limit` stage.
    pub fn limit(mut self, count: i64) -> Self {
        self.pipeline.push(doc! { "$limit": count });
        self
    }

    /// Appends a `$project` stage.
    pub fn project(mut self, projection: Projection) -> Self {
        self.pipeline
            .push(doc! { "$project": projection.to_document() });
        self
    }

    /// Appends a raw pipeline stage for operators without a builder method.
    pub fn stage(mut self, stage: Document) -> Self {
        self.pipeline.push(stage);
        self
    }

    /// Dispatches the pipeline, returning a lazy cursor of raw documents.
    pub async fn run(self) -> DataResult<Cursor<Document>> {
        let collection_name = self.collection_name;
        let operation = self.collection.aggregate(self.pipeline);
        let operation = if self.allow_disk_use {
            operation.allow_disk_use(true)
        } else {
            operation
        };

        operation.await.map_err(|source| DataError::Read {
            collection: collection_name,
            source,
        })
    }

    /// Dispatches the pipeline and deserializes every result back into the
    /// entity type. Only valid while the pipeline preserves the entity shape.
    pub async fn collect_entities(self) -> DataResult<Vec<T>> {
        let collection_name = self.collection_name.clone();
        let documents: Vec<Document> =
            self.run().await?.try_collect().await.map_err(|source| {
                DataError::Read {
                    collection: collection_name.clone(),
                    source,
                }
            })?;

        documents
            .into_iter()
            .map(|document| {
                from_document(document).map_err(|e| DataError::Read {
                    collection: collection_name.clone(),
                    source: e.into(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::field;

    // Pipeline composition is pure; only `run` touches the store.
    fn pipeline_of<T: Entity>(queryable: &Queryable<T>) -> &[Document] {
        &queryable.pipeline
    }

    #[derive(Debug, serde::Serialize, serde::Deserialize)]
    struct Sample {
        #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
        id: Option<mongodb::bson::oid::ObjectId>,
    }

    impl Entity for Sample {
        fn id(&self) -> Option<mongodb::bson::oid::ObjectId> {
            self.id
        }

        fn set_id(&mut self, id: mongodb::bson::oid::ObjectId) {
            self.id = Some(id);
        }
    }

    fn sample_queryable(allow_disk_use: bool) -> Queryable<Sample> {
        // A handle needs no live server until a query is dispatched.
        let options = mongodb::options::ClientOptions::builder()
            .hosts(vec![mongodb::options::ServerAddress::Tcp {
                host: "localhost".to_string(),
                port: Some(27017),
            }])
            .build();
        let collection = mongodb::Client::with_options(options)
            .expect("static client options are valid")
            .database("queryable_tests")
            .collection::<Sample>("Sample");
        Queryable::new(collection, "Sample".to_string(), allow_disk_use)
    }

    // Client construction spawns driver tasks, so even these no-I/O tests
    // need a runtime.
    #[tokio::test]
    async fn test_stage_order_matches_call_order() {
        let queryable = sample_queryable(false)
            .filter(field("status").eq("open"))
            .sort(doc! { "name": 1 })
            .skip(10)
            .limit(5);

        let stages = pipeline_of(&queryable);
        assert_eq!(stages.len(), 4);
        assert!(stages[0].contains_key("$match"));
        assert!(stages[1].contains_key("$sort"));
        assert_eq!(stages[2], doc! { "$skip": 10i64 });
        assert_eq!(stages[3], doc! { "$limit": 5i64 });
    }

    #[tokio::test]
    async fn test_large_data_set_flag_is_retained() {
        assert!(sample_queryable(true).allow_disk_use);
        assert!(!sample_queryable(false).allow_disk_use);
    }
}
