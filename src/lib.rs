//! Generic typed repository layer for MongoDB
//!
//! A data-access library shared by unrelated entity types without per-entity
//! boilerplate: one [`Database`](db::Database) handle at process start, one
//! [`BaseRepository`](repositories::BaseRepository) per entity type, and a
//! small store-agnostic query-builder surface in between. Collection names
//! come from declared metadata or the entity-family rule; batch upserts run
//! with bounded concurrency; index creation tolerates empty collections.
//!
//! # Features
//!
//! - **Typed CRUD**: insert, lookup, upsert, delete and paging over a
//!   collection resolved once per entity type
//! - **Entity families**: specialized variants share their root type's
//!   collection unless they declare their own metadata
//! - **Sync and async**: every operation in both forms, with identical
//!   result semantics
//! - **Bounded batch updates**: at most 4 upserts in flight, fail-fast
//! - **Safe index creation**: placeholder insert-and-cleanup on empty
//!   collections
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────┐
//! │      Caller        │
//! └────────────────────┘
//!           │
//!           ▼
//! ┌────────────────────┐     ┌──────────────────────┐
//! │  BaseRepository<T> │ ──▶ │  query builders      │
//! │  (one per entity)  │     │  (filter/update/...) │
//! └────────────────────┘     └──────────────────────┘
//!           │
//!           ▼
//! ┌────────────────────┐
//! │  Database handle   │ ← one per process
//! └────────────────────┘
//!           │
//!           ▼
//! ┌────────────────────┐
//! │      MongoDB       │
//! └────────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use mongo_data::config::DataConfig;
//! use mongo_data::db::Database;
//! use mongo_data::query::field;
//!
//! #[tokio::main]
//! async fn main() -> mongo_data::errors::DataResult<()> {
//!     let database = Database::connect(&DataConfig::from_env()).await?;
//!     let customers = database.repository::<Customer>()?;
//!
//!     let saved = customers.add(Customer::named("Customer A")).await?;
//!     let found = customers.get_by_id(&saved.id().unwrap()).await?;
//!     assert!(found.is_some());
//!
//!     let matching = customers
//!         .count_where(field("first_name").contains("Customer"))
//!         .await?;
//!     println!("{matching} matching customers");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod query;
pub mod repositories;

pub use db::Database;
pub use entities::{Entity, resolve_collection_name};
pub use errors::{DataError, DataResult};
pub use repositories::{BaseRepository, BlockingDatabase, BlockingRepository, Repository};

/// Store-native identity type, re-exported for entity declarations.
pub use mongodb::bson::oid::ObjectId;
