//! Data-access layer: generic repositories over MongoDB
//!
//! One [`BaseRepository`] per entity type, constructed from a shared
//! [`Database`](crate::db::Database) handle. Each repository resolves its
//! collection name once, then exposes CRUD, existence, counting, paging,
//! bounded batch upserts, index management and an aggregation surface. The
//! [`blocking`] module provides the same operations for synchronous callers.
//!
//! # Examples
//!
//! ```rust,ignore
//! use mongo_data::db::Database;
//!
//! let database = Database::from_env().await?;
//! let products = database.repository::<Product>()?;
//! let saved = products.add(Product::named("widget")).await?;
//! ```

pub mod base_repository;
pub mod batch;
pub mod blocking;
pub mod queryable;
pub mod repository;

pub use base_repository::{BaseRepository, CollectionStats};
pub use batch::{MAX_CONCURRENT_UPSERTS, for_each_bounded};
pub use blocking::{BlockingDatabase, BlockingRepository};
pub use queryable::Queryable;
pub use repository::Repository;
