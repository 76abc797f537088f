//! Entity contract and collection-name resolution
//!
//! Every persisted type implements [`Entity`]: an optional, store-assigned
//! `ObjectId` identity plus optional declared collection metadata. The
//! [`resolve_collection_name`] function turns an entity type into the logical
//! collection name it is stored under; a repository calls it exactly once at
//! construction and caches the result.
//!
//! # Declaring an entity
//!
//! ```rust,ignore
//! use mongo_data::entities::Entity;
//! use mongo_data::ObjectId;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! struct Customer {
//!     #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
//!     id: Option<ObjectId>,
//!     name: String,
//! }
//!
//! impl Entity for Customer {
//!     // explicit collection metadata; omit it to fall back to the type name
//!     const COLLECTION: Option<&'static str> = Some("Customers");
//!
//!     fn id(&self) -> Option<ObjectId> {
//!         self.id
//!     }
//!
//!     fn set_id(&mut self, id: ObjectId) {
//!         self.id = Some(id);
//!     }
//! }
//! ```
//!
//! # Entity families
//!
//! A specialized variant of an entity is stored in the *same* collection as
//! the root type of its family unless it declares its own `COLLECTION`. The
//! variant opts in by delegating [`Entity::family_name`] to the root:
//!
//! ```rust,ignore
//! impl Entity for VipCustomer {
//!     fn family_name() -> &'static str {
//!         Customer::family_name()
//!     }
//!     // id accessors elided
//! }
//! ```

use log::debug;
use mongodb::bson::oid::ObjectId;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::errors::{DataError, DataResult};

/// The minimal shape every stored record must satisfy.
///
/// The identity is `None` before first persistence; the store assigns one on
/// insert, or the caller supplies one for deterministic identities. Once
/// persisted the identity is immutable and unique within its collection.
///
/// The serde bounds exist because the driver serializes entities to BSON on
/// the way in and back out; the conventional mapping for the identity field is
/// `#[serde(rename = "_id", skip_serializing_if = "Option::is_none")]`.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + Unpin + 'static {
    /// Explicit collection metadata. Always wins over [`Entity::family_name`]
    /// when present; an empty value is rejected at resolution time.
    const COLLECTION: Option<&'static str> = None;

    /// Returns the store identity, if the record has been persisted or the
    /// caller assigned one.
    fn id(&self) -> Option<ObjectId>;

    /// Assigns the store identity. Called by the repository after an insert
    /// when the store generated the id.
    fn set_id(&mut self, id: ObjectId);

    /// Name of the entity family this type belongs to.
    ///
    /// Defaults to the type's own simple name. A specialized variant that
    /// should share its root type's collection overrides this to delegate to
    /// the root; declaring [`Entity::COLLECTION`] is the only other way for a
    /// variant to get a collection of its own.
    fn family_name() -> &'static str
    where
        Self: Sized,
    {
        simple_type_name::<Self>()
    }
}

/// Resolves the logical collection name for an entity type.
///
/// Deterministic: the same type resolves to the same name on every call.
///
/// 1. Declared [`Entity::COLLECTION`] metadata, when present.
/// 2. Otherwise the type's [`Entity::family_name`], which is the type's own
///    simple name unless the type delegates to an entity-family root.
///
/// # Errors
///
/// [`DataError::InvalidConfiguration`] when the computed name is empty.
pub fn resolve_collection_name<T: Entity>() -> DataResult<String> {
    let name = match T::COLLECTION {
        Some(declared) => declared,
        None => T::family_name(),
    };

    if name.trim().is_empty() {
        return Err(DataError::InvalidConfiguration(format!(
            "collection name cannot be empty for entity type `{}`",
            std::any::type_name::<T>()
        )));
    }

    debug!(
        "resolved collection '{}' for entity type `{}`",
        name,
        std::any::type_name::<T>()
    );

    Ok(name.to_string())
}

/// Last path segment of a type name, e.g. `crate::orders::Order` -> `Order`.
/// Generic parameters are trimmed first so `Envelope<Order>` -> `Envelope`.
fn simple_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
