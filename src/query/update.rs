//! Composable update expressions
//!
//! An [`Update`] accumulates field mutations and compiles them into a MongoDB
//! update document (`$set` / `$unset` / `$inc`) at dispatch time. Used with
//! [`delete_where`](crate::repositories::BaseRepository::delete_where)-style
//! targeted operations and the aggregation surface; whole-entity upserts go
//! through `replace_one` and do not need one.

use mongodb::bson::{Bson, Document, doc};

/// A compiled-on-demand update specification.
#[derive(Debug, Clone, Default)]
pub struct Update {
    set: Document,
    unset: Document,
    inc: Document,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field to a value.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.set.insert(field.into(), value.into());
        self
    }

    /// Removes a field from matching documents.
    pub fn unset(mut self, field: impl Into<String>) -> Self {
        self.unset.insert(field.into(), Bson::String(String::new()));
        self
    }

    /// Increments a numeric field.
    pub fn inc(mut self, field: impl Into<String>, amount: i64) -> Self {
        self.inc.insert(field.into(), amount);
        self
    }

    /// True when no mutation has been recorded.
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.unset.is_empty() && self.inc.is_empty()
    }

    /// Compiles the accumulated mutations into an update document.
    pub fn to_document(&self) -> Document {
        let mut update = doc! {};
        if !self.set.is_empty() {
            update.insert("$set", self.set.clone());
        }
        if !self.unset.is_empty() {
            update.insert("$unset", self.unset.clone());
        }
        if !self.inc.is_empty() {
            update.insert("$inc", self.inc.clone());
        }
        update
    }
}

/// Stateless update accessor scoped to a repository's entity type.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateBuilder;

impl UpdateBuilder {
    pub fn set(&self, field: impl Into<String>, value: impl Into<Bson>) -> Update {
        Update::new().set(field, value)
    }

    pub fn unset(&self, field: impl Into<String>) -> Update {
        Update::new().unset(field)
    }

    pub fn inc(&self, field: impl Into<String>, amount: i64) -> Update {
        Update::new().inc(field, amount)
    }
}
