//! Composable projection expressions

use mongodb::bson::Document;

/// Field selection for query results, compiled to a projection document.
#[derive(Debug, Clone, Default)]
pub struct Projection {
    fields: Document,
}

impl Projection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Includes a field in the result documents.
    pub fn include(mut self, field: impl Into<String>) -> Self {
        self.fields.insert(field.into(), 1);
        self
    }

    /// Excludes a field from the result documents.
    pub fn exclude(mut self, field: impl Into<String>) -> Self {
        self.fields.insert(field.into(), 0);
        self
    }

    /// Excludes the `_id` field, which MongoDB otherwise always returns.
    pub fn exclude_id(self) -> Self {
        self.exclude("_id")
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_document(&self) -> Document {
        self.fields.clone()
    }
}

/// Stateless projection accessor scoped to a repository's entity type.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectionBuilder;

impl ProjectionBuilder {
    pub fn include(&self, field: impl Into<String>) -> Projection {
        Projection::new().include(field)
    }

    pub fn exclude(&self, field: impl Into<String>) -> Projection {
        Projection::new().exclude(field)
    }
}
