//! Composable index-key expressions

use mongodb::IndexModel;
use mongodb::bson::Document;
use mongodb::options::IndexOptions;

/// Index key specification, compiled to an [`IndexModel`] at creation time.
#[derive(Debug, Clone, Default)]
pub struct IndexKeys {
    keys: Document,
    unique: bool,
}

impl IndexKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an ascending key on the given field.
    pub fn ascending(mut self, field: impl Into<String>) -> Self {
        self.keys.insert(field.into(), 1);
        self
    }

    /// Adds a descending key on the given field.
    pub fn descending(mut self, field: impl Into<String>) -> Self {
        self.keys.insert(field.into(), -1);
        self
    }

    /// Marks the index as unique.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn to_document(&self) -> Document {
        self.keys.clone()
    }

    /// Compiles the specification into a driver index model.
    pub fn to_model(&self) -> IndexModel {
        if self.unique {
            IndexModel::builder()
                .keys(self.keys.clone())
                .options(IndexOptions::builder().unique(true).build())
                .build()
        } else {
            IndexModel::builder().keys(self.keys.clone()).build()
        }
    }
}

/// Stateless index-key accessor scoped to a repository's entity type.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexBuilder;

impl IndexBuilder {
    pub fn ascending(&self, field: impl Into<String>) -> IndexKeys {
        IndexKeys::new().ascending(field)
    }

    pub fn descending(&self, field: impl Into<String>) -> IndexKeys {
        IndexKeys::new().descending(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_ascending_key_direction() {
        let keys = IndexKeys::new().ascending("email");
        assert_eq!(keys.to_document(), doc! { "email": 1 });
    }

    #[test]
    fn test_compound_keys_keep_declaration_order() {
        let keys = IndexKeys::new().ascending("last_name").descending("created_on");
        assert_eq!(
            keys.to_document(),
            doc! { "last_name": 1, "created_on": -1 }
        );
    }

    #[test]
    fn test_unique_flag_reaches_model_options() {
        let model = IndexKeys::new().ascending("email").unique().to_model();
        assert_eq!(model.options.and_then(|o| o.unique), Some(true));
    }

    #[test]
    fn test_plain_model_carries_keys_without_options() {
        let model = IndexKeys::new().ascending("email").to_model();
        assert_eq!(model.keys, doc! { "email": 1 });
        assert!(model.options.is_none());
    }
}
