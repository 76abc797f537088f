//! Composable filter expressions
//!
//! Filters are store-agnostic tagged variants compiled to MongoDB query
//! documents only at dispatch time. They carry no state besides their operands
//! and have no side effects; building one performs no I/O.
//!
//! Two entry points exist: the fluent [`field`] function and the
//! [`FilterBuilder`] accessor exposed by repositories. Both produce the same
//! [`Filter`] values.
//!
//! # Examples
//!
//! ```rust,ignore
//! use mongo_data::query::{field, Filter};
//!
//! let active_customers = Filter::and(vec![
//!     field("status").eq("active"),
//!     field("first_name").contains("Customer"),
//! ]);
//! ```

use mongodb::bson::{Bson, Document, Regex, doc};

/// A filter expression over one entity collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every document.
    Empty,
    /// Field equals value.
    Eq(String, Bson),
    /// Field differs from value.
    Ne(String, Bson),
    /// Field strictly greater than value.
    Gt(String, Bson),
    /// Field greater than or equal to value.
    Gte(String, Bson),
    /// Field strictly less than value.
    Lt(String, Bson),
    /// Field less than or equal to value.
    Lte(String, Bson),
    /// Field equals one of the listed values.
    In(String, Vec<Bson>),
    /// String field contains the given substring (regex-escaped).
    Contains(String, String),
    /// String field starts with the given prefix (regex-escaped, anchored).
    StartsWith(String, String),
    /// Field presence check.
    Exists(String, bool),
    /// Every sub-filter matches.
    And(Vec<Filter>),
    /// At least one sub-filter matches.
    Or(Vec<Filter>),
    /// The sub-filter does not match.
    Not(Box<Filter>),
}

impl Filter {
    /// The match-everything filter.
    pub fn empty() -> Self {
        Filter::Empty
    }

    /// Conjunction of the given filters. Empty members are dropped; an empty
    /// conjunction matches everything.
    pub fn and(filters: Vec<Filter>) -> Self {
        Filter::And(filters)
    }

    /// Disjunction of the given filters. An empty member matches everything
    /// and so does the whole disjunction; an empty disjunction matches
    /// nothing.
    pub fn or(filters: Vec<Filter>) -> Self {
        Filter::Or(filters)
    }

    /// Negation of the given filter.
    pub fn not(filter: Filter) -> Self {
        Filter::Not(Box::new(filter))
    }

    /// Compiles the expression into a MongoDB query document.
    pub fn to_document(&self) -> Document {
        match self {
            Filter::Empty => doc! {},
            Filter::Eq(field, value) => doc! { field.as_str(): { "$eq": value.clone() } },
            Filter::Ne(field, value) => doc! { field.as_str(): { "$ne": value.clone() } },
            Filter::Gt(field, value) => doc! { field.as_str(): { "$gt": value.clone() } },
            Filter::Gte(field, value) => doc! { field.as_str(): { "$gte": value.clone() } },
            Filter::Lt(field, value) => doc! { field.as_str(): { "$lt": value.clone() } },
            Filter::Lte(field, value) => doc! { field.as_str(): { "$lte": value.clone() } },
            Filter::In(field, values) => doc! { field.as_str(): { "$in": values.clone() } },
            Filter::Contains(field, needle) => doc! {
                field.as_str(): Bson::RegularExpression(Regex {
                    pattern: escape_regex(needle),
                    options: String::new(),
                })
            },
            Filter::StartsWith(field, prefix) => doc! {
                field.as_str(): Bson::RegularExpression(Regex {
                    pattern: format!("^{}", escape_regex(prefix)),
                    options: String::new(),
                })
            },
            Filter::Exists(field, exists) => doc! { field.as_str(): { "$exists": *exists } },
            Filter::And(filters) => compile_conjunction(filters),
            Filter::Or(filters) => compile_disjunction(filters),
            Filter::Not(filter) => doc! { "$nor": [filter.to_document()] },
        }
    }
}

// `Empty` matches everything: an identity element for `$and`, absorbing for
// `$or`. Only the conjunction may drop `Empty` members.
fn compile_conjunction(filters: &[Filter]) -> Document {
    let members: Vec<Document> = filters
        .iter()
        .filter(|f| !matches!(f, Filter::Empty))
        .map(Filter::to_document)
        .collect();

    match members.len() {
        0 => doc! {},
        1 => members.into_iter().next().unwrap_or_default(),
        _ => doc! { "$and": members },
    }
}

fn compile_disjunction(filters: &[Filter]) -> Document {
    if filters.iter().any(|f| matches!(f, Filter::Empty)) {
        return doc! {};
    }

    let members: Vec<Document> = filters.iter().map(Filter::to_document).collect();
    match members.len() {
        // An empty disjunction matches nothing.
        0 => doc! { "$nor": [ {} ] },
        1 => members.into_iter().next().unwrap_or_default(),
        _ => doc! { "$or": members },
    }
}

/// Escapes regex metacharacters so substring filters match literally.
fn escape_regex(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(
            c,
            '\\' | '^' | '$' | '.' | '|' | '?' | '*' | '+' | '(' | ')' | '[' | ']' | '{' | '}'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Fluent entry point: `field("name").eq("Alice")`.
pub fn field(name: impl Into<String>) -> FilterField {
    FilterField { name: name.into() }
}

/// A named field awaiting its comparison.
#[derive(Debug, Clone)]
pub struct FilterField {
    name: String,
}

impl FilterField {
    pub fn eq(self, value: impl Into<Bson>) -> Filter {
        Filter::Eq(self.name, value.into())
    }

    pub fn ne(self, value: impl Into<Bson>) -> Filter {
        Filter::Ne(self.name, value.into())
    }

    pub fn gt(self, value: impl Into<Bson>) -> Filter {
        Filter::Gt(self.name, value.into())
    }

    pub fn gte(self, value: impl Into<Bson>) -> Filter {
        Filter::Gte(self.name, value.into())
    }

    pub fn lt(self, value: impl Into<Bson>) -> Filter {
        Filter::Lt(self.name, value.into())
    }

    pub fn lte(self, value: impl Into<Bson>) -> Filter {
        Filter::Lte(self.name, value.into())
    }

    pub fn is_in(self, values: impl IntoIterator<Item = impl Into<Bson>>) -> Filter {
        Filter::In(self.name, values.into_iter().map(Into::into).collect())
    }

    pub fn contains(self, needle: impl Into<String>) -> Filter {
        Filter::Contains(self.name, needle.into())
    }

    pub fn starts_with(self, prefix: impl Into<String>) -> Filter {
        Filter::StartsWith(self.name, prefix.into())
    }

    pub fn exists(self, exists: bool) -> Filter {
        Filter::Exists(self.name, exists)
    }
}

/// Stateless filter accessor scoped to a repository's entity type.
///
/// Mirrors the shape of a driver-side filter builder: every method returns a
/// fresh [`Filter`] value.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterBuilder;

impl FilterBuilder {
    pub fn empty(&self) -> Filter {
        Filter::empty()
    }

    pub fn eq(&self, name: impl Into<String>, value: impl Into<Bson>) -> Filter {
        field(name).eq(value)
    }

    pub fn ne(&self, name: impl Into<String>, value: impl Into<Bson>) -> Filter {
        field(name).ne(value)
    }

    pub fn gt(&self, name: impl Into<String>, value: impl Into<Bson>) -> Filter {
        field(name).gt(value)
    }

    pub fn lt(&self, name: impl Into<String>, value: impl Into<Bson>) -> Filter {
        field(name).lt(value)
    }

    pub fn contains(&self, name: impl Into<String>, needle: impl Into<String>) -> Filter {
        field(name).contains(needle)
    }

    pub fn and(&self, filters: Vec<Filter>) -> Filter {
        Filter::and(filters)
    }

    pub fn or(&self, filters: Vec<Filter>) -> Filter {
        Filter::or(filters)
    }

    pub fn not(&self, filter: Filter) -> Filter {
        Filter::not(filter)
    }
}
