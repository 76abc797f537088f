//! Store-agnostic query expression builders
//!
//! Small, composable expression trees for filters, updates, projections and
//! index keys. Each is a plain value compiled into driver BSON only when a
//! repository dispatches it, so the builder surface itself never touches the
//! store. Repositories expose the stateless `*Builder` accessors scoped to
//! their entity type; the fluent [`field`] function builds filters directly.

pub mod filter;
pub mod index;
pub mod projection;
pub mod update;

pub use filter::{Filter, FilterBuilder, FilterField, field};
pub use index::{IndexBuilder, IndexKeys};
pub use projection::{Projection, ProjectionBuilder};
pub use update::{Update, UpdateBuilder};
