//! Domain models shared by the query builder, filter sources and HTTP layer

pub mod filters;
pub mod property;

pub use filters::{FilterSet, FilterValue};
pub use property::PropertyRecord;
