//! MongoDB document mapper for tessera
//!
//! This crate wraps raw MongoDB documents in collection-aware records and
//! lets record types declare relationships to other collections.
//!
//! # Features
//! - Insertion-ordered `Document` with map-style indexing and iteration
//! - Getter/setter hooks for coercion and computed fields (`Record`)
//! - Compile-time model descriptors (`Model`) and typed `Collection` handles
//! - `has_one`, `has_many`, `belongs_to`, `belongs_to_many` relationship binders
//! - Input validation for collection names, relation keys and filters

pub mod collection;
pub mod connection;
pub mod document;
pub mod model;
pub mod record;
pub mod relations;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use collection::Collection;
pub use connection::{Connection, PoolConfig};
pub use document::Document;
pub use model::Model;
pub use record::Record;
pub use relations::{BindMany, BindOne, HasRelationships, Relation, DEFAULT_KEY};
pub use tessera_common::{Result, TesseraError};
pub use validation::{
    validate_filter, validate_query, ValidatedCollectionName, ValidatedFieldName,
};
