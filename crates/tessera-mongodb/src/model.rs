//! Model descriptors
//!
//! A model names a collection and the record type its raw documents are
//! hydrated into. Relationship targets are model types, so a target that
//! does not exist is rejected by the compiler.

use crate::Record;

/// Descriptor of a target collection
///
/// # Example
///
/// ```ignore
/// struct Comments;
///
/// impl Model for Comments {
///     const NAME: &'static str = "comments";
///     type Document = Comment;
/// }
/// ```
pub trait Model: Sized + Send + Sync + 'static {
    /// Collection name
    const NAME: &'static str;

    /// Record type instantiated for each raw document read from the collection
    type Document: Record + Default + Send + Sync + 'static;
}
