//! Record hooks
//!
//! `Record` is implemented by every type that stores its fields in a
//! [`Document`]. The getter/setter hooks are the single indirection point for
//! field access: construction, hydration from the database and relation
//! resolution all go through them, so a record type can coerce, compute or
//! validate fields without its callers knowing.

use bson::{Bson, Document as BsonDocument};
use tessera_common::Result;

use crate::Document;

/// Field access with overridable hooks
///
/// # Example
///
/// ```ignore
/// use bson::{oid::ObjectId, Bson};
/// use tessera_mongodb::{Document, Record, Result, TesseraError};
///
/// #[derive(Default)]
/// struct Post {
///     document: Document,
/// }
///
/// impl Record for Post {
///     fn document(&self) -> &Document {
///         &self.document
///     }
///
///     fn document_mut(&mut self) -> &mut Document {
///         &mut self.document
///     }
///
///     // Store string identifiers as ObjectIds
///     fn set_from_setter(&mut self, key: &str, value: Bson) -> Result<&mut Self> {
///         let value = match (key, value) {
///             ("_id", Bson::String(hex)) => Bson::ObjectId(
///                 ObjectId::parse_str(&hex)
///                     .map_err(|e| TesseraError::Validation(e.to_string()))?,
///             ),
///             (_, value) => value,
///         };
///         self.document.set(key, value);
///         Ok(self)
///     }
/// }
/// ```
pub trait Record {
    /// Borrow the underlying document
    fn document(&self) -> &Document;

    /// Mutably borrow the underlying document
    fn document_mut(&mut self) -> &mut Document;

    /// Read hook, defaults to a plain `Document::get`
    fn get_from_getter(&self, key: &str) -> Result<Bson> {
        self.document().get(key).cloned()
    }

    /// Write hook, defaults to a plain `Document::set`
    fn set_from_setter(&mut self, key: &str, value: Bson) -> Result<&mut Self> {
        self.document_mut().set(key, value);
        Ok(self)
    }

    /// Apply every pair with the raw setter, bypassing the hooks
    fn fill<I>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = (String, Bson)>,
    {
        self.document_mut().fill(fields);
        self
    }

    /// Apply every pair through `set_from_setter`, once each and in order
    ///
    /// Stops at the first hook error; pairs applied before it are kept.
    fn fill_from_setter<I>(&mut self, fields: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (String, Bson)>,
    {
        for (key, value) in fields {
            self.set_from_setter(&key, value)?;
        }
        Ok(self)
    }

    /// Check whether a field is stored
    fn has(&self, key: &str) -> bool {
        self.document().contains_key(key)
    }

    /// Remove a stored field
    fn unset(&mut self, key: &str) -> Option<Bson> {
        self.document_mut().remove(key)
    }

    /// Raw stored fields for the driver
    fn to_bson(&self) -> BsonDocument {
        self.document().to_bson()
    }

    /// Build a record from initial fields, routing each through the setter hook
    fn from_fields<I>(fields: I) -> Result<Self>
    where
        Self: Sized + Default,
        I: IntoIterator<Item = (String, Bson)>,
    {
        let mut record = Self::default();
        record.fill_from_setter(fields)?;
        Ok(record)
    }
}

impl Record for Document {
    fn document(&self) -> &Document {
        self
    }

    fn document_mut(&mut self) -> &mut Document {
        self
    }
}
