//! Dynamic document wrapper
//!
//! `Document` is the storage every record type sits on: an insertion-ordered
//! map from field name to BSON value with map-style indexing and iteration.
//! Field access that should honor record hooks goes through [`crate::Record`].

use bson::{Bson, Document as BsonDocument};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use tessera_common::{Result, TesseraError};

/// Mutable, insertion-ordered key/value record
///
/// # Example
///
/// ```ignore
/// use tessera_mongodb::Document;
///
/// let mut post = Document::new();
/// post.set("title", "Hello").set("draft", true);
///
/// assert_eq!(post.get("title")?.as_str(), Some("Hello"));
/// assert!(post.get("body").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: BsonDocument,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a field value
    ///
    /// Fails with `TesseraError::MissingKey` when the field is absent.
    pub fn get(&self, key: &str) -> Result<&Bson> {
        self.fields
            .get(key)
            .ok_or_else(|| TesseraError::MissingKey(key.to_string()))
    }

    /// Get a mutable reference to a field value
    pub fn get_mut(&mut self, key: &str) -> Result<&mut Bson> {
        self.fields
            .get_mut(key)
            .ok_or_else(|| TesseraError::MissingKey(key.to_string()))
    }

    /// Set a field value, returning the document for chaining
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Bson>) -> &mut Self {
        self.fields.insert(key, value);
        self
    }

    /// Apply every pair with the raw setter, in iteration order
    pub fn fill<I, K, V>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Bson>,
    {
        for (key, value) in fields {
            self.set(key, value);
        }
        self
    }

    /// Check whether a field is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Remove a field, returning its previous value
    pub fn remove(&mut self, key: &str) -> Option<Bson> {
        self.fields.remove(key)
    }

    /// The `_id` field, if set
    pub fn id(&self) -> Option<&Bson> {
        self.fields.get("_id")
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(key, value)` pairs in insertion order
    pub fn iter(&self) -> bson::document::Iter<'_> {
        self.fields.iter()
    }

    pub fn keys(&self) -> bson::document::Keys<'_> {
        self.fields.keys()
    }

    pub fn values(&self) -> bson::document::Values<'_> {
        self.fields.values()
    }

    /// Borrow the raw BSON fields
    pub fn as_bson(&self) -> &BsonDocument {
        &self.fields
    }

    /// Copy of the raw BSON fields, ready to hand to the driver
    pub fn to_bson(&self) -> BsonDocument {
        self.fields.clone()
    }

    /// Consume the wrapper and return the raw BSON fields
    pub fn into_bson(self) -> BsonDocument {
        self.fields
    }
}

impl From<BsonDocument> for Document {
    fn from(fields: BsonDocument) -> Self {
        Self { fields }
    }
}

impl From<Document> for BsonDocument {
    fn from(document: Document) -> Self {
        document.fields
    }
}

impl Index<&str> for Document {
    type Output = Bson;

    #[track_caller]
    fn index(&self, key: &str) -> &Bson {
        match self.fields.get(key) {
            Some(value) => value,
            None => panic!("no field named {key:?} in document"),
        }
    }
}

impl IndexMut<&str> for Document {
    #[track_caller]
    fn index_mut(&mut self, key: &str) -> &mut Bson {
        match self.fields.get_mut(key) {
            Some(value) => value,
            None => panic!("no field named {key:?} in document"),
        }
    }
}

impl IntoIterator for Document {
    type Item = (String, Bson);
    type IntoIter = bson::document::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Bson);
    type IntoIter = bson::document::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl<K: Into<String>, V: Into<Bson>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut document = Document::new();
        document.fill(iter);
        document
    }
}

impl<K: Into<String>, V: Into<Bson>> Extend<(K, V)> for Document {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.fill(iter);
    }
}
