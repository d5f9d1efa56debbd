//! Typed collection handles
//!
//! A `Collection<M>` bundles a database handle with the validated name of
//! `M`'s collection. Raw documents read through it are hydrated into
//! `M::Document` via the setter hooks.

use bson::{doc, Bson, Document as BsonDocument};
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use mongodb::Database;
use std::fmt;
use std::marker::PhantomData;
use tessera_common::{Result, TesseraError};
use tracing::{debug, instrument};

use crate::validation::{validate_filter, ValidatedCollectionName};
use crate::{Model, Record};

/// Handle on the collection described by `M`
pub struct Collection<M: Model> {
    database: Database,
    name: ValidatedCollectionName,
    inner: mongodb::Collection<BsonDocument>,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> Collection<M> {
    /// Bind `M`'s collection on the given database
    ///
    /// # Errors
    /// Returns `TesseraError::InvalidArgument` if `M::NAME` is not a usable
    /// collection name.
    pub fn new(database: Database) -> Result<Self> {
        let name = ValidatedCollectionName::new(M::NAME).map_err(|e| {
            TesseraError::InvalidArgument(format!(
                "Target collection \"{}\" is not a usable collection name: {}",
                M::NAME,
                e
            ))
        })?;
        let inner = database.collection::<BsonDocument>(name.as_str());

        debug!(
            collection = name.as_str(),
            database = database.name(),
            "Bound collection"
        );

        Ok(Self {
            database,
            name,
            inner,
            _model: PhantomData,
        })
    }

    /// Collection name
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Database the collection lives in
    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn database_name(&self) -> &str {
        self.database.name()
    }

    /// Underlying driver collection
    pub fn inner(&self) -> &mongodb::Collection<BsonDocument> {
        &self.inner
    }

    /// Instantiate a record from a raw document, applying its setter hooks
    pub fn hydrate(raw: BsonDocument) -> Result<M::Document> {
        M::Document::from_fields(raw)
    }

    /// Find a single record matching the filter
    #[instrument(skip(self, filter), fields(collection = %self.name))]
    pub async fn find_one(&self, filter: BsonDocument) -> Result<Option<M::Document>> {
        validate_filter(&filter)?;

        let result = self.inner.find_one(filter).await?;

        result.map(Self::hydrate).transpose()
    }

    /// Find a record by `_id`
    pub async fn find_by_id(&self, id: impl Into<Bson>) -> Result<Option<M::Document>> {
        self.find_one(doc! { "_id": id.into() }).await
    }

    /// Stream records matching the filter, hydrating them as they arrive
    #[instrument(skip(self, filter), fields(collection = %self.name))]
    pub async fn find_stream(
        &self,
        filter: BsonDocument,
    ) -> Result<BoxStream<'static, Result<M::Document>>> {
        validate_filter(&filter)?;

        let cursor = self.inner.find(filter).await?;

        Ok(cursor
            .map(|item| item.map_err(TesseraError::from).and_then(Self::hydrate))
            .boxed())
    }

    /// Find all records matching the filter
    pub async fn find(&self, filter: BsonDocument) -> Result<Vec<M::Document>> {
        self.find_stream(filter).await?.try_collect().await
    }

    /// Find all records in the collection
    pub async fn find_all(&self) -> Result<Vec<M::Document>> {
        self.find(doc! {}).await
    }

    /// Insert a record and write the generated `_id` back through its setter
    #[instrument(skip(self, record), fields(collection = %self.name))]
    pub async fn insert_one(&self, record: &mut M::Document) -> Result<Bson> {
        let result = self.inner.insert_one(record.to_bson()).await?;

        record.set_from_setter("_id", result.inserted_id.clone())?;
        debug!(id = %result.inserted_id, "Inserted document");

        Ok(result.inserted_id)
    }

    /// `$set` the given fields on the first record matching the filter
    ///
    /// Returns true if a document was modified
    #[instrument(skip(self, filter, update), fields(collection = %self.name))]
    pub async fn update_one(&self, filter: BsonDocument, update: BsonDocument) -> Result<bool> {
        validate_filter(&filter)?;

        let result = self
            .inner
            .update_one(filter, doc! { "$set": update })
            .await?;

        Ok(result.modified_count > 0)
    }

    /// Replace the stored document with the record's fields, by `_id`
    ///
    /// Fields removed from the record are removed from the stored document.
    /// Returns true if a document with that `_id` exists, changed or not.
    #[instrument(skip(self, record), fields(collection = %self.name))]
    pub async fn save(&self, record: &M::Document) -> Result<bool> {
        let id = record
            .document()
            .id()
            .cloned()
            .ok_or_else(|| TesseraError::Database("Document has no _id".to_string()))?;

        let result = self
            .inner
            .replace_one(doc! { "_id": id }, record.to_bson())
            .await?;

        Ok(result.matched_count > 0)
    }

    /// Delete the first record matching the filter
    ///
    /// Returns true if a document was deleted
    #[instrument(skip(self, filter), fields(collection = %self.name))]
    pub async fn delete_one(&self, filter: BsonDocument) -> Result<bool> {
        validate_filter(&filter)?;

        let result = self.inner.delete_one(filter).await?;

        Ok(result.deleted_count > 0)
    }

    /// Delete a record by its `_id`
    pub async fn delete(&self, record: &M::Document) -> Result<bool> {
        let id = record
            .document()
            .id()
            .cloned()
            .ok_or_else(|| TesseraError::Database("Document has no _id".to_string()))?;

        self.delete_one(doc! { "_id": id }).await
    }

    /// Count records matching the filter
    #[instrument(skip(self, filter), fields(collection = %self.name))]
    pub async fn count(&self, filter: BsonDocument) -> Result<u64> {
        validate_filter(&filter)?;

        Ok(self.inner.count_documents(filter).await?)
    }
}

impl<M: Model> Clone for Collection<M> {
    fn clone(&self) -> Self {
        Self {
            database: self.database.clone(),
            name: self.name.clone(),
            inner: self.inner.clone(),
            _model: PhantomData,
        }
    }
}

impl<M: Model> fmt::Debug for Collection<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("database", &self.database.name())
            .field("name", &self.name.as_str())
            .finish()
    }
}
