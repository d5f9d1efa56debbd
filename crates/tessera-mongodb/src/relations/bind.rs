//! Relation binders
//!
//! A binder holds a target collection, a borrowed owner record and the
//! `(target_key, local_key)` pair correlating them. Nothing is queried until
//! `get`, `stream` or `count` is called; the owner's local key is read through
//! its getter hook at that point.

use bson::{doc, Bson, Document as BsonDocument};
use futures::stream::{self, BoxStream, StreamExt};
use std::fmt;
use tessera_common::{Result, TesseraError};
use tracing::debug;

use crate::validation::ValidatedFieldName;
use crate::{Collection, Model, Record};

/// Common view over single- and multi-result binders
pub trait Relation {
    /// Target model
    type Target: Model;
    /// Owning record type
    type Owner: Record;

    fn target(&self) -> &Collection<Self::Target>;

    fn owner(&self) -> &Self::Owner;

    /// Field on the target documents
    fn target_key(&self) -> &str;

    /// Field on the owner
    fn local_key(&self) -> &str;

    /// Filter selecting the related documents
    ///
    /// `None` when the owner has no usable value under `local_key` (missing or
    /// null), in which case the relation is empty and no query is sent. An
    /// array value matches any of its elements through `$in`.
    fn filter(&self) -> Result<Option<BsonDocument>> {
        let value = match self.owner().get_from_getter(self.local_key()) {
            Ok(Bson::Null) | Err(TesseraError::MissingKey(_)) => return Ok(None),
            Ok(Bson::Array(values)) => Bson::Document(doc! { "$in": values }),
            Ok(value) => value,
            Err(e) => return Err(e),
        };

        let mut filter = BsonDocument::new();
        filter.insert(self.target_key(), value);
        Ok(Some(filter))
    }
}

struct Binding<'a, M: Model, O: Record> {
    target: Collection<M>,
    owner: &'a O,
    target_key: ValidatedFieldName,
    local_key: ValidatedFieldName,
}

impl<'a, M: Model, O: Record> Binding<'a, M, O> {
    fn new(target: Collection<M>, owner: &'a O, target_key: &str, local_key: &str) -> Result<Self> {
        let target_key = relation_key(target_key)?;
        let local_key = relation_key(local_key)?;

        // The owner is read field by field, not by path
        if local_key.as_str().contains('.') {
            return Err(TesseraError::InvalidArgument(format!(
                "Local key \"{}\" cannot be a dotted path",
                local_key
            )));
        }

        debug!(
            target = target.name(),
            target_key = target_key.as_str(),
            local_key = local_key.as_str(),
            "Bound relation"
        );

        Ok(Self {
            target,
            owner,
            target_key,
            local_key,
        })
    }

    fn debug_fields(&self, f: &mut fmt::DebugStruct<'_, '_>) {
        f.field("target", &self.target.name())
            .field("target_key", &self.target_key.as_str())
            .field("local_key", &self.local_key.as_str());
    }
}

fn relation_key(name: &str) -> Result<ValidatedFieldName> {
    ValidatedFieldName::new(name).map_err(|e| {
        TesseraError::InvalidArgument(format!("Relation key \"{}\" is not usable: {}", name, e))
    })
}

/// Relation expecting at most one related document
pub struct BindOne<'a, M: Model, O: Record> {
    binding: Binding<'a, M, O>,
}

impl<'a, M: Model, O: Record> BindOne<'a, M, O> {
    /// Bind `owner` to `target` where `target.target_key == owner.local_key`
    ///
    /// # Errors
    /// Returns `TesseraError::InvalidArgument` if either key is not a usable field name.
    pub fn new(target: Collection<M>, owner: &'a O, target_key: &str, local_key: &str) -> Result<Self> {
        Ok(Self {
            binding: Binding::new(target, owner, target_key, local_key)?,
        })
    }

    /// Fetch the related document, if any
    pub async fn get(&self) -> Result<Option<M::Document>> {
        let Some(filter) = self.filter()? else {
            debug!(local_key = self.local_key(), "Local key unset, relation is empty");
            return Ok(None);
        };

        self.binding.target.find_one(filter).await
    }
}

impl<'a, M: Model, O: Record> Relation for BindOne<'a, M, O> {
    type Target = M;
    type Owner = O;

    fn target(&self) -> &Collection<M> {
        &self.binding.target
    }

    fn owner(&self) -> &O {
        self.binding.owner
    }

    fn target_key(&self) -> &str {
        self.binding.target_key.as_str()
    }

    fn local_key(&self) -> &str {
        self.binding.local_key.as_str()
    }
}

impl<'a, M: Model, O: Record> fmt::Debug for BindOne<'a, M, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("BindOne");
        self.binding.debug_fields(&mut s);
        s.finish()
    }
}

/// Relation expecting zero or more related documents
pub struct BindMany<'a, M: Model, O: Record> {
    binding: Binding<'a, M, O>,
}

impl<'a, M: Model, O: Record> BindMany<'a, M, O> {
    /// Bind `owner` to `target` where `target.target_key == owner.local_key`
    ///
    /// # Errors
    /// Returns `TesseraError::InvalidArgument` if either key is not a usable field name.
    pub fn new(target: Collection<M>, owner: &'a O, target_key: &str, local_key: &str) -> Result<Self> {
        Ok(Self {
            binding: Binding::new(target, owner, target_key, local_key)?,
        })
    }

    /// Lazily stream the related documents
    pub async fn stream(&self) -> Result<BoxStream<'static, Result<M::Document>>> {
        match self.filter()? {
            Some(filter) => self.binding.target.find_stream(filter).await,
            None => {
                debug!(local_key = self.local_key(), "Local key unset, relation is empty");
                Ok(stream::empty().boxed())
            }
        }
    }

    /// Fetch all related documents
    pub async fn get(&self) -> Result<Vec<M::Document>> {
        match self.filter()? {
            Some(filter) => self.binding.target.find(filter).await,
            None => Ok(Vec::new()),
        }
    }

    /// Count related documents
    pub async fn count(&self) -> Result<u64> {
        match self.filter()? {
            Some(filter) => self.binding.target.count(filter).await,
            None => Ok(0),
        }
    }
}

impl<'a, M: Model, O: Record> Relation for BindMany<'a, M, O> {
    type Target = M;
    type Owner = O;

    fn target(&self) -> &Collection<M> {
        &self.binding.target
    }

    fn owner(&self) -> &O {
        self.binding.owner
    }

    fn target_key(&self) -> &str {
        self.binding.target_key.as_str()
    }

    fn local_key(&self) -> &str {
        self.binding.local_key.as_str()
    }
}

impl<'a, M: Model, O: Record> fmt::Debug for BindMany<'a, M, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("BindMany");
        self.binding.debug_fields(&mut s);
        s.finish()
    }
}
