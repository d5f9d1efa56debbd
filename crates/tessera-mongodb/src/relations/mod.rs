//! Declarative relationships
//!
//! `HasRelationships` turns a relationship declaration into a configured
//! binder. Every call builds a fresh target [`Collection`] on the owner's
//! database; nothing is fetched until the binder is resolved.
//!
//! # Example
//!
//! ```ignore
//! impl Post {
//!     fn comments(&self) -> Result<BindMany<'_, Comments, Self>> {
//!         self.has_many::<Comments>("postId")
//!     }
//!
//!     fn author(&self) -> Result<BindOne<'_, Users, Self>> {
//!         self.belongs_to::<Users>("authorId")
//!     }
//! }
//!
//! let comments = post.comments()?.get().await?;
//! ```

mod bind;

pub use bind::{BindMany, BindOne, Relation};

use tessera_common::{Result, TesseraError};
use tracing::debug;

use crate::{Collection, Model, Record};

/// Key used on the defaulted side of a relationship
pub const DEFAULT_KEY: &str = "_id";

/// Relationship declarations for records bound to a collection
pub trait HasRelationships: Record + Sized {
    /// Model of the collection this record was read from
    type Source: Model;

    /// Collection this record is bound to, if any
    fn collection(&self) -> Option<&Collection<Self::Source>>;

    /// Build a handle on `T`'s collection, sharing this record's database
    ///
    /// # Errors
    /// - `TesseraError::Logic` if this record is not bound to a collection
    /// - `TesseraError::InvalidArgument` if `T::NAME` is not a usable collection name
    fn build<T: Model>(&self) -> Result<Collection<T>> {
        let source = self.collection().ok_or_else(|| {
            TesseraError::Logic(format!(
                "Target collection \"{}\" is not buildable",
                std::any::type_name::<T>()
            ))
        })?;

        debug!(
            source = source.name(),
            target = T::NAME,
            database = source.database_name(),
            "Building relation target"
        );

        Collection::new(source.database().clone())
    }

    /// Single related document where `T.target_key == self._id`
    fn has_one<T: Model>(&self, target_key: &str) -> Result<BindOne<'_, T, Self>> {
        self.has_one_with::<T>(target_key, DEFAULT_KEY)
    }

    /// Single related document where `T.target_key == self.local_key`
    fn has_one_with<T: Model>(
        &self,
        target_key: &str,
        local_key: &str,
    ) -> Result<BindOne<'_, T, Self>> {
        let target = self.build::<T>()?;
        BindOne::new(target, self, target_key, local_key)
    }

    /// Related documents where `T.target_key == self._id`
    fn has_many<T: Model>(&self, target_key: &str) -> Result<BindMany<'_, T, Self>> {
        self.has_many_with::<T>(target_key, DEFAULT_KEY)
    }

    /// Related documents where `T.target_key == self.local_key`
    fn has_many_with<T: Model>(
        &self,
        target_key: &str,
        local_key: &str,
    ) -> Result<BindMany<'_, T, Self>> {
        let target = self.build::<T>()?;
        BindMany::new(target, self, target_key, local_key)
    }

    /// Parent document where `T._id == self.local_key`
    fn belongs_to<T: Model>(&self, local_key: &str) -> Result<BindOne<'_, T, Self>> {
        self.belongs_to_with::<T>(local_key, DEFAULT_KEY)
    }

    /// Parent document where `T.target_key == self.local_key`
    fn belongs_to_with<T: Model>(
        &self,
        local_key: &str,
        target_key: &str,
    ) -> Result<BindOne<'_, T, Self>> {
        let target = self.build::<T>()?;
        BindOne::new(target, self, target_key, local_key)
    }

    /// Parent documents where `T._id == self.local_key`
    fn belongs_to_many<T: Model>(&self, local_key: &str) -> Result<BindMany<'_, T, Self>> {
        self.belongs_to_many_with::<T>(local_key, DEFAULT_KEY)
    }

    /// Parent documents where `T.target_key == self.local_key`
    fn belongs_to_many_with<T: Model>(
        &self,
        local_key: &str,
        target_key: &str,
    ) -> Result<BindMany<'_, T, Self>> {
        let target = self.build::<T>()?;
        BindMany::new(target, self, target_key, local_key)
    }
}
