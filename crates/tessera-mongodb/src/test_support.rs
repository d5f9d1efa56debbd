//! Models shared by the unit tests

use bson::{oid::ObjectId, Bson, Document as BsonDocument};
use mongodb::{Client, Database};
use tessera_common::{Result, TesseraError};

use crate::{Collection, Document, HasRelationships, Model, Record};

/// Database handle on a client that never connects unless a query is sent
pub(crate) async fn lazy_database(name: &str) -> Database {
    let client = Client::with_uri_str("mongodb://localhost:27017")
        .await
        .expect("client options should parse");
    client.database(name)
}

pub(crate) struct Posts;

impl Model for Posts {
    const NAME: &'static str = "posts";
    type Document = Post;
}

#[derive(Debug, Default)]
pub(crate) struct Post {
    document: Document,
    collection: Option<Collection<Posts>>,
}

impl Post {
    pub(crate) fn bound(collection: Collection<Posts>, fields: BsonDocument) -> Result<Self> {
        let mut post = Post::from_fields(fields)?;
        post.collection = Some(collection);
        Ok(post)
    }
}

impl Record for Post {
    fn document(&self) -> &Document {
        &self.document
    }

    fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }
}

impl HasRelationships for Post {
    type Source = Posts;

    fn collection(&self) -> Option<&Collection<Posts>> {
        self.collection.as_ref()
    }
}

pub(crate) struct Comments;

impl Model for Comments {
    const NAME: &'static str = "comments";
    type Document = Comment;
}

/// Stores `postId` as an ObjectId whatever form it arrives in
#[derive(Debug, Default)]
pub(crate) struct Comment {
    document: Document,
}

impl Record for Comment {
    fn document(&self) -> &Document {
        &self.document
    }

    fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    fn set_from_setter(&mut self, key: &str, value: Bson) -> Result<&mut Self> {
        let value = match (key, value) {
            ("postId", Bson::String(hex)) => Bson::ObjectId(
                ObjectId::parse_str(&hex).map_err(|e| TesseraError::Validation(e.to_string()))?,
            ),
            (_, value) => value,
        };
        self.document.set(key, value);
        Ok(self)
    }
}

pub(crate) struct Users;

impl Model for Users {
    const NAME: &'static str = "users";
    type Document = Document;
}

/// Declares a reserved collection name
pub(crate) struct Unusable;

impl Model for Unusable {
    const NAME: &'static str = "system.users";
    type Document = Document;
}
