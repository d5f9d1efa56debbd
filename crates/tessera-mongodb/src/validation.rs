//! Input validation for collection names, field names and filters
//!
//! Relationship declarations and collection handles are checked here before
//! anything reaches the driver.
//!
//! # Checks
//! - Collection name validation (prevents system collection access)
//! - Field name validation (prevents operator injection through relation keys)
//! - Filter validation (blocks server-side JavaScript operators)

use crate::Result;
use bson::{Bson, Document as BsonDocument};
use tessera_common::TesseraError;

/// Maximum allowed length for collection names (MongoDB limit is 255, we're more conservative)
const MAX_COLLECTION_NAME_LENGTH: usize = 120;

/// Maximum allowed length for field names
const MAX_FIELD_NAME_LENGTH: usize = 1024;

/// Validated collection name
///
/// # Guarantees
/// - Not empty
/// - Maximum 120 characters
/// - No null bytes
/// - No "system." prefix (system collections)
/// - No $ characters (special operators)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCollectionName {
    name: String,
}

impl ValidatedCollectionName {
    /// Creates a new validated collection name
    ///
    /// # Errors
    /// Returns `TesseraError::Validation` if:
    /// - Name is empty
    /// - Name exceeds MAX_COLLECTION_NAME_LENGTH
    /// - Name contains null bytes
    /// - Name starts with "system."
    /// - Name contains $ characters
    pub fn new(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(TesseraError::Validation(
                "Collection name cannot be empty".to_string(),
            ));
        }

        if name.len() > MAX_COLLECTION_NAME_LENGTH {
            return Err(TesseraError::Validation(format!(
                "Collection name exceeds maximum length of {} characters: '{}'",
                MAX_COLLECTION_NAME_LENGTH, name
            )));
        }

        if name.contains('\0') {
            return Err(TesseraError::Validation(
                "Collection name cannot contain null bytes".to_string(),
            ));
        }

        if name.starts_with("system.") {
            return Err(TesseraError::Validation(format!(
                "Collection name cannot start with 'system.' (reserved): '{}'",
                name
            )));
        }

        if name.contains('$') {
            return Err(TesseraError::Validation(format!(
                "Collection name cannot contain '$' character: '{}'",
                name
            )));
        }

        // Allowed, but worth a look
        if name.contains("..") || name.contains("//") {
            tracing::warn!(collection = name, "Collection name contains suspicious pattern");
        }

        Ok(ValidatedCollectionName {
            name: name.to_string(),
        })
    }

    /// Returns the validated collection name as a string slice
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Consumes the ValidatedCollectionName and returns the inner String
    pub fn into_string(self) -> String {
        self.name
    }
}

impl AsRef<str> for ValidatedCollectionName {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for ValidatedCollectionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validated field name, used for relation keys
///
/// # Guarantees
/// - Not empty
/// - Maximum 1024 characters
/// - No null bytes
/// - No $ prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFieldName {
    name: String,
}

impl ValidatedFieldName {
    /// Creates a new validated field name
    ///
    /// # Errors
    /// Returns `TesseraError::Validation` if:
    /// - Name is empty
    /// - Name exceeds MAX_FIELD_NAME_LENGTH
    /// - Name contains null bytes
    /// - Name starts with $
    pub fn new(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(TesseraError::Validation(
                "Field name cannot be empty".to_string(),
            ));
        }

        if name.len() > MAX_FIELD_NAME_LENGTH {
            return Err(TesseraError::Validation(format!(
                "Field name exceeds maximum length of {} characters",
                MAX_FIELD_NAME_LENGTH
            )));
        }

        if name.contains('\0') {
            return Err(TesseraError::Validation(
                "Field name cannot contain null bytes".to_string(),
            ));
        }

        if name.starts_with('$') {
            return Err(TesseraError::Validation(format!(
                "Field name cannot start with '$' (reserved for operators): '{}'",
                name
            )));
        }

        Ok(ValidatedFieldName {
            name: name.to_string(),
        })
    }

    /// Returns the validated field name as a string slice
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Consumes the ValidatedFieldName and returns the inner String
    pub fn into_string(self) -> String {
        self.name
    }
}

impl AsRef<str> for ValidatedFieldName {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for ValidatedFieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Operators that run JavaScript on the server
const DANGEROUS_OPERATORS: &[&str] = &[
    "$where",
    "$function",
    "$accumulator",
];

/// Validates a filter document for dangerous operators
///
/// # Errors
/// Returns `TesseraError::Validation` if a dangerous operator appears at any depth
pub fn validate_query(query: &Bson) -> Result<()> {
    match query {
        Bson::Document(doc) => {
            validate_filter(doc)
        }
        Bson::Array(arr) => {
            for item in arr {
                validate_query(item)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Validates a filter document before it is sent to the driver
pub fn validate_filter(filter: &BsonDocument) -> Result<()> {
    if let Some(key) = filter
        .keys()
        .find(|key| DANGEROUS_OPERATORS.contains(&key.as_str()))
    {
        return Err(TesseraError::Validation(format!(
            "Dangerous operator '{}' is not allowed for security reasons",
            key
        )));
    }

    filter.values().try_for_each(validate_query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_valid_collection_names() {
        let names = vec!["users", "posts", "my_collection", "test123"];
        for name in names {
            assert!(
                ValidatedCollectionName::new(name).is_ok(),
                "Should accept valid name: {}",
                name
            );
        }
    }

    #[test]
    fn test_empty_collection_name() {
        let result = ValidatedCollectionName::new("");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_collection_name_too_long() {
        let long_name = "a".repeat(MAX_COLLECTION_NAME_LENGTH + 1);
        let result = ValidatedCollectionName::new(&long_name);
        assert!(result.unwrap_err().to_string().contains("maximum length"));
    }

    #[test]
    fn test_collection_name_with_null_byte() {
        let result = ValidatedCollectionName::new("test\0collection");
        assert!(result.unwrap_err().to_string().contains("null bytes"));
    }

    #[test]
    fn test_system_collection_blocked() {
        let result = ValidatedCollectionName::new("system.users");
        assert!(result.unwrap_err().to_string().contains("system."));
    }

    #[test]
    fn test_collection_name_with_dollar_sign() {
        let result = ValidatedCollectionName::new("$users");
        assert!(result.unwrap_err().to_string().contains("$"));
    }

    #[test]
    fn test_validated_collection_name_display() {
        let validated = ValidatedCollectionName::new("users").unwrap();
        assert_eq!(validated.as_str(), "users");
        assert_eq!(validated.to_string(), "users");
    }

    #[test]
    fn test_valid_field_names() {
        let names = vec!["_id", "postId", "author_id", "meta.owner"];
        for name in names {
            assert!(
                ValidatedFieldName::new(name).is_ok(),
                "Should accept valid field name: {}",
                name
            );
        }
    }

    #[test]
    fn test_empty_field_name() {
        let result = ValidatedFieldName::new("");
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_field_name_too_long() {
        let long_name = "a".repeat(MAX_FIELD_NAME_LENGTH + 1);
        let result = ValidatedFieldName::new(&long_name);
        assert!(result.unwrap_err().to_string().contains("maximum length"));
    }

    #[test]
    fn test_field_name_with_dollar_sign() {
        let result = ValidatedFieldName::new("$set");
        assert!(result.unwrap_err().to_string().contains("$"));
    }

    #[test]
    fn test_validate_safe_query() {
        let safe = doc! {"postId": "abc", "score": {"$gt": 3}};
        assert!(validate_query(&Bson::Document(safe)).is_ok());
    }

    #[test]
    fn test_validate_query_with_where_operator() {
        let dangerous = doc! {"$where": "this.postId == 'abc'"};
        let result = validate_query(&Bson::Document(dangerous));
        assert!(result.unwrap_err().to_string().contains("$where"));
    }

    #[test]
    fn test_validate_filter() {
        assert!(validate_filter(&doc! {"postId": {"$in": ["a", "b"]}}).is_ok());
        assert!(validate_filter(&doc! {"$where": "true"}).is_err());
        assert!(validate_filter(&doc! {"$or": [{"$where": "true"}]}).is_err());
        assert!(validate_filter(&doc! {"meta": {"$accumulator": {}}}).is_err());
    }

    #[test]
    fn test_validate_nested_query() {
        let nested = doc! {
            "$and": [
                {"postId": "abc"},
                {"$function": {"body": "function() { return true; }", "args": [], "lang": "js"}}
            ]
        };
        let result = validate_query(&Bson::Document(nested));
        assert!(result.unwrap_err().to_string().contains("$function"));
    }
}
