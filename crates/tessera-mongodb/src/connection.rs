//! MongoDB connection management with pool configuration

use bson::doc;
use mongodb::{
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Database,
};
use std::time::Duration;
use tessera_common::{Result, TesseraError};
use tracing::{info, instrument};

use crate::{Collection, Model};

/// Connection pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Minimum number of connections in the pool (default: 0)
    pub min_pool_size: Option<u32>,
    /// Maximum number of connections in the pool (default: 10)
    pub max_pool_size: Option<u32>,
    /// Maximum time a connection can remain idle before being closed (default: none)
    pub max_idle_time: Option<Duration>,
    /// Connection timeout (default: 10s)
    pub connect_timeout: Option<Duration>,
    /// Server selection timeout (default: 30s)
    pub server_selection_timeout: Option<Duration>,
    /// Application name for server logs
    pub app_name: Option<String>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min_pool_size: Some(0),
            max_pool_size: Some(10),
            max_idle_time: None,
            connect_timeout: Some(Duration::from_secs(10)),
            server_selection_timeout: Some(Duration::from_secs(30)),
            app_name: Some("tessera".to_string()),
        }
    }
}

impl PoolConfig {
    fn apply(self, client_options: &mut ClientOptions) {
        if let Some(min) = self.min_pool_size {
            client_options.min_pool_size = Some(min);
        }
        if let Some(max) = self.max_pool_size {
            client_options.max_pool_size = Some(max);
        }
        if let Some(idle) = self.max_idle_time {
            client_options.max_idle_time = Some(idle);
        }
        if let Some(connect) = self.connect_timeout {
            client_options.connect_timeout = Some(connect);
        }
        if let Some(server_sel) = self.server_selection_timeout {
            client_options.server_selection_timeout = Some(server_sel);
        }
        if let Some(app) = self.app_name {
            client_options.app_name = Some(app);
        }
    }
}

/// MongoDB client plus the database models are bound to
#[derive(Debug, Clone)]
pub struct Connection {
    client: Client,
    database: Database,
}

impl Connection {
    /// Create a new MongoDB connection with default pool settings
    pub async fn new(connection_string: &str) -> Result<Self> {
        Self::with_config(connection_string, PoolConfig::default()).await
    }

    /// Create a new MongoDB connection with custom pool configuration
    ///
    /// The connection string must name a default database.
    #[instrument(skip(connection_string, config))]
    pub async fn with_config(connection_string: &str, config: PoolConfig) -> Result<Self> {
        let mut client_options = ClientOptions::parse(connection_string).await?;
        config.apply(&mut client_options);

        // Stable API version for compatibility
        let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
        client_options.server_api = Some(server_api);

        let client = Client::with_options(client_options)?;

        let database = client.default_database().ok_or_else(|| {
            TesseraError::Connection(
                "No default database specified in connection string".to_string(),
            )
        })?;

        info!(database = database.name(), "MongoDB client initialized");

        Ok(Self { client, database })
    }

    /// Wrap an existing client, binding models to `database_name`
    pub fn from_client(client: Client, database_name: &str) -> Self {
        let database = client.database(database_name);
        Self { client, database }
    }

    /// Get a reference to the database
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Get the database name
    pub fn database_name(&self) -> &str {
        self.database.name()
    }

    /// Get a reference to the client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Typed handle on `M`'s collection in the bound database
    pub fn collection<M: Model>(&self) -> Result<Collection<M>> {
        Collection::new(self.database.clone())
    }

    /// Switch to a different database on the same client
    pub fn use_database(&self, name: &str) -> Self {
        Self::from_client(self.client.clone(), name)
    }

    /// Check that the server answers a ping
    pub async fn ping(&self) -> Result<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| TesseraError::Connection(format!("Ping failed: {}", e)))?;
        Ok(())
    }

    /// List all collection names in the current database
    pub async fn list_collection_names(&self) -> Result<Vec<String>> {
        let names = self.database.list_collection_names().await?;
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Comments, Unusable};

    #[test]
    fn test_default_pool_config() {
        let config = PoolConfig::default();
        assert_eq!(config.min_pool_size, Some(0));
        assert_eq!(config.max_pool_size, Some(10));
        assert_eq!(config.app_name, Some("tessera".to_string()));
    }

    #[tokio::test]
    async fn test_pool_config_applied() {
        let mut options = ClientOptions::parse("mongodb://localhost:27017/blog")
            .await
            .unwrap();
        let config = PoolConfig {
            min_pool_size: Some(2),
            max_pool_size: Some(50),
            max_idle_time: Some(Duration::from_secs(300)),
            connect_timeout: Some(Duration::from_secs(5)),
            server_selection_timeout: None,
            app_name: Some("my-app".to_string()),
        };
        config.apply(&mut options);

        assert_eq!(options.min_pool_size, Some(2));
        assert_eq!(options.max_pool_size, Some(50));
        assert_eq!(options.max_idle_time, Some(Duration::from_secs(300)));
        assert_eq!(options.app_name.as_deref(), Some("my-app"));
    }

    #[tokio::test]
    async fn test_connection_requires_default_database() {
        let err = Connection::new("mongodb://localhost:27017").await.unwrap_err();
        assert!(matches!(err, TesseraError::Connection(_)));
    }

    #[tokio::test]
    async fn test_connection_binds_default_database() {
        let conn = Connection::new("mongodb://localhost:27017/blog").await.unwrap();
        assert_eq!(conn.database_name(), "blog");
        assert_eq!(conn.use_database("archive").database_name(), "archive");
    }

    #[tokio::test]
    async fn test_collection_from_connection() {
        let conn = Connection::new("mongodb://localhost:27017/blog").await.unwrap();

        let comments = conn.collection::<Comments>().unwrap();
        assert_eq!(comments.name(), "comments");
        assert_eq!(comments.database_name(), "blog");

        assert!(matches!(
            conn.collection::<Unusable>().unwrap_err(),
            TesseraError::InvalidArgument(_)
        ));
    }
}
