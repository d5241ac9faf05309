//! MongoDB client construction and shutdown

use bson::doc;
use mongodb::{options::ClientOptions, Client, Collection, Database};
use pizzeria_common::{PizzeriaError, Result};
use std::time::Duration;
use tracing::info;

/// Driver overrides applied on top of the connection string.
///
/// Every field left as `None` keeps whatever the URI (or the driver) says.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Application name reported in server logs
    pub app_name: Option<String>,
    /// Minimum number of pooled connections
    pub min_pool_size: Option<u32>,
    /// Maximum number of pooled connections
    pub max_pool_size: Option<u32>,
    /// Connection timeout
    pub connect_timeout: Option<Duration>,
    /// Server selection timeout
    pub server_selection_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            app_name: Some("pizzeria".to_string()),
            min_pool_size: None,
            max_pool_size: None,
            connect_timeout: None,
            server_selection_timeout: None,
        }
    }
}

/// Handle to a MongoDB deployment.
///
/// Building a `Connection` does no network I/O; [`Connection::ping`] is the
/// first call that reaches the server.
#[derive(Debug)]
pub struct Connection {
    client: Client,
}

impl Connection {
    /// Create a new client with default settings
    pub async fn new(connection_string: &str) -> Result<Self> {
        Self::with_config(connection_string, ClientConfig::default()).await
    }

    /// Create a new client with custom driver settings
    pub async fn with_config(connection_string: &str, config: ClientConfig) -> Result<Self> {
        if connection_string.trim().is_empty() {
            return Err(PizzeriaError::Config(
                "Connection string is empty".to_string(),
            ));
        }

        let mut client_options = ClientOptions::parse(connection_string)
            .await
            .map_err(|e| PizzeriaError::Connection(format!("Invalid connection string: {}", e)))?;

        if let Some(app) = config.app_name {
            client_options.app_name = Some(app);
        }
        if let Some(min) = config.min_pool_size {
            client_options.min_pool_size = Some(min);
        }
        if let Some(max) = config.max_pool_size {
            client_options.max_pool_size = Some(max);
        }
        if let Some(connect) = config.connect_timeout {
            client_options.connect_timeout = Some(connect);
        }
        if let Some(server_sel) = config.server_selection_timeout {
            client_options.server_selection_timeout = Some(server_sel);
        }

        let hosts = client_options
            .hosts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let client = Client::with_options(client_options)?;
        info!(hosts = %hosts, "MongoDB client created");

        Ok(Self { client })
    }

    /// Get a database handle. The database is not created until first write.
    pub fn database(&self, name: &str) -> Database {
        self.client.database(name)
    }

    /// Get a typed collection handle inside `database`
    pub fn collection<T: Send + Sync>(&self, database: &str, name: &str) -> Collection<T> {
        self.client.database(database).collection(name)
    }

    /// Round trip to the server. Fails once server selection gives up.
    pub async fn ping(&self) -> Result<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| PizzeriaError::Connection(format!("Ping failed: {}", e)))?;
        Ok(())
    }

    /// Close every pooled connection. Consumes the handle.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        info!("MongoDB client closed");
    }
}
