//! Storage seam between the demo runner and the database

use crate::connection::{ClientConfig, Connection};
use crate::document::Pizza;
use crate::query::PizzaQuery;
use crate::validation::ValidatedName;
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use mongodb::Collection;
use pizzeria_common::{PizzeriaError, Result};
use tracing::debug;

/// Lazy sequence of query results. Finite; re-run the query to restart it.
pub type PizzaStream = BoxStream<'static, Result<Pizza>>;

/// Operations the demo needs from a pizza collection
#[async_trait]
pub trait PizzaStore: Send + Sync {
    /// Insert all `pizzas` in one batch, returning how many were inserted
    async fn insert_many(&self, pizzas: &[Pizza]) -> Result<usize>;

    /// Run `query` and stream the matching pizzas
    async fn find(&self, query: &PizzaQuery) -> Result<PizzaStream>;

    /// First pizza matching `query`, if any
    async fn find_one(&self, query: &PizzaQuery) -> Result<Option<Pizza>>;

    /// Release the underlying handle. Consumes the store.
    async fn close(self) -> Result<()>
    where
        Self: Sized;
}

/// [`PizzaStore`] backed by a MongoDB collection
#[derive(Debug)]
pub struct MongoStore {
    connection: Connection,
    collection: Collection<Pizza>,
}

impl MongoStore {
    /// Build a client for `connection_string` and take a handle on
    /// `database.collection`. No network I/O happens here.
    pub async fn connect(
        connection_string: &str,
        config: ClientConfig,
        database: &ValidatedName,
        collection: &ValidatedName,
    ) -> Result<Self> {
        let connection = Connection::with_config(connection_string, config).await?;
        let collection = connection.collection(database.as_str(), collection.as_str());
        Ok(Self {
            connection,
            collection,
        })
    }

    /// Check that the deployment answers
    pub async fn ping(&self) -> Result<()> {
        self.connection.ping().await
    }

    /// Name of the collection this store reads and writes
    pub fn namespace(&self) -> String {
        self.collection.namespace().to_string()
    }
}

#[async_trait]
impl PizzaStore for MongoStore {
    async fn insert_many(&self, pizzas: &[Pizza]) -> Result<usize> {
        let result = self.collection.insert_many(pizzas).await?;
        Ok(result.inserted_ids.len())
    }

    async fn find(&self, query: &PizzaQuery) -> Result<PizzaStream> {
        let filter = query.filter_document();
        debug!(namespace = %self.namespace(), filter = %filter, "find");

        let mut action = self.collection.find(filter);
        if let Some(sort) = query.sort_document() {
            action = action.sort(sort);
        }
        if let Some(limit) = query.get_limit() {
            action = action.limit(limit);
        }

        let cursor = action.await?;
        Ok(cursor.map_err(PizzeriaError::from).boxed())
    }

    async fn find_one(&self, query: &PizzaQuery) -> Result<Option<Pizza>> {
        let filter = query.filter_document();
        debug!(namespace = %self.namespace(), filter = %filter, "find_one");

        let mut action = self.collection.find_one(filter);
        if let Some(sort) = query.sort_document() {
            action = action.sort(sort);
        }

        Ok(action.await?)
    }

    async fn close(self) -> Result<()> {
        self.connection.shutdown().await;
        Ok(())
    }
}
