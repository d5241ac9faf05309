//! In-process [`PizzaStore`] for running the demo without a server

use crate::document::Pizza;
use crate::query::PizzaQuery;
use crate::store::{PizzaStore, PizzaStream};
use async_trait::async_trait;
use bson::oid::ObjectId;
use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use pizzeria_common::{PizzeriaError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Operation a [`MemoryStore`] should fail on purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    InsertMany,
    /// Fail when the query is issued
    Find,
    /// Yield the first match, then fail while iterating
    Cursor,
    FindOne,
}

/// Vector-backed pizza collection with the same query semantics as the
/// server. Every clone shares the same data and close counter.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pizzas: Arc<Mutex<Vec<Pizza>>>,
    fail_on: Vec<FailOn>,
    closes: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `pizzas`, ids assigned
    pub fn with_pizzas(pizzas: impl IntoIterator<Item = Pizza>) -> Self {
        let store = Self::new();
        store.pizzas.lock().extend(pizzas.into_iter().map(with_id));
        store
    }

    /// Make `op` return an error
    pub fn failing(mut self, op: FailOn) -> Self {
        self.fail_on.push(op);
        self
    }

    /// Snapshot of the stored pizzas in insertion order
    pub fn pizzas(&self) -> Vec<Pizza> {
        self.pizzas.lock().clone()
    }

    /// How many times any clone of this store has been closed
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    fn fails(&self, op: FailOn) -> bool {
        self.fail_on.contains(&op)
    }
}

fn with_id(mut pizza: Pizza) -> Pizza {
    pizza.id.get_or_insert_with(ObjectId::new);
    pizza
}

#[async_trait]
impl PizzaStore for MemoryStore {
    async fn insert_many(&self, pizzas: &[Pizza]) -> Result<usize> {
        if self.fails(FailOn::InsertMany) {
            return Err(PizzeriaError::MongoDB("insert_many failed".to_string()));
        }
        if pizzas.is_empty() {
            return Err(PizzeriaError::Query("No documents provided to insert_many".to_string()));
        }
        let mut stored = self.pizzas.lock();
        stored.extend(pizzas.iter().cloned().map(with_id));
        Ok(pizzas.len())
    }

    async fn find(&self, query: &PizzaQuery) -> Result<PizzaStream> {
        if self.fails(FailOn::Find) {
            return Err(PizzeriaError::Query("find failed".to_string()));
        }
        let results = query.apply(self.pizzas.lock().iter());

        if self.fails(FailOn::Cursor) {
            let first = results.into_iter().take(1).map(Ok::<_, PizzeriaError>);
            let broken = std::iter::once(Err(PizzeriaError::MongoDB("cursor killed".to_string())));
            return Ok(stream::iter(first.chain(broken)).boxed());
        }

        Ok(stream::iter(results.into_iter().map(Ok::<_, PizzeriaError>)).boxed())
    }

    async fn find_one(&self, query: &PizzaQuery) -> Result<Option<Pizza>> {
        if self.fails(FailOn::FindOne) {
            return Err(PizzeriaError::Query("find_one failed".to_string()));
        }
        Ok(query.clone().limit(1).apply(self.pizzas.lock().iter()).into_iter().next())
    }

    async fn close(self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::seed_pizzas;
    use futures::TryStreamExt;

    #[tokio::test]
    async fn test_insert_assigns_ids() {
        let store = MemoryStore::new();
        let inserted = store.insert_many(&seed_pizzas()).await.unwrap();
        assert_eq!(inserted, 4);
        assert!(store.pizzas().iter().all(|p| p.id.is_some()));
    }

    #[tokio::test]
    async fn test_insert_empty_batch_fails() {
        let store = MemoryStore::new();
        assert!(store.insert_many(&[]).await.is_err());
    }

    #[tokio::test]
    async fn test_find_streams_sorted_matches() {
        let store = MemoryStore::with_pizzas(seed_pizzas());
        let query = PizzaQuery::new().price_lt(10.0).sort_by_name();
        let found: Vec<Pizza> = store.find(&query).await.unwrap().try_collect().await.unwrap();
        let names: Vec<&str> = found.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["cheese", "royal"]);
    }

    #[tokio::test]
    async fn test_cursor_failure_after_first_item() {
        let store = MemoryStore::with_pizzas(seed_pizzas()).failing(FailOn::Cursor);
        let mut stream = store.find(&PizzaQuery::new().sort_by_name()).await.unwrap();
        assert_eq!(stream.try_next().await.unwrap().unwrap().name, "cheese");
        assert!(stream.try_next().await.is_err());
    }

    #[tokio::test]
    async fn test_find_one_returns_first_in_insertion_order() {
        let store = MemoryStore::with_pizzas(seed_pizzas());
        let found = store.find_one(&PizzaQuery::new().topping("tomato")).await.unwrap();
        assert_eq!(found.unwrap().name, "queen");
    }

    #[tokio::test]
    async fn test_close_counts_across_clones() {
        let store = MemoryStore::new();
        let observer = store.clone();
        store.close().await.unwrap();
        assert_eq!(observer.close_count(), 1);
    }
}
