//! MongoDB side of pizzeria
//!
//! Connects to a pizza collection, optionally seeds it, and runs the three
//! demo queries through [`DemoRunner`].
//!
//! # Features
//! - Typed `Pizza` documents with BSON serialization
//! - Query builder rendering filters for the driver and matching in process
//! - `PizzaStore` trait with MongoDB and in-memory backends
//! - Guaranteed client shutdown at the end of a run

pub mod connection;
pub mod document;
pub mod memory;
pub mod query;
pub mod runner;
pub mod store;
pub mod validation;

pub use connection::{ClientConfig, Connection};
pub use document::{seed_pizzas, Pizza};
pub use memory::{FailOn, MemoryStore};
pub use pizzeria_common::{PizzeriaError, Result};
pub use query::PizzaQuery;
pub use runner::{DemoRunner, RunSummary, RunnerConfig, DEFAULT_COLLECTION, DEFAULT_DATABASE};
pub use store::{MongoStore, PizzaStore, PizzaStream};
pub use validation::ValidatedName;
