//! Integration tests against a real MongoDB deployment.
//!
//! These tests require MONGODB_URI to point at a server the tests may write
//! to. Each test uses its own throwaway collection and drops it afterwards.
//!
//! Run tests with: cargo test -p pizzeria-mongodb --test live_mongodb -- --ignored

use futures::TryStreamExt;
use pizzeria_mongodb::runner::{cheap_pizzas, cheap_tomato_pizza, cheese_or_pepper_pizzas};
use pizzeria_mongodb::{
    seed_pizzas, ClientConfig, Connection, DemoRunner, MongoStore, Pizza, PizzaStore,
    RunnerConfig, ValidatedName,
};

const TEST_DATABASE: &str = "pizzeria_test";

fn mongodb_uri() -> String {
    std::env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
}

fn unique_collection(prefix: &str) -> String {
    format!("{}_{}", prefix, bson::oid::ObjectId::new().to_hex())
}

async fn drop_collection(name: &str) {
    let conn = Connection::new(&mongodb_uri()).await.expect("Failed to create client");
    conn.collection::<bson::Document>(TEST_DATABASE, name)
        .drop()
        .await
        .expect("Failed to drop test collection");
    conn.shutdown().await;
}

async fn seeded_store(collection: &str) -> MongoStore {
    let store = MongoStore::connect(
        &mongodb_uri(),
        ClientConfig::default(),
        &ValidatedName::database(TEST_DATABASE).unwrap(),
        &ValidatedName::collection(collection).unwrap(),
    )
    .await
    .expect("Failed to create client");
    let inserted = store.insert_many(&seed_pizzas()).await.expect("Seed insert failed");
    assert_eq!(inserted, 4);
    store
}

fn names(pizzas: &[Pizza]) -> Vec<&str> {
    pizzas.iter().map(|p| p.name.as_str()).collect()
}

#[tokio::test]
#[ignore]
async fn test_queries_against_server() {
    let collection = unique_collection("queries");
    let store = seeded_store(&collection).await;

    let cheap: Vec<Pizza> = store.find(&cheap_pizzas()).await.unwrap().try_collect().await.unwrap();
    assert_eq!(names(&cheap), ["cheese", "royal"]);
    assert!(cheap.iter().all(|p| p.id.is_some()));

    let overlap: Vec<Pizza> = store
        .find(&cheese_or_pepper_pizzas())
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();
    assert_eq!(names(&overlap), ["cheese", "oriental", "queen"]);

    assert!(store.find_one(&cheap_tomato_pizza()).await.unwrap().is_none());

    store.close().await.unwrap();
    drop_collection(&collection).await;
}

#[tokio::test]
#[ignore]
async fn test_full_run_with_seed() {
    let collection = unique_collection("run");
    let config = RunnerConfig {
        database: TEST_DATABASE.to_string(),
        collection: collection.clone(),
        seed: true,
    };
    let mut out = Vec::new();
    let mut err = Vec::new();

    let runner = DemoRunner::connect(&mongodb_uri(), ClientConfig::default(), &config, &mut out, &mut err)
        .await
        .expect("Failed to create client");
    let summary = runner.run().await.expect("Run failed");

    assert_eq!(summary.inserted, Some(4));
    assert_eq!(summary.cheap, ["cheese", "royal"]);
    assert_eq!(summary.failed_steps, 0);
    assert!(err.is_empty());

    drop_collection(&collection).await;
}
