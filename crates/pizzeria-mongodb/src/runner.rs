//! The demo sequence: seed, three queries, close
//!
//! Each step catches its own store errors, prints them to the error stream
//! and lets the run continue. Only failures to write output escape the
//! sequence. Whatever happens, the store is closed exactly once at the end.

use crate::connection::ClientConfig;
use crate::document::{seed_pizzas, Pizza};
use crate::query::PizzaQuery;
use crate::store::{MongoStore, PizzaStore};
use crate::validation::ValidatedName;
use futures::TryStreamExt;
use pizzeria_common::{PizzeriaError, Result};
use std::io::Write;
use tracing::{error, info};

pub const DEFAULT_DATABASE: &str = "PIZZASJS";
pub const DEFAULT_COLLECTION: &str = "PIZZAS";

const BANNER: &str = "**********************";

/// Where the demo runs and whether it seeds first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    pub database: String,
    pub collection: String,
    /// Insert the sample pizzas before querying
    pub seed: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            seed: false,
        }
    }
}

/// What a run did, for logging and tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// `None` when seeding was skipped or failed
    pub inserted: Option<usize>,
    pub cheap: Vec<String>,
    pub cheese_or_pepper: Vec<String>,
    pub cheap_tomato: Option<String>,
    /// Steps that reported an error and were skipped over
    pub failed_steps: usize,
}

/// `price < 10`, by name
pub fn cheap_pizzas() -> PizzaQuery {
    PizzaQuery::new().price_lt(10.0).sort_by_name()
}

/// `toppings` has cheese or pepper, by name
pub fn cheese_or_pepper_pizzas() -> PizzaQuery {
    PizzaQuery::new().toppings_in(["cheese", "pepper"]).sort_by_name()
}

/// `toppings` has tomato and `price < 3`
pub fn cheap_tomato_pizza() -> PizzaQuery {
    PizzaQuery::new().topping("tomato").price_lt(3.0)
}

/// Drives one connect → seed → query → close sequence.
///
/// `out` receives results, `err` receives recoverable failures.
pub struct DemoRunner<S, O, E> {
    store: S,
    seed: bool,
    out: O,
    err: E,
    summary: RunSummary,
}

impl<O: Write, E: Write> DemoRunner<MongoStore, O, E> {
    /// Validate the names in `config`, build a MongoDB-backed runner and
    /// ping the server.
    ///
    /// An unreachable deployment fails here, before any step runs; the client
    /// is shut down before the error is returned.
    pub async fn connect(
        connection_string: &str,
        client_config: ClientConfig,
        config: &RunnerConfig,
        out: O,
        err: E,
    ) -> Result<Self> {
        let database = ValidatedName::database(&config.database)?;
        let collection = ValidatedName::collection(&config.collection)?;
        let store = MongoStore::connect(connection_string, client_config, &database, &collection).await?;

        if let Err(e) = store.ping().await {
            error!(error = %e, "initial connect failed");
            store.close().await?;
            return Err(e);
        }

        info!(%database, %collection, seed = config.seed, "connected");
        Ok(Self::new(store, config.seed, out, err))
    }
}

impl<S: PizzaStore, O: Write, E: Write> DemoRunner<S, O, E> {
    pub fn new(store: S, seed: bool, out: O, err: E) -> Self {
        Self {
            store,
            seed,
            out,
            err,
            summary: RunSummary::default(),
        }
    }

    /// Run every step, then close the store.
    ///
    /// An error from the steps takes precedence over an error from closing.
    pub async fn run(mut self) -> Result<RunSummary> {
        let outcome = self.run_steps().await;

        let DemoRunner { store, summary, .. } = self;
        let closed = store.close().await;

        outcome?;
        closed?;
        Ok(summary)
    }

    async fn run_steps(&mut self) -> Result<()> {
        if self.seed {
            self.seed_step().await?;
        }
        self.cheap_step().await?;
        self.cheese_or_pepper_step().await?;
        self.cheap_tomato_step().await?;
        self.out.flush()?;
        Ok(())
    }

    async fn seed_step(&mut self) -> Result<()> {
        match self.store.insert_many(&seed_pizzas()).await {
            Ok(count) => {
                writeln!(self.out, "{} documents successfully inserted.\n", count)?;
                self.summary.inserted = Some(count);
                Ok(())
            }
            Err(e) => self.recover("Something went wrong trying to insert the new documents", e),
        }
    }

    async fn cheap_step(&mut self) -> Result<()> {
        writeln!(self.out, "{} price: {{ $lt: 10 }}", BANNER)?;
        let result = self
            .print_each(&cheap_pizzas(), |p| {
                format!(
                    "{} has {} toppings and costs {}$ to make.\n",
                    p.name,
                    p.toppings.len(),
                    p.price
                )
            })
            .await;
        match result {
            Ok(names) => {
                self.summary.cheap = names;
                Ok(())
            }
            Err(e) => self.recover("Something went wrong trying to find the documents", e),
        }
    }

    async fn cheese_or_pepper_step(&mut self) -> Result<()> {
        writeln!(self.out, "{} toppings: {{ $in: [\"cheese\", \"pepper\"] }}", BANNER)?;
        let result = self
            .print_each(&cheese_or_pepper_pizzas(), |p| {
                format!("{} has \"cheese\" or \"pepper\" toppings \n", p.name)
            })
            .await;
        match result {
            Ok(names) => {
                self.summary.cheese_or_pepper = names;
                Ok(())
            }
            Err(e) => self.recover("Something went wrong trying to find the documents", e),
        }
    }

    async fn cheap_tomato_step(&mut self) -> Result<()> {
        writeln!(self.out, "{} toppings: \"tomato\", price: {{ $lt: 3 }}", BANNER)?;
        let found = match self.store.find_one(&cheap_tomato_pizza()).await {
            Ok(found) => found,
            Err(e) => return self.recover("Something went wrong trying to find one document", e),
        };

        match found {
            None => writeln!(
                self.out,
                "Couldn't find any pizzas that contain 'tomato' as an ingredient and price less than 3$.\n"
            )?,
            Some(pizza) => {
                writeln!(
                    self.out,
                    "Found a pizza with 'tomato' as an ingredient and price less than 3$:\n{}\n",
                    pizza.to_json()?
                )?;
                self.summary.cheap_tomato = Some(pizza.name);
            }
        }
        Ok(())
    }

    /// Stream `query`, writing one line per pizza. Returns the names seen.
    ///
    /// Lines already written stay written if the cursor fails midway.
    async fn print_each<F>(&mut self, query: &PizzaQuery, line: F) -> Result<Vec<String>>
    where
        F: Fn(&Pizza) -> String,
    {
        let mut cursor = self.store.find(query).await?;
        let mut names = Vec::new();
        while let Some(pizza) = cursor.try_next().await? {
            writeln!(self.out, "{}", line(&pizza))?;
            names.push(pizza.name);
        }
        Ok(names)
    }

    /// Report a failed step and keep going. Output errors are not
    /// recoverable and are handed back.
    fn recover(&mut self, context: &str, e: PizzeriaError) -> Result<()> {
        if let PizzeriaError::Io(_) = e {
            return Err(e);
        }
        error!(error = %e, remote = e.is_remote(), "{}", context);
        writeln!(self.err, "{}: {}\n", context, e)?;
        self.summary.failed_steps += 1;
        Ok(())
    }
}
