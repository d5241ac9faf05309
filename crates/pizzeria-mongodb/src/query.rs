//! Query builder for pizza lookups
//!
//! A [`PizzaQuery`] renders to the filter and sort documents the driver
//! expects, and can also evaluate itself against a [`Pizza`] in process so the
//! in-memory store answers exactly what the server would.

use crate::document::Pizza;
use bson::{doc, Bson, Document as BsonDocument};
use std::cmp::Ordering;

/// Filter, sort and limit for a find on the pizza collection.
///
/// Predicates that are set are combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PizzaQuery {
    price_lt: Option<f64>,
    toppings_in: Option<Vec<String>>,
    topping: Option<String>,
    sort_by_name: bool,
    limit: Option<i64>,
}

impl PizzaQuery {
    /// Create an empty query matching every document
    pub fn new() -> Self {
        Self::default()
    }

    /// `price < limit`
    pub fn price_lt(mut self, limit: f64) -> Self {
        self.price_lt = Some(limit);
        self
    }

    /// `toppings` shares at least one element with `toppings`
    pub fn toppings_in<I, S>(mut self, toppings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.toppings_in = Some(toppings.into_iter().map(Into::into).collect());
        self
    }

    /// `toppings` contains `topping`
    pub fn topping(mut self, topping: impl Into<String>) -> Self {
        self.topping = Some(topping.into());
        self
    }

    /// Ascending by `name`
    pub fn sort_by_name(mut self) -> Self {
        self.sort_by_name = true;
        self
    }

    /// Set the maximum number of documents to return
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Get the limit value
    pub fn get_limit(&self) -> Option<i64> {
        self.limit
    }

    /// Filter document for the driver
    pub fn filter_document(&self) -> BsonDocument {
        let mut filter = BsonDocument::new();
        match (&self.topping, &self.toppings_in) {
            // An equality and an $in cannot share the "toppings" key.
            (Some(topping), Some(toppings)) => {
                filter.insert(
                    "$and",
                    vec![
                        Bson::Document(doc! { "toppings": topping.as_str() }),
                        Bson::Document(doc! { "toppings": { "$in": toppings.clone() } }),
                    ],
                );
            }
            (Some(topping), None) => {
                filter.insert("toppings", topping.as_str());
            }
            (None, Some(toppings)) => {
                filter.insert("toppings", doc! { "$in": toppings.clone() });
            }
            (None, None) => {}
        }
        if let Some(limit) = self.price_lt {
            filter.insert("price", doc! { "$lt": limit });
        }
        filter
    }

    /// Sort document for the driver, if any
    pub fn sort_document(&self) -> Option<BsonDocument> {
        self.sort_by_name.then(|| doc! { "name": 1 })
    }

    /// Evaluate the filter the way the server does
    pub fn matches(&self, pizza: &Pizza) -> bool {
        if let Some(limit) = self.price_lt {
            if pizza.price.partial_cmp(&limit) != Some(Ordering::Less) {
                return false;
            }
        }
        if let Some(topping) = &self.topping {
            if !pizza.has_topping(topping) {
                return false;
            }
        }
        if let Some(toppings) = &self.toppings_in {
            if !toppings.iter().any(|t| pizza.has_topping(t)) {
                return false;
            }
        }
        true
    }

    /// Apply filter, sort and limit to an in-process set of pizzas
    pub fn apply<'a, I>(&self, pizzas: I) -> Vec<Pizza>
    where
        I: IntoIterator<Item = &'a Pizza>,
    {
        let mut results: Vec<Pizza> = pizzas
            .into_iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect();

        if self.sort_by_name {
            // Binary comparison, like the server's default collation. Stable,
            // so duplicate names keep insertion order.
            results.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        }

        // The driver treats a negative limit as "single batch of |n|".
        if let Some(limit) = self.limit.filter(|l| *l != 0) {
            results.truncate(limit.unsigned_abs() as usize);
        }

        results
    }
}
