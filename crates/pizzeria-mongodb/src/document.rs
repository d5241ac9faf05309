//! The pizza document and the sample data used to seed a collection

use bson::oid::ObjectId;
use pizzeria_common::{PizzeriaError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A pizza stored in the collection.
///
/// Nothing here is enforced server-side: names may repeat and the database
/// accepts whatever shape it is given. Documents that do not fit this struct
/// surface as deserialization errors while reading a cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pizza {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub toppings: Vec<String>,
    /// Stored integers are widened to `f64` on read.
    pub price: f64,
}

impl Pizza {
    pub fn new<I, S>(name: impl Into<String>, toppings: I, price: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: None,
            name: name.into(),
            toppings: toppings.into_iter().map(Into::into).collect(),
            price,
        }
    }

    pub fn has_topping(&self, topping: &str) -> bool {
        self.toppings.iter().any(|t| t == topping)
    }

    /// Single-line JSON rendering, `_id` included when present. Integral
    /// prices are written without a fraction (`4`, not `4.0`).
    pub fn to_json(&self) -> Result<String> {
        let view = PizzaJson {
            id: self.id.as_ref(),
            name: &self.name,
            toppings: &self.toppings,
            price: json_price(self.price)?,
        };
        Ok(serde_json::to_string(&view)?)
    }
}

#[derive(Serialize)]
struct PizzaJson<'a> {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<&'a ObjectId>,
    name: &'a str,
    toppings: &'a [String],
    price: Number,
}

/// Largest integer an `f64` holds exactly
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn json_price(price: f64) -> Result<Number> {
    if price.fract() == 0.0 && price.abs() <= MAX_EXACT_INTEGER {
        return Ok(Number::from(price as i64));
    }
    Number::from_f64(price)
        .ok_or_else(|| PizzeriaError::Serialization(format!("price is not a finite number: {}", price)))
}

/// The four pizzas inserted by the opt-in seed step, in insertion order.
pub fn seed_pizzas() -> Vec<Pizza> {
    vec![
        Pizza::new("queen", ["chicken", "mushroom", "tomato", "cheese"], 10.0),
        Pizza::new("cheese", ["cheese", "tomato"], 4.0),
        Pizza::new("oriental", ["tomato", "sausage", "mushroom", "pepper"], 12.0),
        Pizza::new("royal", ["tomato", "garlic"], 5.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_seed_pizzas() {
        let pizzas = seed_pizzas();
        let names: Vec<&str> = pizzas.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["queen", "cheese", "oriental", "royal"]);
        assert!(pizzas.iter().all(|p| p.id.is_none()));
        assert_eq!(pizzas[2].toppings.len(), 4);
    }

    #[test]
    fn test_to_bson_skips_missing_id() {
        let bson = bson::to_document(&Pizza::new("royal", ["tomato", "garlic"], 5.0)).unwrap();
        assert!(!bson.contains_key("_id"));
        assert_eq!(bson.get_str("name").unwrap(), "royal");
        assert_eq!(bson.get_f64("price").unwrap(), 5.0);
        assert_eq!(bson.get_array("toppings").unwrap().len(), 2);
    }

    #[test]
    fn test_from_bson_accepts_integer_price() {
        let id = ObjectId::new();
        let bson = doc! {
            "_id": id,
            "name": "queen",
            "toppings": ["chicken", "cheese"],
            "price": 10_i32,
        };

        let pizza: Pizza = bson::from_document(bson).unwrap();
        assert_eq!(pizza.id, Some(id));
        assert_eq!(pizza.price, 10.0);
        assert!(pizza.has_topping("cheese"));
        assert!(!pizza.has_topping("pepper"));
    }

    #[test]
    fn test_from_bson_rejects_missing_toppings() {
        let result: std::result::Result<Pizza, _> =
            bson::from_document(doc! { "name": "plain", "price": 3 });
        let err: PizzeriaError = result.unwrap_err().into();
        assert!(matches!(err, PizzeriaError::Deserialization(_)));
    }

    #[test]
    fn test_to_json_is_single_line() {
        let json = Pizza::new("cheese", ["cheese", "tomato"], 4.0).to_json().unwrap();
        assert_eq!(
            json,
            r#"{"name":"cheese","toppings":["cheese","tomato"],"price":4}"#
        );
    }

    #[test]
    fn test_to_json_keeps_fractional_price() {
        let json = Pizza::new("margherita", ["tomato"], 2.5).to_json().unwrap();
        assert!(json.ends_with(r#""price":2.5}"#));
    }

    #[test]
    fn test_to_json_includes_id_first() {
        let mut pizza = Pizza::new("royal", ["tomato", "garlic"], 5.0);
        let id = ObjectId::new();
        pizza.id = Some(id);
        let json = pizza.to_json().unwrap();
        assert!(json.starts_with(&format!(r#"{{"_id":{{"$oid":"{}"}},"name":"royal""#, id.to_hex())));
        assert!(json.ends_with(r#""price":5}"#));
    }

    #[test]
    fn test_to_json_rejects_non_finite_price() {
        let err = Pizza::new("broken", ["tomato"], f64::NAN).to_json().unwrap_err();
        assert!(matches!(err, PizzeriaError::Serialization(_)));
    }
}
