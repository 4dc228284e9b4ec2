use optistore::{InsertPosition, Resource};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Product review. Review screens render recent-first, so confirmed
/// creates go to the front of the collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub product_id: String,
    pub author: String,
    pub body: String,
    pub rating: u8,
    pub created_at: i64,
}

impl Resource for Review {
    const ENDPOINT: &'static str = "/reviews";
    const INSERT: InsertPosition = InsertPosition::Prepend;

    fn id(&self) -> &str {
        &self.id
    }
}

pub fn review(id: &str, body: &str, created_at: i64) -> Review {
    Review {
        id: id.to_string(),
        product_id: "p-1".to_string(),
        author: "ann".to_string(),
        body: body.to_string(),
        rating: 5,
        created_at,
    }
}

pub fn review_value(id: &str, body: &str, created_at: i64) -> Value {
    serde_json::to_value(review(id, body, created_at)).unwrap()
}

/// Cart line item; the price can be absent while product data loads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: String,
    pub product_id: String,
    pub unit_price: Option<f64>,
    pub quantity: u32,
}

impl Resource for CartLine {
    const ENDPOINT: &'static str = "/cart-items";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Payment type rows on the admin screen; plain append-ordered table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaymentType {
    pub id: String,
    pub name: String,
    pub enabled: bool,
}

impl Resource for PaymentType {
    const ENDPOINT: &'static str = "/payment-types";

    fn id(&self) -> &str {
        &self.id
    }
}

pub fn payment_type(id: &str, name: &str) -> PaymentType {
    PaymentType {
        id: id.to_string(),
        name: name.to_string(),
        enabled: true,
    }
}
