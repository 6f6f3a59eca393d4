//! Cart Model

use serde::{Deserialize, Serialize};

/// One cart line joined with the product's current catalog state
///
/// This is what checkout reads: the requested quantity next to the live
/// price, discount, stock and owning shopkeeper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartLineDetail {
    pub product_id: String,
    pub product_name: String,
    /// Requested quantity
    pub quantity: i64,
    pub price: f64,
    pub discount: f64,
    /// Product's current on-hand quantity
    pub stock: i64,
    pub shopkeeper_id: String,
    pub image: Option<String>,
}

/// Cart line as returned to the customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub price: f64,
    pub discount: f64,
    /// Price after discount
    pub final_price: f64,
    pub subtotal: f64,
    pub stock: i64,
    pub image: Option<String>,
}

/// Cart contents with a running total
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub total: f64,
}

/// Add-to-cart payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartAdd {
    pub product_id: String,
    pub quantity: i64,
}

/// Set-quantity payload; zero removes the line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartUpdate {
    pub quantity: i64,
}

/// Replace the whole cart (client-side cart merge)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSync {
    pub items: Vec<CartAdd>,
}
