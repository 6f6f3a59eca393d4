//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    /// Free-text size descriptor, possibly several comma-joined sizes
    pub size: Option<String>,
    /// Unit price before discount
    pub price: f64,
    /// Discount in percentage (e.g., 10 = 10%)
    pub discount: f64,
    /// Units on hand, never negative
    pub quantity: i64,
    /// Opaque blob-store reference
    pub image: Option<String>,
    /// Owning shopkeeper account
    pub shopkeeper_id: String,
    pub created_at: i64,
}

impl Product {
    /// Individual sizes from the descriptor
    pub fn sizes(&self) -> Vec<String> {
        self.size
            .as_deref()
            .map(crate::util::split_sizes)
            .unwrap_or_default()
    }

    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub size: Option<String>,
    pub price: f64,
    pub discount: Option<f64>,
    pub quantity: i64,
    pub image: Option<String>,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub size: Option<String>,
    pub price: Option<f64>,
    pub discount: Option<f64>,
    pub quantity: Option<i64>,
    pub image: Option<String>,
}

/// Catalog listing filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub shopkeeper_id: Option<String>,
    pub in_stock: Option<bool>,
}
