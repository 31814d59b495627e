//! Inbound request types and their validation.
//!
//! Serde handles shape; `validate()` enforces the field-level rules the
//! storefront contract promises, collecting every problem so the caller
//! can return them all at once.

use serde::Deserialize;

/// One purchased line item as reported by the checkout flow.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItem {
    pub product_id: String,
    pub product_name: String,
    pub color_name: String,
    pub price: f64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub customer_name: String,
    pub customer_phone: String,
    pub city: String,
    pub items: Vec<PurchaseItem>,
    pub total_value: f64,
    /// Deduplication id shared with the browser pixel; generated
    /// server-side when absent.
    #[serde(default)]
    pub event_id: String,
    pub source_url: String,
    pub fbc: Option<String>,
    pub fbp: Option<String>,
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: String,
    pub product_name: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default)]
    pub event_id: String,
    pub source_url: String,
    pub fbp: Option<String>,
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    pub product_id: String,
    pub quantity: u32,
    pub price: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateCheckoutRequest {
    pub items: Vec<CheckoutItem>,
    pub total_value: f64,
    #[serde(default)]
    pub event_id: String,
    pub source_url: String,
    pub fbp: Option<String>,
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewContentRequest {
    pub product_id: String,
    pub product_name: String,
    pub price: f64,
    pub category: Option<String>,
    #[serde(default)]
    pub event_id: String,
    pub source_url: String,
    pub fbp: Option<String>,
    pub user_agent: String,
}

/// One line item of an order notification, sized for the receipt template.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_name: String,
    pub color_name: String,
    pub size: String,
    pub price: f64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderNotification {
    pub customer_name: String,
    pub customer_phone: String,
    pub governorate: String,
    pub address: String,
    pub notes: Option<String>,
    pub items: Vec<OrderItem>,
    pub total_value: f64,
}

fn require_min_len(errors: &mut Vec<String>, field: &str, value: &str, min: usize) {
    if value.trim().chars().count() < min {
        errors.push(format!("{} must be at least {} characters", field, min));
    }
}

fn require_positive(errors: &mut Vec<String>, field: &str, value: f64) {
    if !(value > 0.0) {
        errors.push(format!("{} must be positive", field));
    }
}

fn require_quantity(errors: &mut Vec<String>, field: &str, value: u32) {
    if value == 0 {
        errors.push(format!("{} must be at least 1", field));
    }
}

fn require_url(errors: &mut Vec<String>, field: &str, value: &str) {
    if !(value.starts_with("https://") || value.starts_with("http://")) {
        errors.push(format!("{} must be an http(s) URL", field));
    }
}

fn finish(errors: Vec<String>) -> Result<(), Vec<String>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

impl PurchaseRequest {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        require_min_len(&mut errors, "customerName", &self.customer_name, 2);
        require_min_len(&mut errors, "customerPhone", &self.customer_phone, 9);
        require_min_len(&mut errors, "city", &self.city, 2);
        if self.items.is_empty() {
            errors.push("items must contain at least one product".to_string());
        }
        for (idx, item) in self.items.iter().enumerate() {
            require_positive(&mut errors, &format!("items[{}].price", idx), item.price);
            require_quantity(&mut errors, &format!("items[{}].quantity", idx), item.quantity);
        }
        require_positive(&mut errors, "totalValue", self.total_value);
        require_url(&mut errors, "sourceUrl", &self.source_url);
        finish(errors)
    }
}

impl AddToCartRequest {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        require_positive(&mut errors, "price", self.price);
        require_quantity(&mut errors, "quantity", self.quantity);
        require_url(&mut errors, "sourceUrl", &self.source_url);
        finish(errors)
    }
}

impl InitiateCheckoutRequest {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.items.is_empty() {
            errors.push("items must contain at least one product".to_string());
        }
        for (idx, item) in self.items.iter().enumerate() {
            require_positive(&mut errors, &format!("items[{}].price", idx), item.price);
            require_quantity(&mut errors, &format!("items[{}].quantity", idx), item.quantity);
        }
        require_positive(&mut errors, "totalValue", self.total_value);
        require_url(&mut errors, "sourceUrl", &self.source_url);
        finish(errors)
    }
}

impl ViewContentRequest {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        require_positive(&mut errors, "price", self.price);
        require_url(&mut errors, "sourceUrl", &self.source_url);
        finish(errors)
    }
}

impl OrderNotification {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        require_min_len(&mut errors, "customerName", &self.customer_name, 2);
        require_min_len(&mut errors, "customerPhone", &self.customer_phone, 9);
        require_min_len(&mut errors, "governorate", &self.governorate, 2);
        require_min_len(&mut errors, "address", &self.address, 5);
        if self.items.is_empty() {
            errors.push("items must contain at least one product".to_string());
        }
        for (idx, item) in self.items.iter().enumerate() {
            require_positive(&mut errors, &format!("items[{}].price", idx), item.price);
            require_quantity(&mut errors, &format!("items[{}].quantity", idx), item.quantity);
        }
        require_positive(&mut errors, "totalValue", self.total_value);
        finish(errors)
    }
}
