//! Meta Conversion API wire types and event builders.
//!
//! The builders are pure: they take the validated request, the caller's
//! client IP and an event timestamp, and produce the exact payload the
//! Conversion API expects, hashing PII along the way. All I/O lives in
//! `relay-service`.

use crate::constants::{COUNTRY_ISO, CURRENCY};
use crate::domain::hashing::{hash_pii, hash_pii_required};
use crate::domain::ids::generate_event_id;
use crate::domain::phone::normalize_phone_compat;
use crate::domain::requests::{AddToCartRequest, InitiateCheckoutRequest, PurchaseRequest, ViewContentRequest};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventName {
    Purchase,
    AddToCart,
    InitiateCheckout,
    ViewContent,
}

impl EventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::Purchase => "Purchase",
            EventName::AddToCart => "AddToCart",
            EventName::InitiateCheckout => "InitiateCheckout",
            EventName::ViewContent => "ViewContent",
        }
    }
}

/// Hashed and plaintext matching signals for one event.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ph: Option<Vec<String>>,
    #[serde(rename = "fn", skip_serializing_if = "Option::is_none")]
    pub fn_: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ln: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ct: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fbc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fbp: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentItem {
    pub id: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_price: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CustomData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<ContentItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_items: Option<u32>,
}

/// One server event in Conversion API shape.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionEvent {
    pub event_name: &'static str,
    pub event_time: u64,
    pub event_id: String,
    pub event_source_url: String,
    pub action_source: &'static str,
    pub user_data: UserData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<CustomData>,
}

impl ConversionEvent {
    fn new(name: EventName, event_id: String, source_url: String, event_time: u64, user_data: UserData) -> Self {
        Self {
            event_name: name.as_str(),
            event_time,
            event_id,
            event_source_url: source_url,
            action_source: "website",
            user_data,
            custom_data: None,
        }
    }
}

/// Storefront-supplied id wins; an absent one gets the server fallback so
/// deduplication still has something to key on.
fn resolve_event_id(supplied: &str) -> String {
    let supplied = supplied.trim();
    if supplied.is_empty() {
        generate_event_id()
    } else {
        supplied.to_string()
    }
}

fn split_name(full: &str) -> (String, String) {
    let mut parts = full.trim().split_whitespace();
    let first = parts.next().unwrap_or("").to_string();
    let last = parts.collect::<Vec<_>>().join(" ");
    (first, last)
}

fn anonymous_user_data(client_ip: &str, user_agent: &str, fbp: Option<&str>) -> UserData {
    UserData {
        client_ip_address: Some(client_ip.to_string()),
        client_user_agent: Some(user_agent.to_string()),
        fbp: fbp.map(str::to_string),
        ..UserData::default()
    }
}

/// Builds a Purchase event with the full hashed identity block.
pub fn purchase_event(req: &PurchaseRequest, client_ip: &str, event_time: u64) -> ConversionEvent {
    let (first_name, last_name) = split_name(&req.customer_name);
    let phone = normalize_phone_compat(Some(&req.customer_phone));

    let user_data = UserData {
        ph: Some(vec![hash_pii_required(&phone)]),
        fn_: hash_pii(&first_name).map(|h| vec![h]),
        ln: hash_pii(&last_name).map(|h| vec![h]),
        ct: hash_pii(&req.city).map(|h| vec![h]),
        country: Some(vec![hash_pii_required(COUNTRY_ISO)]),
        client_ip_address: Some(client_ip.to_string()),
        client_user_agent: Some(req.user_agent.clone()),
        fbc: req.fbc.clone(),
        fbp: req.fbp.clone(),
    };

    let mut event = ConversionEvent::new(
        EventName::Purchase,
        resolve_event_id(&req.event_id),
        req.source_url.clone(),
        event_time,
        user_data,
    );
    event.custom_data = Some(CustomData {
        value: Some(req.total_value),
        currency: Some(CURRENCY.to_string()),
        content_type: Some("product".to_string()),
        content_ids: Some(req.items.iter().map(|i| i.product_id.clone()).collect()),
        contents: Some(
            req.items
                .iter()
                .map(|i| ContentItem { id: i.product_id.clone(), quantity: i.quantity, item_price: Some(i.price) })
                .collect(),
        ),
        num_items: Some(req.items.iter().map(|i| i.quantity).sum()),
    });
    event
}

pub fn add_to_cart_event(req: &AddToCartRequest, client_ip: &str, event_time: u64) -> ConversionEvent {
    let mut event = ConversionEvent::new(
        EventName::AddToCart,
        resolve_event_id(&req.event_id),
        req.source_url.clone(),
        event_time,
        anonymous_user_data(client_ip, &req.user_agent, req.fbp.as_deref()),
    );
    event.custom_data = Some(CustomData {
        value: Some(req.price * f64::from(req.quantity)),
        currency: Some(CURRENCY.to_string()),
        content_type: Some("product".to_string()),
        content_ids: Some(vec![req.product_id.clone()]),
        contents: Some(vec![ContentItem {
            id: req.product_id.clone(),
            quantity: req.quantity,
            item_price: Some(req.price),
        }]),
        num_items: None,
    });
    event
}

pub fn initiate_checkout_event(req: &InitiateCheckoutRequest, client_ip: &str, event_time: u64) -> ConversionEvent {
    let mut event = ConversionEvent::new(
        EventName::InitiateCheckout,
        resolve_event_id(&req.event_id),
        req.source_url.clone(),
        event_time,
        anonymous_user_data(client_ip, &req.user_agent, req.fbp.as_deref()),
    );
    event.custom_data = Some(CustomData {
        value: Some(req.total_value),
        currency: Some(CURRENCY.to_string()),
        content_type: Some("product".to_string()),
        content_ids: Some(req.items.iter().map(|i| i.product_id.clone()).collect()),
        contents: Some(
            req.items
                .iter()
                .map(|i| ContentItem { id: i.product_id.clone(), quantity: i.quantity, item_price: Some(i.price) })
                .collect(),
        ),
        num_items: Some(req.items.iter().map(|i| i.quantity).sum()),
    });
    event
}

pub fn view_content_event(req: &ViewContentRequest, client_ip: &str, event_time: u64) -> ConversionEvent {
    let mut event = ConversionEvent::new(
        EventName::ViewContent,
        resolve_event_id(&req.event_id),
        req.source_url.clone(),
        event_time,
        anonymous_user_data(client_ip, &req.user_agent, req.fbp.as_deref()),
    );
    event.custom_data = Some(CustomData {
        value: Some(req.price),
        currency: Some(CURRENCY.to_string()),
        content_type: Some("product".to_string()),
        content_ids: Some(vec![req.product_id.clone()]),
        contents: Some(vec![ContentItem { id: req.product_id.clone(), quantity: 1, item_price: Some(req.price) }]),
        num_items: None,
    });
    event
}
