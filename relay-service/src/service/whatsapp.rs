//! WhatsApp Cloud API order notifications.
//!
//! One order fans out to two template sends: the customer's receipt and a
//! copy to the store's own number when one is configured. Each send gets
//! its own outcome; one failing never aborts the other. When the invoice
//! pipeline (render + upload) succeeds, the template carries a header
//! image with the public invoice URL; otherwise the text-only template
//! still goes out.

use crate::service::invoice::{build_invoice_html, generate_order_number, InvoiceRenderer};
use crate::service::storage::InvoiceStore;
use async_trait::async_trait;
use log::{debug, error, info, warn};
use relay_core::constants::MAX_PRODUCTS_TEXT_LENGTH;
use relay_core::domain::phone::normalize_phone;
use relay_core::domain::requests::{OrderItem, OrderNotification};
use relay_core::RelayError;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Outcome of one template send.
#[derive(Debug, Clone)]
pub struct DeliveryOutcome {
    pub success: bool,
    pub error: Option<String>,
}

impl DeliveryOutcome {
    pub fn ok() -> Self {
        Self { success: true, error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { success: false, error: Some(error.into()) }
    }
}

/// Customer and store results for one order.
#[derive(Debug, Clone)]
pub struct NotifyReport {
    pub customer: DeliveryOutcome,
    pub store: DeliveryOutcome,
}

impl NotifyReport {
    pub fn any_delivered(&self) -> bool {
        self.customer.success || self.store.success
    }
}

/// Seam the notify-order handler talks to.
#[async_trait]
pub trait OrderNotifier: Send + Sync {
    async fn notify_order(&self, order: &OrderNotification) -> NotifyReport;
}

#[derive(Debug, Deserialize)]
struct GraphErrorBody {
    error: Option<GraphError>,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    message: Option<String>,
}

/// Formats order items for the template's products parameter, staying
/// under WhatsApp's 1024-character parameter cap.
pub fn format_products(items: &[OrderItem]) -> String {
    let mut text = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            format!(
                "{}. {}\n   اللون: {} | المقاس: {}\n   الكمية: {} × {} د.أ",
                index + 1,
                item.product_name,
                item.color_name,
                item.size,
                item.quantity,
                item.price,
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    if text.chars().count() > MAX_PRODUCTS_TEXT_LENGTH {
        text = text.chars().take(MAX_PRODUCTS_TEXT_LENGTH - 20).collect();
        text.push_str("\n... (المزيد)");
    }
    text
}

/// Builds the `purchase_receipt` template payload for one recipient.
/// Body parameters, in template order: name, phone, governorate, address,
/// notes, products, total.
pub fn build_template_payload(
    to: &str,
    template_name: &str,
    template_language: &str,
    order: &OrderNotification,
    products: &str,
    invoice_url: Option<&str>,
) -> Value {
    let notes = match order.notes.as_deref().map(str::trim) {
        Some(notes) if !notes.is_empty() => notes,
        _ => "لا يوجد",
    };

    let mut components = Vec::new();
    if let Some(url) = invoice_url {
        components.push(json!({
            "type": "header",
            "parameters": [{ "type": "image", "image": { "link": url } }],
        }));
    }
    components.push(json!({
        "type": "body",
        "parameters": [
            { "type": "text", "text": order.customer_name },
            { "type": "text", "text": order.customer_phone },
            { "type": "text", "text": order.governorate },
            { "type": "text", "text": order.address },
            { "type": "text", "text": notes },
            { "type": "text", "text": products },
            { "type": "text", "text": order.total_value.to_string() },
        ],
    }));

    json!({
        "messaging_product": "whatsapp",
        "to": to,
        "type": "template",
        "template": {
            "name": template_name,
            "language": { "code": template_language },
            "components": components,
        },
    })
}

pub struct WhatsAppCloudNotifier {
    http: Client,
    messages_url: String,
    access_token: String,
    template_name: String,
    template_language: String,
    store_phone: Option<String>,
    renderer: Arc<dyn InvoiceRenderer>,
    store: Arc<dyn InvoiceStore>,
}

impl WhatsAppCloudNotifier {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        http: Client,
        messages_url: String,
        access_token: String,
        template_name: String,
        template_language: String,
        store_phone: Option<String>,
        renderer: Arc<dyn InvoiceRenderer>,
        store: Arc<dyn InvoiceStore>,
    ) -> Self {
        Self { http, messages_url, access_token, template_name, template_language, store_phone, renderer, store }
    }

    /// Render + upload the invoice. Every failure path degrades to `None`;
    /// the notification itself must not depend on the invoice pipeline.
    async fn invoice_url(&self, order: &OrderNotification) -> Option<String> {
        let order_number = generate_order_number();
        let date = current_date();
        let html = build_invoice_html(order, &order_number, &date);
        let png = match self.renderer.render_png(&html).await {
            Ok(png) => png,
            Err(err) => {
                warn!("invoice render failed order_number={} error={}", order_number, err);
                return None;
            }
        };
        match self.store.upload_png(png).await {
            Ok(url) => Some(url),
            Err(RelayError::StorageNotConfigured) => {
                debug!("invoice upload skipped: storage not configured");
                None
            }
            Err(err) => {
                warn!("invoice upload failed order_number={} error={}", order_number, err);
                None
            }
        }
    }

    async fn send_template(&self, to: &str, order: &OrderNotification, products: &str, invoice_url: Option<&str>) -> DeliveryOutcome {
        let payload =
            build_template_payload(to, &self.template_name, &self.template_language, order, products, invoice_url);

        let response = match self
            .http
            .post(&self.messages_url)
            .bearer_auth(&self.access_token)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                error!("whatsapp send failed to={} error={}", to, err);
                return DeliveryOutcome::failed(format!("network error: {}", err));
            }
        };

        let status = response.status();
        if status.is_success() {
            info!("whatsapp template sent to={}", to);
            return DeliveryOutcome::ok();
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<GraphErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .and_then(|e| e.message)
            .unwrap_or_else(|| format!("http_status={}", status));
        error!("whatsapp template rejected to={} status={} message={}", to, status, message);
        DeliveryOutcome::failed(message)
    }
}

#[async_trait]
impl OrderNotifier for WhatsAppCloudNotifier {
    async fn notify_order(&self, order: &OrderNotification) -> NotifyReport {
        let products = format_products(&order.items);
        let invoice_url = self.invoice_url(order).await;

        let customer_phone = normalize_phone(Some(&order.customer_phone));
        let customer = if customer_phone.is_valid() {
            self.send_template(customer_phone.normalized(), order, &products, invoice_url.as_deref()).await
        } else {
            let reason = customer_phone
                .error()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "invalid phone".to_string());
            warn!("customer notification skipped reason={}", reason);
            DeliveryOutcome::failed(reason)
        };

        let store = match self.store_phone.as_deref() {
            None => DeliveryOutcome::failed("store phone not configured"),
            Some(raw) => {
                let store_phone = normalize_phone(Some(raw));
                if store_phone.is_valid() {
                    self.send_template(store_phone.normalized(), order, &products, invoice_url.as_deref()).await
                } else {
                    // A bad store number is an operator mistake, not a
                    // request failure.
                    warn!("store phone invalid raw={:?} normalized={:?}", raw, store_phone.normalized());
                    DeliveryOutcome::failed("store phone not configured")
                }
            }
        };

        NotifyReport { customer, store }
    }
}

fn current_date() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}
