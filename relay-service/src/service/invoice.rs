//! Order invoice images.
//!
//! The invoice document is plain HTML/CSS built here; rasterizing it to a
//! PNG is delegated to an external rendering engine behind the
//! [`InvoiceRenderer`] seam. The bundled implementation shells out to
//! `wkhtmltoimage`, reading the document on stdin and writing the PNG to
//! stdout.

use async_trait::async_trait;
use log::debug;
use relay_core::domain::requests::OrderNotification;
use relay_core::RelayError;
use std::process::Stdio;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// HTML-to-PNG rasterizer seam.
#[async_trait]
pub trait InvoiceRenderer: Send + Sync {
    async fn render_png(&self, html: &str) -> Result<Vec<u8>, RelayError>;
}

const RENDER_WIDTH: u32 = 880;

pub struct WkhtmlRenderer {
    binary: String,
}

impl WkhtmlRenderer {
    pub fn new() -> Self {
        Self { binary: "wkhtmltoimage".to_string() }
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self { binary: binary.into() }
    }
}

impl Default for WkhtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InvoiceRenderer for WkhtmlRenderer {
    async fn render_png(&self, html: &str) -> Result<Vec<u8>, RelayError> {
        debug!("rendering invoice html bytes={}", html.len());
        let mut child = Command::new(&self.binary)
            .arg("--format")
            .arg("png")
            .arg("--width")
            .arg(RENDER_WIDTH.to_string())
            .arg("--quality")
            .arg("100")
            .arg("-")
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| RelayError::RenderFailed(format!("failed to spawn {}: {}", self.binary, err)))?;

        if let Some(stdin) = child.stdin.as_mut() {
            stdin
                .write_all(html.as_bytes())
                .await
                .map_err(|err| RelayError::RenderFailed(err.to_string()))?;
        }
        drop(child.stdin.take());

        let output = child
            .wait_with_output()
            .await
            .map_err(|err| RelayError::RenderFailed(err.to_string()))?;
        if !output.status.success() {
            return Err(RelayError::RenderFailed(format!("{} exited with {}", self.binary, output.status)));
        }
        if output.stdout.is_empty() {
            return Err(RelayError::RenderFailed("renderer produced no output".to_string()));
        }
        Ok(output.stdout)
    }
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Order number shown on the invoice: base-36 millisecond timestamp.
pub fn generate_order_number() -> String {
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis()).unwrap_or(0);
    let mut n = millis;
    let mut digits = Vec::new();
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    while n > 0 {
        digits.push(ALPHABET[(n % 36) as usize]);
        n /= 36;
    }
    if digits.is_empty() {
        digits.push(b'0');
    }
    digits.reverse();
    format!("ORD-{}", String::from_utf8_lossy(&digits).to_uppercase())
}

/// Builds the RTL invoice document for one order.
pub fn build_invoice_html(order: &OrderNotification, order_number: &str, date: &str) -> String {
    let items_rows: String = order
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            format!(
                r#"<tr class="{}">
        <td class="product-name">{}</td>
        <td>{}</td>
        <td>{}</td>
        <td>{}</td>
        <td class="price">{} د.أ</td>
      </tr>"#,
                if index % 2 == 0 { "even" } else { "" },
                escape_html(&item.product_name),
                escape_html(&item.color_name),
                escape_html(&item.size),
                item.quantity,
                item.price * f64::from(item.quantity),
            )
        })
        .collect();

    let notes_block = match order.notes.as_deref().map(str::trim) {
        Some(notes) if !notes.is_empty() => format!(
            r#"<div><span class="label">ملاحظات:</span><span class="value">{}</span></div>"#,
            escape_html(notes)
        ),
        _ => String::new(),
    };

    format!(
        r#"<html dir="rtl">
<head>
<style>
  * {{ margin: 0; padding: 0; box-sizing: border-box; }}
  body {{ font-family: 'Segoe UI', Tahoma, Arial, sans-serif; background: #ffffff; padding: 40px; width: 800px; }}
  .invoice {{ background: #ffffff; border-radius: 16px; box-shadow: 0 4px 20px rgba(0,0,0,0.08); overflow: hidden; }}
  .header {{ background: linear-gradient(135deg, #2ecc71 0%, #27ae60 100%); color: #ffffff; padding: 30px 40px; text-align: center; }}
  .header-title {{ font-size: 28px; font-weight: bold; margin-bottom: 10px; }}
  .header-subtitle {{ font-size: 16px; opacity: 0.9; }}
  .order-meta {{ display: flex; justify-content: space-between; padding: 15px 40px; background: #f8f9fa; border-bottom: 1px solid #e0e0e0; font-size: 14px; color: #666; }}
  .content {{ padding: 30px 40px; }}
  .section-title {{ font-size: 18px; font-weight: bold; color: #2c3e50; margin-bottom: 20px; padding-bottom: 10px; border-bottom: 2px solid #e0e0e0; }}
  table {{ width: 100%; border-collapse: collapse; margin-bottom: 30px; }}
  th {{ background: #f8f9fa; padding: 14px 12px; text-align: right; font-weight: 600; color: #333; border-bottom: 2px solid #e0e0e0; }}
  td {{ padding: 14px 12px; border-bottom: 1px solid #eee; color: #444; }}
  tr.even {{ background: #fafafa; }}
  .product-name {{ font-weight: 500; color: #2c3e50; }}
  .price {{ text-align: left; font-weight: 600; color: #27ae60; }}
  .total-row {{ background: linear-gradient(135deg, #2ecc71 0%, #27ae60 100%); border-radius: 10px; padding: 20px 30px; display: flex; justify-content: space-between; align-items: center; color: #ffffff; margin-bottom: 30px; }}
  .total-label {{ font-size: 20px; font-weight: 600; }}
  .total-value {{ font-size: 28px; font-weight: bold; }}
  .customer-info {{ background: #f8f9fa; border-radius: 10px; padding: 20px; margin-bottom: 20px; }}
  .customer-info div {{ display: flex; margin: 8px 0; font-size: 14px; }}
  .customer-info .label {{ color: #666; min-width: 80px; font-weight: 500; }}
  .customer-info .value {{ color: #333; }}
  .footer {{ text-align: center; padding: 25px; background: #f8f9fa; color: #666; font-size: 16px; }}
</style>
</head>
<body>
  <div class="invoice">
    <div class="header">
      <div class="header-title">تم تأكيد طلبك بنجاح</div>
      <div class="header-subtitle">شكراً لثقتك بنا</div>
    </div>
    <div class="order-meta">
      <span>رقم الطلب: {order_number}</span>
      <span>{date}</span>
    </div>
    <div class="content">
      <div class="section-title">تفاصيل الطلب</div>
      <table>
        <thead>
          <tr>
            <th>المنتج</th>
            <th>اللون</th>
            <th>المقاس</th>
            <th>الكمية</th>
            <th style="text-align: left;">السعر</th>
          </tr>
        </thead>
        <tbody>
          {items_rows}
        </tbody>
      </table>
      <div class="total-row">
        <span class="total-label">المجموع الكلي</span>
        <span class="total-value">{total} د.أ</span>
      </div>
      <div class="section-title">معلومات التوصيل</div>
      <div class="customer-info">
        <div><span class="label">الاسم:</span><span class="value">{name}</span></div>
        <div><span class="label">الهاتف:</span><span class="value">{phone}</span></div>
        <div><span class="label">المحافظة:</span><span class="value">{governorate}</span></div>
        <div><span class="label">العنوان:</span><span class="value">{address}</span></div>
        {notes_block}
      </div>
    </div>
    <div class="footer">شكراً لشرائك</div>
  </div>
</body>
</html>"#,
        order_number = escape_html(order_number),
        date = escape_html(date),
        items_rows = items_rows,
        total = order.total_value,
        name = escape_html(&order.customer_name),
        phone = escape_html(&order.customer_phone),
        governorate = escape_html(&order.governorate),
        address = escape_html(&order.address),
        notes_block = notes_block,
    )
}
