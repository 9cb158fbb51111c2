//! Printable HTML bills.

use askama::Template;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BillError {
    #[error("failed to render bill: {0}")]
    Render(#[from] askama::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillLine {
    pub name: String,
    pub quantity: i32,
    pub unit_price: i64,
    pub line_total: i64,
}

/// Everything printed on a bill. Amounts are in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bill {
    pub shop_name: String,
    pub shop_address: Option<String>,
    pub shop_phone: Option<String>,
    pub currency_symbol: String,
    pub order_number: String,
    pub placed_at: DateTime<Utc>,
    pub customer_name: String,
    pub customer_phone: String,
    pub payment_mode: String,
    pub lines: Vec<BillLine>,
    pub subtotal: i64,
    pub tax_rate_bps: i32,
    pub tax_amount: i64,
    pub total_amount: i64,
    pub notes: Option<String>,
}

struct BillRow {
    name: String,
    quantity: i32,
    unit_price: String,
    line_total: String,
}

#[derive(Template)]
#[template(path = "bill.html")]
struct BillTemplate<'a> {
    shop_name: &'a str,
    shop_address: Option<&'a str>,
    shop_phone: Option<&'a str>,
    order_number: &'a str,
    placed_at: String,
    customer_name: &'a str,
    customer_phone: &'a str,
    payment_mode: String,
    rows: Vec<BillRow>,
    subtotal: String,
    tax_rate: String,
    tax_amount: String,
    total_amount: String,
    notes: Option<&'a str>,
}

/// `format_money(1250, "₹")` is `"₹12.50"`.
pub fn format_money(minor: i64, symbol: &str) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    format!("{sign}{symbol}{}.{:02}", abs / 100, abs % 100)
}

/// Basis points as a percentage label: `500` is `"5%"`, `1250` is `"12.5%"`.
pub fn format_rate(bps: i32) -> String {
    let whole = bps / 100;
    let frac = (bps % 100).abs();
    if frac == 0 {
        format!("{whole}%")
    } else {
        let frac = format!("{frac:02}");
        format!("{whole}.{}%", frac.trim_end_matches('0'))
    }
}

fn payment_label(mode: &str) -> String {
    match mode {
        "upi" => "UPI".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn render_bill(bill: &Bill) -> Result<String, BillError> {
    let money = |minor: i64| format_money(minor, &bill.currency_symbol);
    let template = BillTemplate {
        shop_name: &bill.shop_name,
        shop_address: non_empty(&bill.shop_address),
        shop_phone: non_empty(&bill.shop_phone),
        order_number: &bill.order_number,
        placed_at: bill.placed_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        customer_name: &bill.customer_name,
        customer_phone: &bill.customer_phone,
        payment_mode: payment_label(&bill.payment_mode),
        rows: bill
            .lines
            .iter()
            .map(|line| BillRow {
                name: line.name.clone(),
                quantity: line.quantity,
                unit_price: money(line.unit_price),
                line_total: money(line.line_total),
            })
            .collect(),
        subtotal: money(bill.subtotal),
        tax_rate: format_rate(bill.tax_rate_bps),
        tax_amount: money(bill.tax_amount),
        total_amount: money(bill.total_amount),
        notes: non_empty(&bill.notes),
    };
    Ok(template.render()?)
}
