use crate::domain::timestamp::parse_timestamp;
use crate::error::{ReportError, Result};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

/// Lifecycle status reported by the payment-link provider.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InteractionStatus {
    Clicked,
    PaymentSuccessful,
    PaymentFailed,
    #[serde(other)]
    Other,
}

/// One row of the payment-link interaction export, as read from disk.
///
/// Every field is optional here; [`InteractionEvent::from_row`] decides which
/// ones are required.
#[derive(Debug, Deserialize, PartialEq, Clone, Default)]
pub struct PaymentRow {
    #[serde(rename = "Phone Number", alias = "phone_number")]
    pub phone_number: Option<String>,
    #[serde(rename = "URL", alias = "url")]
    pub url: Option<String>,
    #[serde(rename = "Amount", alias = "amount")]
    pub amount: Option<String>,
    #[serde(rename = "Status", alias = "status")]
    pub status: Option<InteractionStatus>,
    #[serde(rename = "Payment Date", alias = "payment_date")]
    pub payment_date: Option<String>,
}

/// A validated payment-link visit or payment-status update.
#[derive(Debug, PartialEq, Clone)]
pub struct InteractionEvent {
    pub recipient: String,
    pub link_url: String,
    pub amount: Decimal,
    pub status: InteractionStatus,
    pub event_time: Option<NaiveDateTime>,
}

impl InteractionEvent {
    pub fn new(recipient: &str, link_url: &str, amount: Decimal, status: InteractionStatus) -> Self {
        Self {
            recipient: recipient.to_string(),
            link_url: link_url.to_string(),
            amount,
            status,
            event_time: None,
        }
    }

    pub fn at(mut self, event_time: NaiveDateTime) -> Self {
        self.event_time = Some(event_time);
        self
    }

    /// Validates a raw row. `row` is the 1-based data row number used in errors.
    pub fn from_row(table: &str, row: usize, raw: PaymentRow) -> Result<Self> {
        let malformed = |field: &'static str| ReportError::MalformedRecord {
            table: table.to_string(),
            row,
            field,
        };

        let recipient = non_blank(raw.phone_number).ok_or_else(|| malformed("Phone Number"))?;
        let link_url = non_blank(raw.url).ok_or_else(|| malformed("URL"))?;
        let amount = non_blank(raw.amount)
            .and_then(|amount| Decimal::from_str(&amount).ok())
            .ok_or_else(|| malformed("Amount"))?;
        let status = raw.status.ok_or_else(|| malformed("Status"))?;
        let event_time = raw.payment_date.as_deref().and_then(parse_timestamp);

        Ok(Self {
            recipient,
            link_url,
            amount,
            status,
            event_time,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
