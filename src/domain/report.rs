use crate::domain::outcome::PaymentMarker;
use crate::domain::sentinel::or_no_data;
use crate::domain::timestamp::parse_timestamp;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

/// Header of the combined report, in output order.
pub const REPORT_COLUMNS: [&str; 18] = [
    "phone_number",
    "name",
    "language",
    "requested_on",
    "sent_on",
    "delivery_status",
    "duration",
    "response_value",
    "tag1",
    "tag2",
    "tag3",
    "tag4",
    "tag5",
    "SMS Status",
    "Clicked",
    "payment_success",
    "payment_failed",
    "Payment Amount",
];

/// One line of the combined report.
///
/// Field order must match [`REPORT_COLUMNS`].
#[derive(Debug, Serialize, PartialEq, Clone, Default)]
pub struct ReconciledRow {
    #[serde(rename = "phone_number")]
    pub recipient: String,
    pub name: Option<String>,
    pub language: Option<String>,
    pub requested_on: Option<String>,
    pub sent_on: Option<String>,
    pub delivery_status: Option<String>,
    pub duration: Option<String>,
    pub response_value: Option<String>,
    pub tag1: Option<String>,
    pub tag2: Option<String>,
    pub tag3: Option<String>,
    pub tag4: Option<String>,
    pub tag5: Option<String>,
    #[serde(rename = "SMS Status")]
    pub sms_status: Option<String>,
    #[serde(rename = "Clicked", serialize_with = "or_no_data")]
    pub clicked: Option<u32>,
    #[serde(serialize_with = "or_no_data")]
    pub payment_success: Option<PaymentMarker>,
    #[serde(serialize_with = "or_no_data")]
    pub payment_failed: Option<PaymentMarker>,
    #[serde(rename = "Payment Amount", serialize_with = "or_no_data")]
    pub payment_amount: Option<Decimal>,
}

impl ReconciledRow {
    pub fn sent_at(&self) -> Option<NaiveDateTime> {
        self.sent_on.as_deref().and_then(parse_timestamp)
    }
}
