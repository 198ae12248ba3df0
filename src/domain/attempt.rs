use crate::domain::timestamp::parse_timestamp;
use chrono::NaiveDateTime;
use serde::Deserialize;

const REACHED: &str = "Reached";

/// One outbound voice call attempt.
#[derive(Debug, Deserialize, PartialEq, Clone, Default)]
pub struct DeliveryAttempt {
    #[serde(rename = "phone_number")]
    pub recipient: String,
    #[serde(rename = "msg_id")]
    pub message_id: Option<String>,
    /// Import registry id; exports without the column reuse `msg_id`.
    pub request_id: Option<String>,
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
    #[serde(rename = "message_attempt")]
    pub attempt_number: Option<u32>,
    #[serde(rename = "url")]
    pub link_url: Option<String>,
}

impl DeliveryAttempt {
    pub fn new(recipient: &str) -> Self {
        Self {
            recipient: recipient.to_string(),
            ..Default::default()
        }
    }

    pub fn is_reached(&self) -> bool {
        self.delivery_status
            .as_deref()
            .is_some_and(|status| status.trim().eq_ignore_ascii_case(REACHED))
    }

    pub fn request_key(&self) -> Option<&str> {
        self.request_id.as_deref().or(self.message_id.as_deref())
    }

    pub fn sent_at(&self) -> Option<NaiveDateTime> {
        self.sent_on.as_deref().and_then(parse_timestamp)
    }

    pub fn tags(&self) -> [Option<&str>; 5] {
        [
            self.tag1.as_deref(),
            self.tag2.as_deref(),
            self.tag3.as_deref(),
            self.tag4.as_deref(),
            self.tag5.as_deref(),
        ]
    }
}

/// One outbound SMS attempt.
#[derive(Debug, Deserialize, PartialEq, Clone, Default)]
pub struct SmsAttempt {
    #[serde(rename = "phone_number")]
    pub recipient: String,
    pub msg_id: Option<String>,
    pub id: Option<String>,
    pub delivery_status: Option<String>,
    #[serde(rename = "Occurrence", alias = "occurrence")]
    pub occurrence: Option<u32>,
}

impl SmsAttempt {
    pub fn new(recipient: &str, delivery_status: &str) -> Self {
        Self {
            recipient: recipient.to_string(),
            delivery_status: Some(delivery_status.to_string()),
            ..Default::default()
        }
    }

    /// SMS exports name the message id either `msg_id` or `id`.
    pub fn message_id(&self) -> Option<&str> {
        self.msg_id.as_deref().or(self.id.as_deref())
    }
}
