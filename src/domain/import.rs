use serde::Deserialize;

/// Registry entry correlating a request id with recipient metadata.
#[derive(Debug, Deserialize, PartialEq, Clone, Default)]
pub struct ImportRecord {
    #[serde(rename = "phone_number")]
    pub recipient: String,
    #[serde(rename = "id")]
    pub request_id: String,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub language: Option<String>,
    pub tag1: Option<String>,
    pub tag2: Option<String>,
    pub tag3: Option<String>,
    pub tag4: Option<String>,
    pub tag5: Option<String>,
}

impl ImportRecord {
    pub fn new(recipient: &str, request_id: &str) -> Self {
        Self {
            recipient: recipient.to_string(),
            request_id: request_id.to_string(),
            ..Default::default()
        }
    }

    pub fn key(&self) -> (&str, &str) {
        (&self.recipient, &self.request_id)
    }

    /// `name`, or `first_name last_name` for exports that split it.
    pub fn display_name(&self) -> Option<String> {
        if let Some(name) = &self.name {
            return Some(name.clone());
        }
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
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
