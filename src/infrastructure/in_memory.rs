use crate::domain::attempt::{DeliveryAttempt, SmsAttempt};
use crate::domain::event::PaymentRow;
use crate::domain::import::ImportRecord;
use crate::domain::ports::CampaignSources;
use crate::error::Result;

/// Source tables held in memory.
///
/// Useful for tests and for embedding the engine behind another loader.
#[derive(Debug, Default, Clone)]
pub struct InMemorySources {
    pub voice: Vec<DeliveryAttempt>,
    pub sms: Vec<SmsAttempt>,
    pub payments: Vec<PaymentRow>,
    pub imports: Vec<Vec<ImportRecord>>,
}

impl InMemorySources {
    /// Creates an empty set of sources.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CampaignSources for InMemorySources {
    fn voice_attempts(&self) -> Result<Vec<DeliveryAttempt>> {
        Ok(self.voice.clone())
    }

    fn sms_attempts(&self) -> Result<Vec<SmsAttempt>> {
        Ok(self.sms.clone())
    }

    fn payment_rows(&self) -> Result<Vec<PaymentRow>> {
        Ok(self.payments.clone())
    }

    fn import_batches(&self) -> Result<Vec<Vec<ImportRecord>>> {
        Ok(self.imports.clone())
    }
}
