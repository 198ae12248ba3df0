use super::attempt::{DeliveryAttempt, SmsAttempt};
use super::event::PaymentRow;
use super::import::ImportRecord;
use crate::error::Result;

/// Supplies the four source tables of one report run.
pub trait CampaignSources {
    fn voice_attempts(&self) -> Result<Vec<DeliveryAttempt>>;
    fn sms_attempts(&self) -> Result<Vec<SmsAttempt>>;
    fn payment_rows(&self) -> Result<Vec<PaymentRow>>;
    /// One batch per import summary, in the order they were supplied.
    fn import_batches(&self) -> Result<Vec<Vec<ImportRecord>>>;
}

pub type CampaignSourcesBox = Box<dyn CampaignSources>;
