use crate::domain::attempt::{DeliveryAttempt, SmsAttempt};
use crate::domain::event::PaymentRow;
use crate::domain::import::ImportRecord;
use crate::domain::ports::CampaignSources;
use crate::error::Result;
use crate::interfaces::table::{probe, read_table};
use std::path::PathBuf;

/// Source tables read from CSV or spreadsheet files on disk.
#[derive(Debug, Clone)]
pub struct FileSources {
    pub voice: PathBuf,
    pub sms: PathBuf,
    pub payments: PathBuf,
    pub imports: Vec<PathBuf>,
}

impl FileSources {
    pub fn new(voice: PathBuf, sms: PathBuf, payments: PathBuf, imports: Vec<PathBuf>) -> Self {
        Self {
            voice,
            sms,
            payments,
            imports,
        }
    }

    /// Fails on the first input that is missing or in an unsupported format.
    pub fn check(&self) -> Result<()> {
        for path in [&self.voice, &self.sms, &self.payments]
            .into_iter()
            .chain(&self.imports)
        {
            probe(path)?;
        }
        Ok(())
    }
}

impl CampaignSources for FileSources {
    fn voice_attempts(&self) -> Result<Vec<DeliveryAttempt>> {
        read_table(&self.voice)
    }

    fn sms_attempts(&self) -> Result<Vec<SmsAttempt>> {
        read_table(&self.sms)
    }

    fn payment_rows(&self) -> Result<Vec<PaymentRow>> {
        read_table(&self.payments)
    }

    fn import_batches(&self) -> Result<Vec<Vec<ImportRecord>>> {
        self.imports.iter().map(|path| read_table(path)).collect()
    }
}
