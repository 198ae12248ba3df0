use crate::application::aggregator::{Aggregator, events_from_rows};
use crate::application::reconciler::{ReconcileInput, Reconciler};
use crate::domain::policy::ReconPolicy;
use crate::domain::ports::CampaignSourcesBox;
use crate::domain::report::ReconciledRow;
use crate::error::Result;

/// The main entry point for producing the combined report.
///
/// `ReportEngine` owns the source port and the reconciliation policy. A run
/// loads every table up front, so a missing or unreadable input aborts
/// before any aggregation happens.
pub struct ReportEngine {
    sources: CampaignSourcesBox,
    policy: ReconPolicy,
}

impl ReportEngine {
    /// Creates a new `ReportEngine` instance.
    ///
    /// # Arguments
    ///
    /// * `sources` - Supplier of the voice, SMS, payment and import tables.
    /// * `policy` - Rules applied where source exports disagree.
    pub fn new(sources: CampaignSourcesBox, policy: ReconPolicy) -> Self {
        Self { sources, policy }
    }

    /// Loads all sources, aggregates payment events and reconciles.
    pub fn run(&self) -> Result<Vec<ReconciledRow>> {
        let voice = self.sources.voice_attempts()?;
        let sms = self.sources.sms_attempts()?;
        let payment_rows = self.sources.payment_rows()?;
        let imports = self.sources.import_batches()?;
        log::info!(
            "loaded {} voice attempts, {} sms attempts, {} payment events, {} import files",
            voice.len(),
            sms.len(),
            payment_rows.len(),
            imports.len()
        );

        let events = events_from_rows("payments", payment_rows)?;
        let mut aggregator = Aggregator::new(self.policy.counted);
        aggregator.ingest(events);
        let outcomes = aggregator.finish();
        log::info!("aggregated payment events into {} outcomes", outcomes.len());

        Reconciler::new(self.policy).reconcile(ReconcileInput {
            voice,
            sms,
            imports,
            outcomes,
        })
    }
}
