//! Application layer orchestrating the report.
//!
//! [`engine::ReportEngine`] pulls the source tables through a
//! `CampaignSources` port, folds payment-link events with the
//! [`aggregator`] and hands everything to the [`reconciler`].

pub mod aggregator;
pub mod engine;
pub mod reconciler;
