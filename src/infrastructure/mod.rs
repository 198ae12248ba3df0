//! Adapters implementing the `CampaignSources` port.

pub mod files;
pub mod in_memory;
