use crate::domain::event::InteractionStatus;
use clap::ValueEnum;

/// Which interaction statuses count as a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CountedStatuses {
    /// `clicked`, `payment_successful` and `payment_failed`.
    #[default]
    All,
    /// `clicked` and `payment_successful` only.
    ClickedAndSuccessful,
}

impl CountedStatuses {
    pub fn counts(self, status: InteractionStatus) -> bool {
        match status {
            InteractionStatus::Clicked | InteractionStatus::PaymentSuccessful => true,
            InteractionStatus::PaymentFailed => self == Self::All,
            InteractionStatus::Other => false,
        }
    }
}

/// Key under which the final report keeps only the latest row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DedupKey {
    #[default]
    Recipient,
    /// A recipient with several distinct payment amounts keeps one row per amount.
    RecipientAndAmount,
}

/// Resolves the points where campaign exports disagree on reconciliation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconPolicy {
    pub counted: CountedStatuses,
    /// Keep only voice attempts whose delivery status is `Reached`.
    pub reached_only: bool,
    /// Keep only the highest attempt number per recipient and message.
    pub last_attempt_only: bool,
    pub dedup_key: DedupKey,
    /// Fail instead of warning when a join stage produces nothing.
    pub strict: bool,
}

impl Default for ReconPolicy {
    fn default() -> Self {
        Self {
            counted: CountedStatuses::All,
            reached_only: true,
            last_attempt_only: true,
            dedup_key: DedupKey::Recipient,
            strict: false,
        }
    }
}
