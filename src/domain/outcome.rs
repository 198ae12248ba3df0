use crate::domain::event::{InteractionEvent, InteractionStatus};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::fmt;

/// Payment verdict rendered in the report's marker columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMarker {
    Success,
    Failed,
}

impl fmt::Display for PaymentMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "Success"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// Aggregation key: one outcome per recipient and payment link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutcomeKey {
    pub recipient: String,
    pub link_url: String,
}

impl OutcomeKey {
    pub fn new(recipient: &str, link_url: &str) -> Self {
        Self {
            recipient: recipient.to_string(),
            link_url: link_url.to_string(),
        }
    }

    pub fn of(event: &InteractionEvent) -> Self {
        Self::new(&event.recipient, &event.link_url)
    }
}

/// Running state for one [`OutcomeKey`] while events are folded in.
///
/// Markers are sticky: once an event has set one it stays set, whatever
/// later events report. `amount` belongs to the earliest event seen, whose
/// time is kept in `amount_time` so that batches merge in any order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomeAccumulator {
    pub amount: Decimal,
    pub amount_time: Option<NaiveDateTime>,
    pub click_count: u32,
    pub succeeded: bool,
    pub failed: bool,
}

impl OutcomeAccumulator {
    /// State after the first event seen for a key.
    pub fn start(event: &InteractionEvent, counted: bool) -> Self {
        Self {
            amount: event.amount,
            amount_time: event.event_time,
            click_count: u32::from(counted),
            succeeded: event.status == InteractionStatus::PaymentSuccessful,
            failed: event.status == InteractionStatus::PaymentFailed,
        }
    }

    /// Folds a later event into this state. The first amount seen is kept.
    pub fn absorb(self, event: &InteractionEvent, counted: bool) -> Self {
        self.merge(Self::start(event, counted))
    }

    /// Combines the state of an earlier batch with the state of a later one.
    ///
    /// The amount with the earliest time wins; untimed sorts before timed and
    /// ties go to `self`.
    pub fn merge(self, later: Self) -> Self {
        let (amount, amount_time) = if later.amount_time < self.amount_time {
            (later.amount, later.amount_time)
        } else {
            (self.amount, self.amount_time)
        };
        Self {
            amount,
            amount_time,
            click_count: self.click_count + later.click_count,
            succeeded: self.succeeded || later.succeeded,
            failed: self.failed || later.failed,
        }
    }
}

/// Summarised payment-link activity for one recipient and link.
///
/// `click_count` and `amount` are `None` when no counted event was seen;
/// the report renders both as the no-data sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedOutcome {
    pub key: OutcomeKey,
    pub click_count: Option<u32>,
    pub success_marker: Option<PaymentMarker>,
    pub failure_marker: Option<PaymentMarker>,
    pub amount: Option<Decimal>,
}

impl AggregatedOutcome {
    pub fn from_accumulator(key: OutcomeKey, acc: OutcomeAccumulator) -> Self {
        let click_count = (acc.click_count > 0).then_some(acc.click_count);
        Self {
            key,
            click_count,
            success_marker: acc.succeeded.then_some(PaymentMarker::Success),
            failure_marker: acc.failed.then_some(PaymentMarker::Failed),
            amount: click_count.and(Some(acc.amount)),
        }
    }
}
