use crate::domain::event::{InteractionEvent, PaymentRow};
use crate::domain::outcome::{AggregatedOutcome, OutcomeAccumulator, OutcomeKey};
use crate::domain::policy::CountedStatuses;
use crate::error::Result;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Validates every raw payment row, failing the whole batch on the first
/// malformed one.
pub fn events_from_rows(table: &str, rows: Vec<PaymentRow>) -> Result<Vec<InteractionEvent>> {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| InteractionEvent::from_row(table, i + 1, row))
        .collect()
}

/// Folds interaction events into one [`AggregatedOutcome`] per recipient and link.
///
/// Batches may be ingested separately and combined with [`Aggregator::merge`];
/// the result equals a single pass over the concatenated events.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    counted: CountedStatuses,
    outcomes: BTreeMap<OutcomeKey, OutcomeAccumulator>,
}

impl Aggregator {
    pub fn new(counted: CountedStatuses) -> Self {
        Self {
            counted,
            outcomes: BTreeMap::new(),
        }
    }

    /// Folds a batch in ascending `event_time` order. Untimed events keep their
    /// input order and sort ahead of timed ones.
    pub fn ingest(&mut self, mut events: Vec<InteractionEvent>) {
        events.sort_by_key(|event| event.event_time);

        for event in &events {
            let counted = self.counted.counts(event.status);
            match self.outcomes.entry(OutcomeKey::of(event)) {
                Entry::Vacant(slot) => {
                    slot.insert(OutcomeAccumulator::start(event, counted));
                }
                Entry::Occupied(mut slot) => {
                    let next = slot.get().absorb(event, counted);
                    slot.insert(next);
                }
            }
        }
        log::debug!(
            "aggregator: ingested {} events, {} keys so far",
            events.len(),
            self.outcomes.len()
        );
    }

    /// Combines with the state of a later batch.
    pub fn merge(mut self, later: Aggregator) -> Self {
        for (key, acc) in later.outcomes {
            let merged = match self.outcomes.remove(&key) {
                Some(earlier) => earlier.merge(acc),
                None => acc,
            };
            self.outcomes.insert(key, merged);
        }
        self
    }

    pub fn accumulators(&self) -> &BTreeMap<OutcomeKey, OutcomeAccumulator> {
        &self.outcomes
    }

    /// Produces the outcomes, ordered by key.
    pub fn finish(self) -> Vec<AggregatedOutcome> {
        self.outcomes
            .into_iter()
            .map(|(key, acc)| AggregatedOutcome::from_accumulator(key, acc))
            .collect()
    }
}

/// Single-batch convenience over [`Aggregator`].
pub fn aggregate(events: Vec<InteractionEvent>, counted: CountedStatuses) -> Vec<AggregatedOutcome> {
    let mut aggregator = Aggregator::new(counted);
    aggregator.ingest(events);
    aggregator.finish()
}
