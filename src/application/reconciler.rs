use crate::domain::attempt::{DeliveryAttempt, SmsAttempt};
use crate::domain::import::ImportRecord;
use crate::domain::outcome::{AggregatedOutcome, OutcomeKey};
use crate::domain::policy::{DedupKey, ReconPolicy};
use crate::domain::report::ReconciledRow;
use crate::error::{ReportError, Result};
use rust_decimal::Decimal;
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

/// Everything the reconciler joins, already loaded and aggregated.
#[derive(Debug, Clone, Default)]
pub struct ReconcileInput {
    pub voice: Vec<DeliveryAttempt>,
    pub sms: Vec<SmsAttempt>,
    pub imports: Vec<Vec<ImportRecord>>,
    pub outcomes: Vec<AggregatedOutcome>,
}

/// Concatenates import batches, keeping the first record per
/// (recipient, request id) in input order.
pub fn consolidate_imports(batches: Vec<Vec<ImportRecord>>) -> Vec<ImportRecord> {
    let mut seen = HashSet::new();
    batches
        .into_iter()
        .flatten()
        .filter(|record| seen.insert((record.recipient.clone(), record.request_id.clone())))
        .collect()
}

/// Keeps attempts whose number is the highest seen for their recipient and
/// message. Attempts without a number are kept as they are.
pub fn select_last_attempts(attempts: Vec<DeliveryAttempt>) -> Vec<DeliveryAttempt> {
    let mut latest: HashMap<(&str, Option<&str>), u32> = HashMap::new();
    for attempt in &attempts {
        if let Some(number) = attempt.attempt_number {
            let max = latest
                .entry((attempt.recipient.as_str(), attempt.message_id.as_deref()))
                .or_insert(number);
            *max = (*max).max(number);
        }
    }

    let keep: Vec<bool> = attempts
        .iter()
        .map(|attempt| match attempt.attempt_number {
            Some(number) => {
                latest.get(&(attempt.recipient.as_str(), attempt.message_id.as_deref())) == Some(&number)
            }
            None => true,
        })
        .collect();

    attempts
        .into_iter()
        .zip(keep)
        .filter_map(|(attempt, keep)| keep.then_some(attempt))
        .collect()
}

/// Sorts by `sent_on` descending and keeps the first row per dedup key.
/// Rows without a parseable timestamp sort last; ties keep input order.
pub fn dedup_latest(mut rows: Vec<ReconciledRow>, key: DedupKey) -> Vec<ReconciledRow> {
    rows.sort_by_cached_key(|row| Reverse(row.sent_at()));

    let mut seen: HashSet<(String, Option<Decimal>)> = HashSet::new();
    rows.into_iter()
        .filter(|row| {
            let amount = match key {
                DedupKey::Recipient => None,
                DedupKey::RecipientAndAmount => row.payment_amount,
            };
            seen.insert((row.recipient.clone(), amount))
        })
        .collect()
}

/// Picks the SMS attempt matching the voice message id, falling back to the
/// recipient's latest occurrence.
fn pick_sms<'a>(candidates: &[&'a SmsAttempt], message_id: Option<&str>) -> Option<&'a SmsAttempt> {
    if let Some(message_id) = message_id
        && let Some(exact) = candidates
            .iter()
            .rev()
            .find(|sms| sms.message_id() == Some(message_id))
    {
        return Some(*exact);
    }
    candidates.iter().max_by_key(|sms| sms.occurrence).copied()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Joins delivery attempts with SMS, import and payment data and collapses
/// the result to one row per dedup key.
pub struct Reconciler {
    policy: ReconPolicy,
}

impl Reconciler {
    pub fn new(policy: ReconPolicy) -> Self {
        Self { policy }
    }

    pub fn reconcile(&self, input: ReconcileInput) -> Result<Vec<ReconciledRow>> {
        let ReconcileInput {
            voice,
            sms,
            imports,
            outcomes,
        } = input;

        let imports = consolidate_imports(imports);
        log::info!("reconciler: {} import records after consolidation", imports.len());

        let received = voice.len();
        let mut attempts = voice;
        if self.policy.reached_only {
            attempts.retain(DeliveryAttempt::is_reached);
            log::info!(
                "reconciler: {} of {} voice attempts reached",
                attempts.len(),
                received
            );
        }
        if self.policy.last_attempt_only {
            let before = attempts.len();
            attempts = select_last_attempts(attempts);
            log::info!(
                "reconciler: {} of {} attempts are the last for their message",
                attempts.len(),
                before
            );
        }
        self.check_join("delivery filter", attempts.len(), received)?;

        let import_index: HashMap<(&str, &str), &ImportRecord> =
            imports.iter().rev().map(|record| (record.key(), record)).collect();
        let mut sms_index: HashMap<&str, Vec<&SmsAttempt>> = HashMap::new();
        for attempt in &sms {
            sms_index.entry(attempt.recipient.as_str()).or_default().push(attempt);
        }
        let outcome_index: HashMap<&OutcomeKey, &AggregatedOutcome> =
            outcomes.iter().map(|outcome| (&outcome.key, outcome)).collect();

        let mut matched_outcomes = 0;
        let joined: Vec<ReconciledRow> = attempts
            .iter()
            .map(|attempt| {
                let import = attempt
                    .request_key()
                    .and_then(|request| import_index.get(&(attempt.recipient.as_str(), request)))
                    .copied();
                let sms = sms_index
                    .get(attempt.recipient.as_str())
                    .and_then(|candidates| pick_sms(candidates, attempt.message_id.as_deref()));
                let outcome = attempt.link_url.as_deref().and_then(|url| {
                    outcome_index
                        .get(&OutcomeKey::new(&attempt.recipient, url))
                        .copied()
                });
                if outcome.is_some() {
                    matched_outcomes += 1;
                }
                Self::build_row(attempt, import, sms, outcome)
            })
            .collect();

        debug_assert_eq!(joined.len(), attempts.len(), "left joins must preserve row count");
        log::info!(
            "reconciler: {} of {} attempts matched a payment outcome",
            matched_outcomes,
            joined.len()
        );
        self.check_join("payment outcome join", matched_outcomes, outcomes.len())?;

        let rows = dedup_latest(joined, self.policy.dedup_key);
        log::info!("reconciler: {} rows after dedup", rows.len());
        Ok(rows)
    }

    /// Flags a stage that produced nothing out of a non-empty input.
    fn check_join(&self, stage: &'static str, produced: usize, available: usize) -> Result<()> {
        if available > 0 && produced == 0 {
            if self.policy.strict {
                return Err(ReportError::JoinEmptyResult { stage });
            }
            log::warn!("{stage} produced no rows out of {available}; check key formats");
        }
        Ok(())
    }

    fn build_row(
        attempt: &DeliveryAttempt,
        import: Option<&ImportRecord>,
        sms: Option<&SmsAttempt>,
        outcome: Option<&AggregatedOutcome>,
    ) -> ReconciledRow {
        let import_tags = import.map(ImportRecord::tags).unwrap_or_default();
        let tags: [Option<String>; 5] = std::array::from_fn(|i| {
            non_blank(attempt.tags()[i])
                .or(import_tags[i])
                .map(str::to_string)
        });
        let [tag1, tag2, tag3, tag4, tag5] = tags;

        ReconciledRow {
            recipient: attempt.recipient.clone(),
            name: import.and_then(ImportRecord::display_name),
            language: non_blank(attempt.language.as_deref())
                .or(import.and_then(|record| record.language.as_deref()))
                .map(str::to_string),
            requested_on: attempt.requested_on.clone(),
            sent_on: attempt.sent_on.clone(),
            delivery_status: attempt.delivery_status.clone(),
            duration: attempt.duration.clone(),
            response_value: attempt.response_value.clone(),
            tag1,
            tag2,
            tag3,
            tag4,
            tag5,
            sms_status: sms.and_then(|sms| sms.delivery_status.clone()),
            clicked: outcome.and_then(|o| o.click_count),
            payment_success: outcome.and_then(|o| o.success_marker),
            payment_failed: outcome.and_then(|o| o.failure_marker),
            payment_amount: outcome.and_then(|o| o.amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::outcome::PaymentMarker;
    use rust_decimal_macros::dec;

    fn reached(recipient: &str, sent_on: &str) -> DeliveryAttempt {
        DeliveryAttempt {
            message_id: Some("m1".into()),
            sent_on: Some(sent_on.into()),
            delivery_status: Some("Reached".into()),
            link_url: Some("http://pay/x".into()),
            ..DeliveryAttempt::new(recipient)
        }
    }

    fn outcome(recipient: &str, clicks: u32, amount: Decimal) -> AggregatedOutcome {
        AggregatedOutcome {
            key: OutcomeKey::new(recipient, "http://pay/x"),
            click_count: Some(clicks),
            success_marker: Some(PaymentMarker::Success),
            failure_marker: None,
            amount: Some(amount),
        }
    }

    #[test]
    fn test_consolidate_imports_keeps_first() {
        let mut first = ImportRecord::new("+911111111111", "7");
        first.name = Some("first".into());
        let mut second = ImportRecord::new("+911111111111", "7");
        second.name = Some("second".into());

        let records = consolidate_imports(vec![
            vec![first],
            vec![second, ImportRecord::new("+911111111111", "8")],
        ]);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name.as_deref(), Some("first"));
    }

    #[test]
    fn test_select_last_attempts() {
        let mut first = reached("+91", "2023-05-01 10:00:00");
        first.attempt_number = Some(1);
        let mut second = reached("+91", "2023-05-01 11:00:00");
        second.attempt_number = Some(2);
        let mut other_message = reached("+91", "2023-05-01 09:00:00");
        other_message.message_id = Some("m2".into());
        other_message.attempt_number = Some(1);
        let unnumbered = reached("+92", "2023-05-01 09:00:00");

        let kept = select_last_attempts(vec![first, second.clone(), other_message.clone(), unnumbered]);

        assert_eq!(kept.len(), 3);
        assert_eq!(kept[0], second);
        assert_eq!(kept[1], other_message);
    }

    #[test]
    fn test_unmatched_attempt_gets_sentinels() {
        let rows = Reconciler::new(ReconPolicy::default())
            .reconcile(ReconcileInput {
                voice: vec![reached("+919999999999", "2023-05-01 10:00:00")],
                outcomes: vec![outcome("+911234567890", 1, dec!(10))],
                ..Default::default()
            })
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].clicked, None);
        assert_eq!(rows[0].payment_success, None);
        assert_eq!(rows[0].payment_failed, None);
        assert_eq!(rows[0].payment_amount, None);
    }

    #[test]
    fn test_latest_attempt_wins() {
        let rows = Reconciler::new(ReconPolicy::default())
            .reconcile(ReconcileInput {
                voice: vec![
                    reached("+91", "2023-05-01 10:00:00"),
                    reached("+91", "2023-05-03 10:00:00"),
                    reached("+91", "2023-05-02 10:00:00"),
                ],
                outcomes: vec![outcome("+91", 2, dec!(500))],
                ..Default::default()
            })
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sent_on.as_deref(), Some("2023-05-03 10:00:00"));
        assert_eq!(rows[0].clicked, Some(2));
        assert_eq!(rows[0].payment_amount, Some(dec!(500)));
    }

    #[test]
    fn test_dedup_by_recipient_and_amount() {
        let rows = vec![
            ReconciledRow {
                recipient: "+91".into(),
                sent_on: Some("2023-05-01 10:00:00".into()),
                payment_amount: Some(dec!(10)),
                ..Default::default()
            },
            ReconciledRow {
                recipient: "+91".into(),
                sent_on: Some("2023-05-02 10:00:00".into()),
                payment_amount: Some(dec!(20)),
                ..Default::default()
            },
        ];

        assert_eq!(dedup_latest(rows.clone(), DedupKey::Recipient).len(), 1);
        assert_eq!(dedup_latest(rows, DedupKey::RecipientAndAmount).len(), 2);
    }

    #[test]
    fn test_dedup_orders_by_parsed_time_and_keeps_ties_in_input_order() {
        let row = |recipient: &str, sent_on: &str, name: &str| ReconciledRow {
            recipient: recipient.into(),
            sent_on: Some(sent_on.into()),
            name: Some(name.into()),
            ..Default::default()
        };
        let rows = vec![
            row("+91", "2023-05-02 09:00:00", "morning"),
            row("+91", "2023-05-02T10:00:00Z", "rfc3339"),
            row("+92", "2023-05-02 10:00:00", "first"),
            row("+92", "2023-05-02 10:00:00", "second"),
        ];

        let kept = dedup_latest(rows, DedupKey::Recipient);
        let names: Vec<_> = kept.iter().filter_map(|r| r.name.as_deref()).collect();
        assert_eq!(names, vec!["rfc3339", "first"]);
    }

    #[test]
    fn test_untimed_rows_sort_last() {
        let rows = vec![
            ReconciledRow {
                recipient: "+91".into(),
                sent_on: None,
                ..Default::default()
            },
            ReconciledRow {
                recipient: "+91".into(),
                sent_on: Some("2023-05-01 10:00:00".into()),
                ..Default::default()
            },
        ];

        let kept = dedup_latest(rows, DedupKey::Recipient);
        assert_eq!(kept[0].sent_on.as_deref(), Some("2023-05-01 10:00:00"));
    }

    #[test]
    fn test_unreached_attempts_dropped() {
        let mut missed = reached("+91", "2023-05-01 10:00:00");
        missed.delivery_status = Some("Not Reached".into());

        let policy = ReconPolicy::default();
        let rows = Reconciler::new(policy)
            .reconcile(ReconcileInput {
                voice: vec![missed.clone()],
                ..Default::default()
            })
            .unwrap();
        assert!(rows.is_empty());

        let rows = Reconciler::new(ReconPolicy {
            reached_only: false,
            ..policy
        })
        .reconcile(ReconcileInput {
            voice: vec![missed],
            ..Default::default()
        })
        .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_strict_policy_rejects_empty_join() {
        let mut missed = reached("+91", "2023-05-01 10:00:00");
        missed.delivery_status = Some("Busy".into());

        let err = Reconciler::new(ReconPolicy {
            strict: true,
            ..Default::default()
        })
        .reconcile(ReconcileInput {
            voice: vec![missed],
            ..Default::default()
        })
        .unwrap_err();

        assert!(matches!(
            err,
            ReportError::JoinEmptyResult { stage: "delivery filter" }
        ));
    }

    #[test]
    fn test_strict_policy_rejects_unmatched_outcomes() {
        let err = Reconciler::new(ReconPolicy {
            strict: true,
            ..Default::default()
        })
        .reconcile(ReconcileInput {
            voice: vec![reached("+91", "2023-05-01 10:00:00")],
            outcomes: vec![outcome("91", 1, dec!(1))],
            ..Default::default()
        })
        .unwrap_err();

        assert!(matches!(
            err,
            ReportError::JoinEmptyResult { stage: "payment outcome join" }
        ));
    }

    #[test]
    fn test_joins_import_and_sms() {
        let mut attempt = reached("+91", "2023-05-01 10:00:00");
        attempt.tag1 = Some("voice-tag".into());
        let mut import = ImportRecord::new("+91", "m1");
        import.name = Some("Asha".into());
        import.language = Some("hi".into());
        import.tag1 = Some("import-tag".into());
        import.tag2 = Some("batch-7".into());

        let mut stale = SmsAttempt::new("+91", "Failed");
        stale.occurrence = Some(1);
        let mut latest = SmsAttempt::new("+91", "Delivered");
        latest.occurrence = Some(2);

        let rows = Reconciler::new(ReconPolicy::default())
            .reconcile(ReconcileInput {
                voice: vec![attempt],
                sms: vec![latest, stale],
                imports: vec![vec![import]],
                outcomes: vec![],
            })
            .unwrap();

        let row = &rows[0];
        assert_eq!(row.name.as_deref(), Some("Asha"));
        assert_eq!(row.language.as_deref(), Some("hi"));
        assert_eq!(row.tag1.as_deref(), Some("voice-tag"));
        assert_eq!(row.tag2.as_deref(), Some("batch-7"));
        assert_eq!(row.sms_status.as_deref(), Some("Delivered"));
    }

    #[test]
    fn test_sms_matched_by_message_id() {
        let mut matching = SmsAttempt::new("+91", "Delivered");
        matching.msg_id = Some("m1".into());
        matching.occurrence = Some(1);
        let mut newer_other = SmsAttempt::new("+91", "Failed");
        newer_other.msg_id = Some("m9".into());
        newer_other.occurrence = Some(5);

        let picked = pick_sms(&[&matching, &newer_other], Some("m1")).unwrap();
        assert_eq!(picked.delivery_status.as_deref(), Some("Delivered"));

        let picked = pick_sms(&[&matching, &newer_other], Some("m2")).unwrap();
        assert_eq!(picked.delivery_status.as_deref(), Some("Failed"));
    }
}
