use std::sync::Mutex;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{
    CaseStudyRequest, CaseStudySubmission, DecisionOutcome, RequestField, RequestId,
    RequestStatus,
};

/// Counter value before the first request; the first issued sequence is `1001`.
pub const SEQUENCE_SEED: u64 = 1000;

/// Comment recorded when a rejection arrives without one.
pub const DEFAULT_REJECTION_COMMENT: &str = "Request rejected by Director";

/// Errors raised by ledger operations. All are recoverable by the caller.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("missing required fields: {}", join_fields(.missing))]
    Validation { missing: Vec<RequestField> },
    #[error("request {0} not found or already processed")]
    NotFound(RequestId),
    #[error("request {id} was already processed ({status})")]
    AlreadyDecided { id: RequestId, status: RequestStatus },
}

fn join_fields(fields: &[RequestField]) -> String {
    fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Aggregate view over the current store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LedgerCounts {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

#[derive(Debug)]
struct LedgerState {
    sequence: u64,
    records: Vec<CaseStudyRequest>,
}

/// In-memory, append-only collection of case-study requests.
///
/// Ids are unique within one ledger instance only; a fresh ledger starts over at `1001`.
/// All mutation happens under a single lock so `decide` is atomic per id.
#[derive(Debug)]
pub struct RequestLedger {
    state: Mutex<LedgerState>,
}

impl Default for RequestLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestLedger {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LedgerState {
                sequence: SEQUENCE_SEED,
                records: Vec::new(),
            }),
        }
    }

    /// Validate and store a new submission stamped with the local wall clock.
    pub fn submit(
        &self,
        submission: CaseStudySubmission,
    ) -> Result<CaseStudyRequest, LedgerError> {
        self.submit_at(submission, Local::now().naive_local())
    }

    pub fn submit_at(
        &self,
        submission: CaseStudySubmission,
        submitted_at: NaiveDateTime,
    ) -> Result<CaseStudyRequest, LedgerError> {
        let missing = submission.missing_fields();
        if !missing.is_empty() {
            warn!(missing = %join_fields(&missing), "case study submission rejected");
            return Err(LedgerError::Validation { missing });
        }

        let CaseStudySubmission {
            student,
            site,
            requirements,
            special_requirements,
            declaration_accepted: _,
        } = submission;

        let mut state = self.state.lock().expect("ledger mutex poisoned");
        state.sequence += 1;
        let id = RequestId(format!(
            "CSR-{}-{}",
            submitted_at.format("%Y%m%d"),
            state.sequence
        ));

        let record = CaseStudyRequest {
            id,
            submitted_at,
            student,
            site,
            requirements,
            special_requirements: special_requirements
                .map(|notes| notes.trim().to_string())
                .filter(|notes| !notes.is_empty()),
            status: RequestStatus::Pending,
            decided_at: None,
            comments: String::new(),
        };
        state.records.push(record.clone());

        info!(request_id = %record.id, building = %record.site.building_name, "case study request submitted");
        Ok(record)
    }

    /// Record the director's decision using the local wall clock.
    pub fn decide(
        &self,
        id: &RequestId,
        outcome: DecisionOutcome,
        comments: &str,
    ) -> Result<CaseStudyRequest, LedgerError> {
        self.decide_at(id, outcome, comments, Local::now().naive_local())
    }

    pub fn decide_at(
        &self,
        id: &RequestId,
        outcome: DecisionOutcome,
        comments: &str,
        decided_at: NaiveDateTime,
    ) -> Result<CaseStudyRequest, LedgerError> {
        let mut state = self.state.lock().expect("ledger mutex poisoned");
        let record = state
            .records
            .iter_mut()
            .find(|record| &record.id == id)
            .ok_or_else(|| LedgerError::NotFound(id.clone()))?;

        if !record.is_pending() {
            warn!(request_id = %id, status = %record.status, "decision on processed request refused");
            return Err(LedgerError::AlreadyDecided {
                id: id.clone(),
                status: record.status,
            });
        }

        record.status = outcome.status();
        record.decided_at = Some(decided_at);
        record.comments = match outcome {
            DecisionOutcome::Rejected if comments.trim().is_empty() => {
                DEFAULT_REJECTION_COMMENT.to_string()
            }
            _ => comments.to_string(),
        };

        info!(request_id = %id, status = %record.status, "case study request decided");
        Ok(record.clone())
    }

    pub fn get(&self, id: &RequestId) -> Result<CaseStudyRequest, LedgerError> {
        let state = self.state.lock().expect("ledger mutex poisoned");
        state
            .records
            .iter()
            .find(|record| &record.id == id)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(id.clone()))
    }

    /// Records in submission order, optionally restricted to one status.
    pub fn list_by_status(&self, status: Option<RequestStatus>) -> Vec<CaseStudyRequest> {
        let state = self.state.lock().expect("ledger mutex poisoned");
        state
            .records
            .iter()
            .filter(|record| status.map_or(true, |wanted| record.status == wanted))
            .cloned()
            .collect()
    }

    pub fn counts(&self) -> LedgerCounts {
        let state = self.state.lock().expect("ledger mutex poisoned");
        state
            .records
            .iter()
            .fold(LedgerCounts::default(), |mut counts, record| {
                counts.total += 1;
                match record.status {
                    RequestStatus::Pending => counts.pending += 1,
                    RequestStatus::Approved => counts.approved += 1,
                    RequestStatus::Rejected => counts.rejected += 1,
                }
                counts
            })
    }
}
