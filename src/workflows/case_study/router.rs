use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{
    CaseStudyRequest, CaseStudySubmission, DecisionOutcome, RequestId, RequestStatus,
};
use super::export::{csv_bytes, export_file_name, export_rows};
use super::ledger::{LedgerCounts, LedgerError, RequestLedger};
use super::render::{DocumentRenderer, EmailMessage, RenderError};

/// Shared handles for the case-study endpoints.
#[derive(Clone)]
pub struct CaseStudyState {
    pub ledger: Arc<RequestLedger>,
    pub renderer: Arc<DocumentRenderer>,
}

/// Router builder exposing intake, approval, letter download, and reporting endpoints.
pub fn case_study_router(ledger: Arc<RequestLedger>, renderer: Arc<DocumentRenderer>) -> Router {
    Router::new()
        .route(
            "/api/v1/case-studies",
            post(submit_handler).get(list_handler),
        )
        .route("/api/v1/case-studies/:request_id", get(status_handler))
        .route(
            "/api/v1/case-studies/:request_id/decision",
            post(decision_handler),
        )
        .route(
            "/api/v1/case-studies/:request_id/letter",
            get(letter_handler),
        )
        .route("/api/v1/reports/case-studies/summary", get(summary_handler))
        .route("/api/v1/reports/case-studies.csv", get(export_handler))
        .with_state(CaseStudyState { ledger, renderer })
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionResponse {
    pub(crate) request: CaseStudyRequest,
    pub(crate) student_confirmation: EmailMessage,
    pub(crate) director_approval_request: EmailMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    #[serde(default)]
    pub(crate) status: Option<RequestStatus>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ListResponse {
    pub(crate) requests: Vec<CaseStudyRequest>,
    pub(crate) counts: LedgerCounts,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecisionRequest {
    pub(crate) outcome: DecisionOutcome,
    #[serde(default)]
    pub(crate) comments: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct DecisionResponse {
    pub(crate) request: CaseStudyRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) approval_notice: Option<EmailMessage>,
}

pub(crate) async fn submit_handler(
    State(state): State<CaseStudyState>,
    Json(submission): Json<CaseStudySubmission>,
) -> Response {
    let request = match state.ledger.submit(submission) {
        Ok(request) => request,
        Err(error) => return ledger_error_response(error),
    };

    let emails = state
        .renderer
        .student_confirmation(&request)
        .and_then(|confirmation| {
            state
                .renderer
                .director_approval_request(&request)
                .map(|director| (confirmation, director))
        });

    match emails {
        Ok((student_confirmation, director_approval_request)) => {
            let body = SubmissionResponse {
                request,
                student_confirmation,
                director_approval_request,
            };
            (StatusCode::CREATED, Json(body)).into_response()
        }
        Err(error) => render_error_response(error),
    }
}

pub(crate) async fn list_handler(
    State(state): State<CaseStudyState>,
    Query(query): Query<ListQuery>,
) -> Response {
    let body = ListResponse {
        requests: state.ledger.list_by_status(query.status),
        counts: state.ledger.counts(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

pub(crate) async fn status_handler(
    State(state): State<CaseStudyState>,
    Path(request_id): Path<String>,
) -> Response {
    match state.ledger.get(&RequestId(request_id)) {
        Ok(request) => (StatusCode::OK, Json(request)).into_response(),
        Err(error) => ledger_error_response(error),
    }
}

pub(crate) async fn decision_handler(
    State(state): State<CaseStudyState>,
    Path(request_id): Path<String>,
    Json(decision): Json<DecisionRequest>,
) -> Response {
    let id = RequestId(request_id);
    let request = match state
        .ledger
        .decide(&id, decision.outcome, &decision.comments)
    {
        Ok(request) => request,
        Err(error) => return ledger_error_response(error),
    };

    let approval_notice = match decision.outcome {
        DecisionOutcome::Approved => match state.renderer.student_approval_notice(&request) {
            Ok(notice) => Some(notice),
            Err(error) => return render_error_response(error),
        },
        DecisionOutcome::Rejected => None,
    };

    let body = DecisionResponse {
        request,
        approval_notice,
    };
    (StatusCode::OK, Json(body)).into_response()
}

pub(crate) async fn letter_handler(
    State(state): State<CaseStudyState>,
    Path(request_id): Path<String>,
) -> Response {
    let request = match state.ledger.get(&RequestId(request_id)) {
        Ok(request) => request,
        Err(error) => return ledger_error_response(error),
    };

    match state
        .renderer
        .approval_letter(&request, Local::now().naive_local())
    {
        Ok(letter) => {
            let disposition = format!("attachment; filename=\"{}\"", letter.file_name);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                letter.to_pdf_bytes(),
            )
                .into_response()
        }
        Err(error) => render_error_response(error),
    }
}

pub(crate) async fn summary_handler(State(state): State<CaseStudyState>) -> Response {
    (StatusCode::OK, Json(state.ledger.counts())).into_response()
}

pub(crate) async fn export_handler(State(state): State<CaseStudyState>) -> Response {
    let rows = export_rows(&state.ledger.list_by_status(None));
    match csv_bytes(&rows) {
        Ok(bytes) => {
            let file_name = export_file_name(Local::now().date_naive());
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{file_name}\""),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) fn ledger_error_response(error: LedgerError) -> Response {
    match error {
        LedgerError::Validation { ref missing } => {
            let payload = json!({
                "error": error.to_string(),
                "missing_fields": missing,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        LedgerError::NotFound(ref id) => {
            let payload = json!({
                "error": error.to_string(),
                "request_id": id,
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        LedgerError::AlreadyDecided { ref id, status } => {
            let payload = json!({
                "error": error.to_string(),
                "request_id": id,
                "status": status,
            });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
    }
}

pub(crate) fn render_error_response(error: RenderError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::CONFLICT, Json(payload)).into_response()
}
