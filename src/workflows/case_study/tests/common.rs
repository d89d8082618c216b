use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::workflows::case_study::domain::{
    CaseStudySubmission, DocumentationType, SiteDetails, StudentDetails, StudyRequirements,
};
use crate::workflows::case_study::render::{DocumentRenderer, InstitutionProfile};
use crate::workflows::case_study::{case_study_router, RequestLedger};

pub(super) fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 12, day)
        .expect("valid date")
        .and_hms_opt(hour, minute, 0)
        .expect("valid time")
}

pub(super) fn submitted_at() -> NaiveDateTime {
    at(1, 9, 30)
}

pub(super) fn decided_at() -> NaiveDateTime {
    at(2, 14, 5)
}

pub(super) fn submission() -> CaseStudySubmission {
    CaseStudySubmission {
        student: StudentDetails {
            name: "Ananya Rao".to_string(),
            student_id: "R21AR042".to_string(),
            program: "B.Arch".to_string(),
            year: "3rd Year".to_string(),
            email: "ananya.rao@reva.edu.in".to_string(),
            phone: "+91 9876543210".to_string(),
        },
        site: SiteDetails {
            building_name: "Indian Institute of Management".to_string(),
            address: "Bannerghatta Road\nBangalore 560076".to_string(),
            building_type: "Institutional".to_string(),
            purpose: "Study of courtyard planning and stone masonry".to_string(),
            course: "Design Studio V".to_string(),
            faculty_guide: "Prof. Dr. A. Kumar".to_string(),
        },
        requirements: StudyRequirements {
            duration: "1 Week".to_string(),
            visit_count: "2-3 Visits".to_string(),
            documentation_types: [DocumentationType::Measurements, DocumentationType::Photography]
                .into_iter()
                .collect(),
        },
        special_requirements: Some("Access to the library block roof".to_string()),
        declaration_accepted: true,
    }
}

pub(super) fn institution() -> InstitutionProfile {
    InstitutionProfile {
        institution: "REVA University".to_string(),
        school: "School of Architecture".to_string(),
        location: "Bangalore, Karnataka, India".to_string(),
        director_email: "director@example.edu".to_string(),
        office_email: "office@example.edu".to_string(),
        director_title: "Director, School of Architecture".to_string(),
        portal_url: "https://casestudy.example.edu".to_string(),
    }
}

pub(super) fn renderer() -> DocumentRenderer {
    DocumentRenderer::new(institution())
}

pub(super) fn build_router() -> (axum::Router, Arc<RequestLedger>) {
    let ledger = Arc::new(RequestLedger::new());
    let router = case_study_router(ledger.clone(), Arc::new(renderer()));
    (router, ledger)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected, "unexpected status");
}
