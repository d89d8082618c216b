use super::common::*;
use crate::workflows::case_study::domain::{
    CaseStudyRequest, DecisionOutcome, DocumentationType, RequestStatus,
};
use crate::workflows::case_study::ledger::RequestLedger;
use crate::workflows::case_study::render::{LineStyle, RenderError, Template};

fn pending_request() -> CaseStudyRequest {
    RequestLedger::new()
        .submit_at(submission(), submitted_at())
        .expect("valid submission")
}

fn approved_request() -> CaseStudyRequest {
    let ledger = RequestLedger::new();
    let record = ledger
        .submit_at(submission(), submitted_at())
        .expect("valid submission");
    ledger
        .decide_at(&record.id, DecisionOutcome::Approved, "", decided_at())
        .expect("approval succeeds")
}

#[test]
fn letter_contains_reference_building_and_footer() {
    let request = approved_request();
    let letter = renderer()
        .approval_letter(&request, at(2, 15, 0))
        .expect("letter renders");
    let text = letter.to_text();

    assert_eq!(letter.reference, request.id);
    assert_eq!(letter.file_name, "Case_Study_Permission_R21AR042.pdf");
    assert!(text.contains("Date: December 02, 2024"));
    assert!(text.contains("Ref: CSR-20241201-1001"));
    assert!(text.contains("To: The Concerned Authority"));
    assert!(text.contains("Indian Institute of Management"));
    assert!(text.contains("Bannerghatta Road\nBangalore 560076"));
    assert!(text.contains("Subject: Permission for Architectural Case Study Research"));
    let flattened = text.split_whitespace().collect::<Vec<_>>().join(" ");
    assert!(flattened
        .contains("Ananya Rao, Student ID: R21AR042, a 3rd Year student pursuing B.Arch"));
    assert!(flattened.contains(
        "for the course 'Design Studio V' under the guidance of Prof. Dr. A. Kumar"
    ));
    assert!(text.contains("\u{2022} Documentation Required: Photography, Measurements"));
    assert!(text.contains("Email: director@example.edu"));
    assert!(text.contains("Request ID: CSR-20241201-1001"));
    assert!(text.contains("Generated: 2024-12-02 15:00"));
    assert!(text.contains("Status: APPROVED - Official Permission Letter"));
}

#[test]
fn letter_pages_carry_letterhead_and_numbers() {
    let letter = renderer()
        .approval_letter(&approved_request(), at(2, 15, 0))
        .expect("letter renders");

    assert!(letter.page_count() >= 1);
    for page in &letter.pages {
        assert_eq!(page.lines[0].style, LineStyle::Title);
        assert_eq!(page.lines[0].text, "REVA UNIVERSITY");
        assert_eq!(page.lines[1].text, "SCHOOL OF ARCHITECTURE");
        let footer = page.lines.last().expect("page footer");
        assert_eq!(footer.text, format!("Page {}", page.number));
    }
}

#[test]
fn long_purpose_wraps_and_spills_onto_second_page() {
    let ledger = RequestLedger::new();
    let mut input = submission();
    input.site.purpose = "Detailed documentation of the courtyard sequence ".repeat(60);
    let record = ledger.submit_at(input, submitted_at()).expect("submits");
    let approved = ledger
        .decide_at(&record.id, DecisionOutcome::Approved, "", decided_at())
        .expect("approves");

    let letter = renderer()
        .approval_letter(&approved, at(2, 15, 0))
        .expect("letter renders");

    assert!(letter.page_count() >= 2);
    assert!(letter
        .pages
        .iter()
        .flat_map(|page| page.lines.iter())
        .all(|line| line.text.chars().count() <= 92));
}

#[test]
fn long_building_name_wraps_in_recipient_block() {
    let ledger = RequestLedger::new();
    let mut input = submission();
    input.site.building_name = "Very Long Heritage Building Name ".repeat(5);
    let record = ledger.submit_at(input, submitted_at()).expect("submits");
    let approved = ledger
        .decide_at(&record.id, DecisionOutcome::Approved, "", decided_at())
        .expect("approves");

    let letter = renderer()
        .approval_letter(&approved, at(2, 15, 0))
        .expect("letter renders");

    let lines: Vec<&str> = letter
        .pages
        .iter()
        .flat_map(|page| page.lines.iter())
        .map(|line| line.text.as_str())
        .collect();
    assert!(lines.iter().all(|line| line.chars().count() <= 92));
    let recipient = lines
        .iter()
        .position(|line| *line == "To: The Concerned Authority")
        .expect("recipient block");
    assert!(lines[recipient + 1].starts_with("Very Long Heritage Building Name"));
    assert!(lines[recipient + 2].contains("Heritage"));
}

#[test]
fn letter_rendering_is_deterministic() {
    let request = approved_request();
    let renderer = renderer();

    let first = renderer
        .approval_letter(&request, at(2, 15, 0))
        .expect("letter renders");
    let second = renderer
        .approval_letter(&request, at(2, 15, 0))
        .expect("letter renders");

    assert_eq!(first, second);
    assert_eq!(first.to_text(), second.to_text());
    assert_eq!(first.to_pdf_bytes(), second.to_pdf_bytes());
}

#[test]
fn letter_pdf_embeds_reference() {
    let letter = renderer()
        .approval_letter(&approved_request(), at(2, 15, 0))
        .expect("letter renders");
    let pdf = String::from_utf8(letter.to_pdf_bytes()).expect("ascii pdf");

    assert!(pdf.starts_with("%PDF-1.4"));
    assert!(pdf.contains("(Ref: CSR-20241201-1001) Tj"));
    assert!(pdf.contains("\\225 Purpose:"));
    assert!(pdf.contains(&format!("/Count {}", letter.page_count())));
}

#[test]
fn letter_requires_approved_request() {
    match renderer().approval_letter(&pending_request(), at(2, 15, 0)) {
        Err(RenderError::InvalidState { template, reason }) => {
            assert_eq!(template, Template::ApprovalLetter);
            assert!(reason.contains("PENDING"));
        }
        other => panic!("expected invalid state, got {other:?}"),
    }
}

#[test]
fn letter_requires_decision_timestamp() {
    let mut request = approved_request();
    request.decided_at = None;

    match renderer().approval_letter(&request, at(2, 15, 0)) {
        Err(RenderError::InvalidState { reason, .. }) => {
            assert!(reason.contains("approval timestamp"));
        }
        other => panic!("expected invalid state, got {other:?}"),
    }
}

#[test]
fn rejected_request_has_no_letter_or_notice() {
    let ledger = RequestLedger::new();
    let record = ledger.submit_at(submission(), submitted_at()).expect("submits");
    let rejected = ledger
        .decide_at(&record.id, DecisionOutcome::Rejected, "", decided_at())
        .expect("rejects");
    assert_eq!(rejected.status, RequestStatus::Rejected);

    assert!(renderer().approval_letter(&rejected, decided_at()).is_err());
    assert!(renderer().student_approval_notice(&rejected).is_err());
}

#[test]
fn director_request_lists_documentation_in_declaration_order_only() {
    let email = renderer()
        .director_approval_request(&pending_request())
        .expect("email renders");

    assert_eq!(email.to, "director@example.edu");
    assert!(email.body.contains("- Documentation: Photography, Measurements"));
    for kind in DocumentationType::ordered() {
        if matches!(
            kind,
            DocumentationType::Photography | DocumentationType::Measurements
        ) {
            continue;
        }
        assert!(
            !email.body.contains(kind.label()),
            "unexpected label {}",
            kind.label()
        );
    }
}

#[test]
fn director_request_embeds_every_field_and_call_to_action() {
    let request = pending_request();
    let email = renderer()
        .director_approval_request(&request)
        .expect("email renders");
    let body = &email.body;

    for expected in [
        "CASE STUDY APPROVAL REQUIRED - Ananya Rao (R21AR042)",
        "- Student ID: R21AR042",
        "- Program: B.Arch - 3rd Year",
        "- Email: ananya.rao@reva.edu.in",
        "- Phone: +91 9876543210",
        "- Building: Indian Institute of Management",
        "- Type: Institutional",
        "- Course: Design Studio V",
        "- Faculty Guide: Prof. Dr. A. Kumar",
        "- Duration: 1 Week",
        "- Visits: 2-3 Visits",
        "- Special Requirements: Access to the library block roof",
        "REQUEST ID: CSR-20241201-1001",
        "SUBMITTED: 2024-12-01 09:30",
        "use Request ID: CSR-20241201-1001",
        "Web App: https://casestudy.example.edu",
        "\"APPROVED - CSR-20241201-1001\"",
    ] {
        assert!(body.contains(expected), "missing `{expected}`");
    }
    assert!(email.subject.contains("CSR-20241201-1001"));
}

#[test]
fn student_confirmation_summarizes_submission() {
    let email = renderer()
        .student_confirmation(&pending_request())
        .expect("email renders");

    assert_eq!(email.to, "ananya.rao@reva.edu.in");
    assert!(email.body.starts_with("Dear Ananya Rao,"));
    assert!(email.body.contains("Request ID: CSR-20241201-1001"));
    assert!(email.body.contains("Building: Indian Institute of Management"));
    assert!(email.body.contains("Submitted: 2024-12-01 09:30"));
    assert!(email.body.contains("Status: UNDER REVIEW"));
    assert!(email.body.contains("WHAT HAPPENS NEXT:"));
    assert!(email.body.contains("For queries, contact: office@example.edu"));
}

#[test]
fn approval_notice_uses_decision_time_and_mentions_attachment() {
    let email = renderer()
        .student_approval_notice(&approved_request())
        .expect("email renders");

    assert_eq!(email.to, "ananya.rao@reva.edu.in");
    assert!(email.body.contains("- Address: Bannerghatta Road"));
    assert!(email.body.contains("- Approved: 2024-12-02 14:05"));
    assert!(email.body.contains("NEXT STEPS:"));
    assert!(email.body.contains("Official permission letter is attached as PDF."));
    assert!(email.body.contains("For queries: office@example.edu"));
    assert!(!email.body.contains("Director's comments"));
}

#[test]
fn approval_notice_requires_approval() {
    match renderer().student_approval_notice(&pending_request()) {
        Err(RenderError::InvalidState { template, .. }) => {
            assert_eq!(template, Template::StudentApprovalNotice);
        }
        other => panic!("expected invalid state, got {other:?}"),
    }
}

#[test]
fn renderers_reject_records_with_blank_fields() {
    let mut request = pending_request();
    request.site.building_name.clear();

    match renderer().student_confirmation(&request) {
        Err(RenderError::InvalidState { template, reason }) => {
            assert_eq!(template, Template::StudentConfirmation);
            assert!(reason.contains("building name"));
        }
        other => panic!("expected invalid state, got {other:?}"),
    }
}
