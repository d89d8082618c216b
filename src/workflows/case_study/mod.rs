//! Case-study site-visit permission workflow: intake, director decision, and the letters
//! and emails that follow.
//!
//! The [`RequestLedger`] is the single source of truth for request state. Rendering is
//! stateless and only reads ledger records; callers gate letter generation on the
//! record being approved.

pub mod domain;
pub mod export;
pub mod ledger;
pub mod render;
pub mod router;

#[cfg(test)]
mod tests;

pub use domain::{
    CaseStudyRequest, CaseStudySubmission, DecisionOutcome, DocumentationType, RequestField,
    RequestId, RequestStatus, SiteDetails, StudentDetails, StudyRequirements,
};
pub use export::{
    csv_bytes, export_file_name, export_rows, write_csv, ExportError, ExportRow, EXPORT_COLUMNS,
};
pub use ledger::{LedgerCounts, LedgerError, RequestLedger, DEFAULT_REJECTION_COMMENT};
pub use render::{
    DocumentRenderer, EmailMessage, InstitutionProfile, LetterLine, LetterPage, LineStyle,
    PermissionLetter, RenderError, Template,
};
pub use router::{case_study_router, CaseStudyState};
