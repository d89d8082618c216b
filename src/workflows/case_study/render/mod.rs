//! Letter and email rendering for case-study requests.
//!
//! Every function here is a pure function of a request record, the injected
//! [`InstitutionProfile`], and (for letters) an explicit generation timestamp.

mod email;
mod letter;
mod pdf;

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::domain::{missing_details, CaseStudyRequest, RequestStatus};

pub use letter::{LetterLine, LetterPage, LineStyle, PermissionLetter};

/// Institutional constants supplied once at start-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionProfile {
    pub institution: String,
    pub school: String,
    pub location: String,
    pub director_email: String,
    pub office_email: String,
    pub director_title: String,
    pub portal_url: String,
}

impl Default for InstitutionProfile {
    fn default() -> Self {
        Self {
            institution: "REVA University".to_string(),
            school: "School of Architecture".to_string(),
            location: "Bangalore, Karnataka, India".to_string(),
            director_email: "dir.arch@reva.edu.in".to_string(),
            office_email: "swathi.bp@reva.edu.in".to_string(),
            director_title: "Director, School of Architecture".to_string(),
            portal_url: "[YOUR_STREAMLIT_URL]".to_string(),
        }
    }
}

/// Rendered email content. Delivery is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Which template a render call was producing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    ApprovalLetter,
    DirectorApprovalRequest,
    StudentConfirmation,
    StudentApprovalNotice,
}

impl Template {
    pub const fn label(self) -> &'static str {
        match self {
            Template::ApprovalLetter => "approval letter",
            Template::DirectorApprovalRequest => "director approval request",
            Template::StudentConfirmation => "student confirmation",
            Template::StudentApprovalNotice => "student approval notice",
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("cannot render {template}: {reason}")]
    InvalidState { template: Template, reason: String },
}

/// Produces letters and emails for requests using fixed institutional constants.
#[derive(Debug, Clone, Default)]
pub struct DocumentRenderer {
    institution: InstitutionProfile,
}

impl DocumentRenderer {
    pub fn new(institution: InstitutionProfile) -> Self {
        Self { institution }
    }

    /// Official permission letter for an approved request.
    pub fn approval_letter(
        &self,
        request: &CaseStudyRequest,
        generated_at: NaiveDateTime,
    ) -> Result<PermissionLetter, RenderError> {
        require_details(Template::ApprovalLetter, request)?;
        require_approved(Template::ApprovalLetter, request)?;
        Ok(letter::compose(&self.institution, request, generated_at))
    }

    /// Email asking the director to approve a freshly submitted request.
    pub fn director_approval_request(
        &self,
        request: &CaseStudyRequest,
    ) -> Result<EmailMessage, RenderError> {
        require_details(Template::DirectorApprovalRequest, request)?;
        Ok(email::director_approval_request(&self.institution, request))
    }

    /// Receipt sent to the student right after submission.
    pub fn student_confirmation(
        &self,
        request: &CaseStudyRequest,
    ) -> Result<EmailMessage, RenderError> {
        require_details(Template::StudentConfirmation, request)?;
        Ok(email::student_confirmation(&self.institution, request))
    }

    /// Notice sent to the student once the director approved; the letter travels with it.
    pub fn student_approval_notice(
        &self,
        request: &CaseStudyRequest,
    ) -> Result<EmailMessage, RenderError> {
        require_details(Template::StudentApprovalNotice, request)?;
        let approved_at = require_approved(Template::StudentApprovalNotice, request)?;
        Ok(email::student_approval_notice(
            &self.institution,
            request,
            approved_at,
        ))
    }
}

fn require_details(template: Template, request: &CaseStudyRequest) -> Result<(), RenderError> {
    if request.id.as_str().trim().is_empty() {
        return Err(RenderError::InvalidState {
            template,
            reason: "request id is blank".to_string(),
        });
    }

    let missing = missing_details(&request.student, &request.site, &request.requirements);
    if missing.is_empty() {
        return Ok(());
    }

    let fields = missing
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ");
    Err(RenderError::InvalidState {
        template,
        reason: format!("missing {fields}"),
    })
}

fn require_approved(
    template: Template,
    request: &CaseStudyRequest,
) -> Result<NaiveDateTime, RenderError> {
    match (request.status, request.decided_at) {
        (RequestStatus::Approved, Some(decided_at)) => Ok(decided_at),
        (RequestStatus::Approved, None) => Err(RenderError::InvalidState {
            template,
            reason: "approval timestamp is not set".to_string(),
        }),
        (status, _) => Err(RenderError::InvalidState {
            template,
            reason: format!("request {} is {}", request.id, status),
        }),
    }
}
