use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for case-study requests (`CSR-YYYYMMDD-<seq>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who is asking for the visit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentDetails {
    pub name: String,
    pub student_id: String,
    pub program: String,
    pub year: String,
    pub email: String,
    pub phone: String,
}

/// The building or site the student wants to study.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteDetails {
    pub building_name: String,
    pub address: String,
    pub building_type: String,
    pub purpose: String,
    pub course: String,
    pub faculty_guide: String,
}

/// Visit logistics and the kinds of documentation the student intends to collect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyRequirements {
    pub duration: String,
    pub visit_count: String,
    pub documentation_types: BTreeSet<DocumentationType>,
}

impl StudyRequirements {
    /// Documentation labels joined in declaration order, e.g. `Photography, Measurements`.
    pub fn documentation_summary(&self) -> String {
        self.documentation_types
            .iter()
            .map(|kind| kind.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Documentation a student may collect on site. Variant order is the rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentationType {
    Photography,
    Measurements,
    Interviews,
    TechnicalDrawings,
    UserSurvey,
    Other,
}

impl DocumentationType {
    pub const fn label(self) -> &'static str {
        match self {
            DocumentationType::Photography => "Photography",
            DocumentationType::Measurements => "Measurements",
            DocumentationType::Interviews => "Interviews",
            DocumentationType::TechnicalDrawings => "Technical Drawings",
            DocumentationType::UserSurvey => "User Survey",
            DocumentationType::Other => "Other",
        }
    }

    pub const fn ordered() -> [DocumentationType; 6] {
        [
            DocumentationType::Photography,
            DocumentationType::Measurements,
            DocumentationType::Interviews,
            DocumentationType::TechnicalDrawings,
            DocumentationType::UserSurvey,
            DocumentationType::Other,
        ]
    }
}

/// Raw form input handed to the ledger by the presentation layer. Absent keys
/// deserialize as blanks so they surface through `missing_fields`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseStudySubmission {
    #[serde(default)]
    pub student: StudentDetails,
    #[serde(default)]
    pub site: SiteDetails,
    #[serde(default)]
    pub requirements: StudyRequirements,
    #[serde(default)]
    pub special_requirements: Option<String>,
    #[serde(default)]
    pub declaration_accepted: bool,
}

/// Form fields checked at intake. Labels are what the caller shows back to the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestField {
    StudentName,
    StudentId,
    Program,
    Year,
    Email,
    Phone,
    BuildingName,
    Address,
    BuildingType,
    Purpose,
    Course,
    FacultyGuide,
    Duration,
    VisitCount,
    DocumentationTypes,
    Declaration,
}

impl RequestField {
    pub const fn label(self) -> &'static str {
        match self {
            RequestField::StudentName => "student name",
            RequestField::StudentId => "student id",
            RequestField::Program => "program",
            RequestField::Year => "year",
            RequestField::Email => "email",
            RequestField::Phone => "phone",
            RequestField::BuildingName => "building name",
            RequestField::Address => "address",
            RequestField::BuildingType => "building type",
            RequestField::Purpose => "purpose",
            RequestField::Course => "course",
            RequestField::FacultyGuide => "faculty guide",
            RequestField::Duration => "duration",
            RequestField::VisitCount => "visit count",
            RequestField::DocumentationTypes => "documentation types",
            RequestField::Declaration => "declaration",
        }
    }
}

impl fmt::Display for RequestField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returns every required detail that is blank. Shared by intake and the renderers.
pub(crate) fn missing_details(
    student: &StudentDetails,
    site: &SiteDetails,
    requirements: &StudyRequirements,
) -> Vec<RequestField> {
    let text_fields = [
        (RequestField::StudentName, student.name.as_str()),
        (RequestField::StudentId, student.student_id.as_str()),
        (RequestField::Program, student.program.as_str()),
        (RequestField::Year, student.year.as_str()),
        (RequestField::Email, student.email.as_str()),
        (RequestField::Phone, student.phone.as_str()),
        (RequestField::BuildingName, site.building_name.as_str()),
        (RequestField::Address, site.address.as_str()),
        (RequestField::BuildingType, site.building_type.as_str()),
        (RequestField::Purpose, site.purpose.as_str()),
        (RequestField::Course, site.course.as_str()),
        (RequestField::FacultyGuide, site.faculty_guide.as_str()),
        (RequestField::Duration, requirements.duration.as_str()),
        (RequestField::VisitCount, requirements.visit_count.as_str()),
    ];

    let mut missing: Vec<RequestField> = text_fields
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

    if requirements.documentation_types.is_empty() {
        missing.push(RequestField::DocumentationTypes);
    }

    missing
}

impl CaseStudySubmission {
    /// Every required field that is blank, plus the declaration when it was not accepted.
    pub fn missing_fields(&self) -> Vec<RequestField> {
        let mut missing = missing_details(&self.student, &self.site, &self.requirements);
        if !self.declaration_accepted {
            missing.push(RequestField::Declaration);
        }
        missing
    }
}

/// Lifecycle status. `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Approved => "APPROVED",
            RequestStatus::Rejected => "REJECTED",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Director's verdict on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    Approved,
    Rejected,
}

impl DecisionOutcome {
    pub const fn status(self) -> RequestStatus {
        match self {
            DecisionOutcome::Approved => RequestStatus::Approved,
            DecisionOutcome::Rejected => RequestStatus::Rejected,
        }
    }
}

/// A stored request and its lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseStudyRequest {
    pub id: RequestId,
    pub submitted_at: NaiveDateTime,
    pub student: StudentDetails,
    pub site: SiteDetails,
    pub requirements: StudyRequirements,
    pub special_requirements: Option<String>,
    pub status: RequestStatus,
    pub decided_at: Option<NaiveDateTime>,
    pub comments: String,
}

impl CaseStudyRequest {
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documentation_summary_follows_declaration_order() {
        let requirements = StudyRequirements {
            duration: "1 Week".to_string(),
            visit_count: "2-3 Visits".to_string(),
            documentation_types: [
                DocumentationType::UserSurvey,
                DocumentationType::Photography,
                DocumentationType::TechnicalDrawings,
            ]
            .into_iter()
            .collect(),
        };

        assert_eq!(
            requirements.documentation_summary(),
            "Photography, Technical Drawings, User Survey"
        );
    }

    #[test]
    fn only_pending_is_non_terminal() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(RequestStatus::Approved.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
        assert_eq!(DecisionOutcome::Rejected.status(), RequestStatus::Rejected);
    }
}
