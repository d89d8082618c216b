use std::io::Write;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::domain::CaseStudyRequest;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Export header, matching the field order of [`ExportRow`].
pub const EXPORT_COLUMNS: [&str; 21] = [
    "request_id",
    "submission_date",
    "student_name",
    "student_id",
    "program",
    "year",
    "email",
    "phone",
    "building_name",
    "building_address",
    "building_type",
    "purpose",
    "course",
    "faculty_guide",
    "duration",
    "visits",
    "documentation",
    "special_requirements",
    "status",
    "approval_date",
    "comments",
];

/// Flat, spreadsheet-friendly view of one ledger record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub request_id: String,
    pub submission_date: String,
    pub student_name: String,
    pub student_id: String,
    pub program: String,
    pub year: String,
    pub email: String,
    pub phone: String,
    pub building_name: String,
    pub building_address: String,
    pub building_type: String,
    pub purpose: String,
    pub course: String,
    pub faculty_guide: String,
    pub duration: String,
    pub visits: String,
    pub documentation: String,
    pub special_requirements: String,
    pub status: String,
    pub approval_date: String,
    pub comments: String,
}

impl ExportRow {
    pub fn from_request(request: &CaseStudyRequest) -> Self {
        Self {
            request_id: request.id.to_string(),
            submission_date: format_timestamp(Some(request.submitted_at)),
            student_name: request.student.name.clone(),
            student_id: request.student.student_id.clone(),
            program: request.student.program.clone(),
            year: request.student.year.clone(),
            email: request.student.email.clone(),
            phone: request.student.phone.clone(),
            building_name: request.site.building_name.clone(),
            building_address: request.site.address.clone(),
            building_type: request.site.building_type.clone(),
            purpose: request.site.purpose.clone(),
            course: request.site.course.clone(),
            faculty_guide: request.site.faculty_guide.clone(),
            duration: request.requirements.duration.clone(),
            visits: request.requirements.visit_count.clone(),
            documentation: request.requirements.documentation_summary(),
            special_requirements: request.special_requirements.clone().unwrap_or_default(),
            status: request.status.label().to_string(),
            approval_date: format_timestamp(request.decided_at),
            comments: request.comments.clone(),
        }
    }

    /// Column/value pairs in [`EXPORT_COLUMNS`] order.
    pub fn field_map(&self) -> Vec<(&'static str, &str)> {
        let values = [
            &self.request_id,
            &self.submission_date,
            &self.student_name,
            &self.student_id,
            &self.program,
            &self.year,
            &self.email,
            &self.phone,
            &self.building_name,
            &self.building_address,
            &self.building_type,
            &self.purpose,
            &self.course,
            &self.faculty_guide,
            &self.duration,
            &self.visits,
            &self.documentation,
            &self.special_requirements,
            &self.status,
            &self.approval_date,
            &self.comments,
        ];

        EXPORT_COLUMNS
            .into_iter()
            .zip(values.map(String::as_str))
            .collect()
    }
}

fn format_timestamp(value: Option<NaiveDateTime>) -> String {
    value
        .map(|timestamp| timestamp.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("unable to flush export: {0}")]
    Io(#[from] std::io::Error),
}

/// One row per record, preserving the order given (submission order for ledger listings).
pub fn export_rows(records: &[CaseStudyRequest]) -> Vec<ExportRow> {
    records.iter().map(ExportRow::from_request).collect()
}

/// Writes rows as CSV with a header line, even when there are no rows.
pub fn write_csv<W: Write>(rows: &[ExportRow], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(EXPORT_COLUMNS)?;
    for row in rows {
        csv_writer.write_record(row.field_map().into_iter().map(|(_, value)| value))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn csv_bytes(rows: &[ExportRow]) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::new();
    write_csv(rows, &mut buffer)?;
    Ok(buffer)
}

/// Download name for a bulk export, e.g. `case_study_requests_20241201.csv`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("case_study_requests_{}.csv", date.format("%Y%m%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::case_study::domain::{
        DocumentationType, RequestId, RequestStatus, SiteDetails, StudentDetails,
        StudyRequirements,
    };

    fn pending_request() -> CaseStudyRequest {
        CaseStudyRequest {
            id: RequestId("CSR-20241201-1001".to_string()),
            submitted_at: NaiveDate::from_ymd_opt(2024, 12, 1)
                .and_then(|date| date.and_hms_opt(9, 30, 0))
                .expect("valid timestamp"),
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
                address: "Bannerghatta Road".to_string(),
                building_type: "Institutional".to_string(),
                purpose: "Courtyard planning".to_string(),
                course: "Design Studio V".to_string(),
                faculty_guide: "Prof. Dr. A. Kumar".to_string(),
            },
            requirements: StudyRequirements {
                duration: "1 Week".to_string(),
                visit_count: "2-3 Visits".to_string(),
                documentation_types: [
                    DocumentationType::Measurements,
                    DocumentationType::Photography,
                ]
                .into_iter()
                .collect(),
            },
            special_requirements: None,
            status: RequestStatus::Pending,
            decided_at: None,
            comments: String::new(),
        }
    }

    #[test]
    fn field_map_follows_column_order() {
        let row = ExportRow::from_request(&pending_request());
        let fields = row.field_map();

        assert_eq!(fields.len(), EXPORT_COLUMNS.len());
        let columns: Vec<&str> = fields.iter().map(|(column, _)| *column).collect();
        assert_eq!(columns, EXPORT_COLUMNS);

        assert_eq!(fields[0], ("request_id", "CSR-20241201-1001"));
        assert_eq!(fields[1], ("submission_date", "2024-12-01 09:30:00"));
        assert_eq!(fields[16], ("documentation", "Photography, Measurements"));
        assert_eq!(fields[17], ("special_requirements", ""));
        assert_eq!(fields[18], ("status", "PENDING"));
        assert_eq!(fields[19], ("approval_date", ""));
        assert_eq!(fields[20], ("comments", ""));
    }

    #[test]
    fn approved_row_carries_decision_fields() {
        let mut request = pending_request();
        request.status = RequestStatus::Approved;
        request.decided_at = NaiveDate::from_ymd_opt(2024, 12, 2)
            .and_then(|date| date.and_hms_opt(14, 5, 0));
        request.comments = "  keep spaces  ".to_string();

        let row = ExportRow::from_request(&request);
        let fields = row.field_map();

        assert_eq!(fields[18], ("status", "APPROVED"));
        assert_eq!(fields[19], ("approval_date", "2024-12-02 14:05:00"));
        assert_eq!(fields[20], ("comments", "  keep spaces  "));

        let text = String::from_utf8(csv_bytes(&[row]).expect("csv renders")).expect("utf8");
        let data_line = text.lines().nth(1).expect("data row");
        assert!(data_line.starts_with("CSR-20241201-1001,2024-12-01 09:30:00,Ananya Rao"));
        assert!(data_line.contains("APPROVED,2024-12-02 14:05:00,"));
    }

    #[test]
    fn empty_export_still_has_header() {
        let bytes = csv_bytes(&[]).expect("csv renders");
        let text = String::from_utf8(bytes).expect("utf8 csv");
        assert_eq!(text.trim_end(), EXPORT_COLUMNS.join(","));
    }

    #[test]
    fn export_file_name_is_date_stamped() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 1).expect("valid date");
        assert_eq!(export_file_name(date), "case_study_requests_20241201.csv");
    }
}
