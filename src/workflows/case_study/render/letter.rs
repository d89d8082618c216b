use chrono::NaiveDateTime;
use serde::Serialize;

use super::pdf;
use super::InstitutionProfile;
use crate::workflows::case_study::domain::{CaseStudyRequest, RequestId};

const WRAP_COLUMNS: usize = 90;
const BODY_LINES_PER_PAGE: usize = 40;
const BULLET: &str = "\u{2022}";

/// Typographic role of a line; the PDF encoder maps each to a font and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Title,
    Subtitle,
    Heading,
    Body,
    Strong,
    Small,
    Footer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LetterLine {
    pub style: LineStyle,
    pub text: String,
}

impl LetterLine {
    fn new(style: LineStyle, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }

    fn blank() -> Self {
        Self::new(LineStyle::Body, String::new())
    }

    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LetterPage {
    pub number: usize,
    pub lines: Vec<LetterLine>,
}

/// Official permission letter laid out into pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionLetter {
    pub reference: RequestId,
    pub file_name: String,
    pub generated_at: NaiveDateTime,
    pub pages: Vec<LetterPage>,
}

impl PermissionLetter {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Plain-text rendering; pages are separated by a form feed.
    pub fn to_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| {
                page.lines
                    .iter()
                    .map(|line| line.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect::<Vec<_>>()
            .join("\n\u{000C}\n")
    }

    /// Minimal PDF 1.4 encoding of the laid-out pages.
    pub fn to_pdf_bytes(&self) -> Vec<u8> {
        pdf::encode(&self.pages)
    }
}

pub(super) fn compose(
    institution: &InstitutionProfile,
    request: &CaseStudyRequest,
    generated_at: NaiveDateTime,
) -> PermissionLetter {
    let body = letter_body(institution, request, generated_at);
    let pages = paginate(institution, body);

    PermissionLetter {
        reference: request.id.clone(),
        file_name: format!("Case_Study_Permission_{}.pdf", request.student.student_id),
        generated_at,
        pages,
    }
}

fn letter_body(
    institution: &InstitutionProfile,
    request: &CaseStudyRequest,
    generated_at: NaiveDateTime,
) -> Vec<LetterLine> {
    let student = &request.student;
    let site = &request.site;
    let requirements = &request.requirements;
    let mut lines = Vec::new();

    lines.push(LetterLine::new(
        LineStyle::Strong,
        format!("Date: {}", generated_at.format("%B %d, %Y")),
    ));
    lines.push(LetterLine::new(
        LineStyle::Strong,
        format!("Ref: {}", request.id),
    ));
    lines.push(LetterLine::blank());

    lines.push(LetterLine::new(
        LineStyle::Strong,
        "To: The Concerned Authority",
    ));
    push_wrapped(&mut lines, LineStyle::Body, site.building_name.trim(), "");
    for address_line in site.address.lines() {
        push_wrapped(&mut lines, LineStyle::Body, address_line.trim(), "");
    }
    lines.push(LetterLine::blank());

    lines.push(LetterLine::new(
        LineStyle::Strong,
        "Subject: Permission for Architectural Case Study Research",
    ));
    lines.push(LetterLine::blank());
    lines.push(LetterLine::new(LineStyle::Body, "Dear Sir/Madam,"));
    lines.push(LetterLine::blank());

    push_paragraph(
        &mut lines,
        &format!(
            "This letter serves as an official recommendation for {}, Student ID: {}, a {} student pursuing {} at {}, {}.",
            student.name, student.student_id, student.year, student.program,
            institution.institution, institution.school
        ),
    );
    push_paragraph(
        &mut lines,
        &format!(
            "The student is conducting an architectural case study of {} as part of their academic research work for the course '{}' under the guidance of {}.",
            site.building_name, site.course, site.faculty_guide
        ),
    );

    lines.push(LetterLine::new(LineStyle::Heading, "Study Requirements:"));
    let bullets = [
        ("Purpose", site.purpose.clone()),
        ("Building Type", site.building_type.clone()),
        ("Expected Duration", requirements.duration.clone()),
        ("Number of Visits", requirements.visit_count.clone()),
        (
            "Documentation Required",
            requirements.documentation_summary(),
        ),
    ];
    for (label, value) in bullets {
        push_wrapped(
            &mut lines,
            LineStyle::Body,
            &format!("{BULLET} {label}: {}", value.trim()),
            "  ",
        );
    }
    lines.push(LetterLine::blank());

    push_paragraph(
        &mut lines,
        "This study is strictly for academic and research purposes only. All documentation will be used solely for educational objectives and will not be used for any commercial purposes.",
    );
    push_paragraph(
        &mut lines,
        "We kindly request your permission to allow our student to conduct this case study. The student has been briefed on maintaining professionalism and respecting all property guidelines.",
    );
    push_paragraph(
        &mut lines,
        "Thank you for your cooperation in supporting architectural education.",
    );

    lines.push(LetterLine::new(LineStyle::Body, "Yours sincerely,"));
    lines.push(LetterLine::blank());
    lines.push(LetterLine::blank());
    lines.push(LetterLine::new(LineStyle::Strong, "[DIGITAL SIGNATURE]"));
    lines.push(LetterLine::new(LineStyle::Strong, "Dr. [Director Name]"));
    lines.push(LetterLine::new(
        LineStyle::Strong,
        institution.director_title.as_str(),
    ));
    lines.push(LetterLine::new(
        LineStyle::Strong,
        institution.institution.as_str(),
    ));
    lines.push(LetterLine::new(
        LineStyle::Small,
        format!("Email: {}", institution.director_email),
    ));
    lines.push(LetterLine::new(LineStyle::Small, "Phone: [Director Phone]"));
    lines.push(LetterLine::blank());

    lines.push(LetterLine::new(LineStyle::Footer, "-".repeat(80)));
    lines.push(LetterLine::new(
        LineStyle::Footer,
        format!("Request ID: {}", request.id),
    ));
    lines.push(LetterLine::new(
        LineStyle::Footer,
        format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M")),
    ));
    lines.push(LetterLine::new(
        LineStyle::Footer,
        "Status: APPROVED - Official Permission Letter",
    ));

    lines
}

fn push_paragraph(lines: &mut Vec<LetterLine>, text: &str) {
    push_wrapped(lines, LineStyle::Body, text, "");
    lines.push(LetterLine::blank());
}

fn push_wrapped(lines: &mut Vec<LetterLine>, style: LineStyle, text: &str, indent: &str) {
    for (index, chunk) in wrap(text, WRAP_COLUMNS).into_iter().enumerate() {
        let text = if index == 0 {
            chunk
        } else {
            format!("{indent}{chunk}")
        };
        lines.push(LetterLine::new(style, text));
    }
}

/// Greedy word wrap. Words longer than `width` are kept whole on their own line.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut wrapped = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };

        if needed > width && !current.is_empty() {
            wrapped.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        wrapped.push(current);
    }
    wrapped
}

fn letterhead(institution: &InstitutionProfile) -> Vec<LetterLine> {
    vec![
        LetterLine::new(LineStyle::Title, institution.institution.to_uppercase()),
        LetterLine::new(LineStyle::Subtitle, institution.school.to_uppercase()),
        LetterLine::new(LineStyle::Body, institution.location.as_str()),
        LetterLine::blank(),
    ]
}

fn paginate(institution: &InstitutionProfile, body: Vec<LetterLine>) -> Vec<LetterPage> {
    let mut pages = Vec::new();
    let mut remaining = body.into_iter().peekable();

    while remaining.peek().is_some() {
        if !pages.is_empty() {
            while remaining.peek().is_some_and(LetterLine::is_blank) {
                remaining.next();
            }
            if remaining.peek().is_none() {
                break;
            }
        }

        let number = pages.len() + 1;
        let mut lines = letterhead(institution);
        lines.extend(remaining.by_ref().take(BODY_LINES_PER_PAGE));
        lines.push(LetterLine::blank());
        lines.push(LetterLine::new(LineStyle::Footer, format!("Page {number}")));
        pages.push(LetterPage { number, lines });
    }

    pages
}
