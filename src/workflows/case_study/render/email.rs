use std::fmt::Write as _;

use chrono::NaiveDateTime;

use super::{EmailMessage, InstitutionProfile};
use crate::workflows::case_study::domain::CaseStudyRequest;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

fn rule() -> String {
    "\u{2501}".repeat(60)
}

fn signature(content: &mut String, institution: &InstitutionProfile) {
    writeln!(content, "Best regards,").expect("write sign-off");
    writeln!(content, "Office of Director").expect("write office");
    writeln!(content, "{}", institution.school).expect("write school");
    writeln!(content, "{}", institution.institution).expect("write institution");
}

pub(super) fn director_approval_request(
    institution: &InstitutionProfile,
    request: &CaseStudyRequest,
) -> EmailMessage {
    let student = &request.student;
    let site = &request.site;
    let requirements = &request.requirements;
    let rule = rule();
    let mut content = String::new();

    writeln!(
        content,
        "CASE STUDY APPROVAL REQUIRED - {} ({})",
        student.name, student.student_id
    )
    .expect("write headline");
    content.push('\n');

    writeln!(content, "STUDENT DETAILS:\n{rule}").expect("write student header");
    writeln!(content, "- Name: {}", student.name).expect("write name");
    writeln!(content, "- Student ID: {}", student.student_id).expect("write student id");
    writeln!(content, "- Program: {} - {}", student.program, student.year)
        .expect("write program");
    writeln!(content, "- Email: {}", student.email).expect("write email");
    writeln!(content, "- Phone: {}", student.phone).expect("write phone");
    content.push('\n');

    writeln!(content, "CASE STUDY DETAILS:\n{rule}").expect("write site header");
    writeln!(content, "- Building: {}", site.building_name).expect("write building");
    writeln!(content, "- Address: {}", site.address).expect("write address");
    writeln!(content, "- Type: {}", site.building_type).expect("write type");
    writeln!(content, "- Purpose: {}", site.purpose).expect("write purpose");
    writeln!(content, "- Course: {}", site.course).expect("write course");
    writeln!(content, "- Faculty Guide: {}", site.faculty_guide).expect("write guide");
    content.push('\n');

    writeln!(content, "STUDY REQUIREMENTS:\n{rule}").expect("write requirements header");
    writeln!(content, "- Duration: {}", requirements.duration).expect("write duration");
    writeln!(content, "- Visits: {}", requirements.visit_count).expect("write visits");
    writeln!(
        content,
        "- Documentation: {}",
        requirements.documentation_summary()
    )
    .expect("write documentation");
    if let Some(notes) = &request.special_requirements {
        writeln!(content, "- Special Requirements: {notes}").expect("write special notes");
    }
    content.push('\n');

    writeln!(content, "REQUEST ID: {}", request.id).expect("write request id");
    writeln!(
        content,
        "SUBMITTED: {}",
        request.submitted_at.format(TIMESTAMP_FORMAT)
    )
    .expect("write submitted");
    content.push('\n');

    writeln!(content, "{rule}").expect("write rule");
    content.push('\n');
    writeln!(
        content,
        "TO APPROVE: Open the Case Study portal and use Request ID: {}",
        request.id
    )
    .expect("write call to action");
    writeln!(content, "Web App: {}", institution.portal_url).expect("write portal");
    content.push('\n');
    writeln!(
        content,
        "OR reply to this email with: \"APPROVED - {}\"",
        request.id
    )
    .expect("write reply instruction");
    content.push('\n');
    writeln!(content, "{rule}").expect("write rule");
    content.push('\n');
    writeln!(
        content,
        "This request will be automatically processed when approved via the portal."
    )
    .expect("write footer");

    EmailMessage {
        to: institution.director_email.clone(),
        subject: format!(
            "Case study approval required: {} ({}) - {}",
            student.name, student.student_id, request.id
        ),
        body: content,
    }
}

pub(super) fn student_confirmation(
    institution: &InstitutionProfile,
    request: &CaseStudyRequest,
) -> EmailMessage {
    let rule = rule();
    let mut content = String::new();

    writeln!(content, "Dear {},", request.student.name).expect("write greeting");
    content.push('\n');
    writeln!(
        content,
        "Your case study request has been successfully submitted and is now under review."
    )
    .expect("write intro");
    content.push('\n');

    writeln!(content, "REQUEST DETAILS:\n{rule}").expect("write details header");
    writeln!(content, "Request ID: {}", request.id).expect("write request id");
    writeln!(content, "Building: {}", request.site.building_name).expect("write building");
    writeln!(content, "Purpose: {}", request.site.purpose).expect("write purpose");
    writeln!(
        content,
        "Submitted: {}",
        request.submitted_at.format(TIMESTAMP_FORMAT)
    )
    .expect("write submitted");
    writeln!(content, "Status: UNDER REVIEW\n{rule}").expect("write status");
    content.push('\n');

    content.push_str(
        "WHAT HAPPENS NEXT:\n\
         1. Your request is being reviewed by the Director\n\
         2. You will receive approval notification within 24-48 hours\n\
         3. If approved, you'll get an official permission letter (PDF)\n\
         4. Print the letter and present it to the building authority\n\n",
    );
    content.push_str(
        "IMPORTANT REMINDERS:\n\
         - Contact the building authority 48 hours before your visit\n\
         - Carry your student ID along with the permission letter\n\
         - Follow all safety and professional protocols\n\
         - Submit your case study report within 2 weeks of completion\n\n",
    );
    writeln!(content, "If you have any questions, please contact our office.")
        .expect("write contact line");
    content.push('\n');
    signature(&mut content, institution);
    content.push('\n');

    writeln!(content, "{rule}").expect("write rule");
    writeln!(content, "This is an automated message from the Case Study Management System.")
        .expect("write automation note");
    writeln!(content, "For queries, contact: {}", institution.office_email)
        .expect("write office email");

    EmailMessage {
        to: request.student.email.clone(),
        subject: format!("Case study request received - {}", request.id),
        body: content,
    }
}

pub(super) fn student_approval_notice(
    institution: &InstitutionProfile,
    request: &CaseStudyRequest,
    approved_at: NaiveDateTime,
) -> EmailMessage {
    let rule = rule();
    let mut content = String::new();

    writeln!(content, "Dear {},", request.student.name).expect("write greeting");
    content.push('\n');
    writeln!(
        content,
        "CONGRATULATIONS! Your case study request has been APPROVED by the Director."
    )
    .expect("write intro");
    content.push('\n');

    writeln!(content, "APPROVAL DETAILS:\n{rule}").expect("write details header");
    writeln!(content, "- Building: {}", request.site.building_name).expect("write building");
    writeln!(content, "- Address: {}", request.site.address).expect("write address");
    writeln!(content, "- Purpose: {}", request.site.purpose).expect("write purpose");
    writeln!(content, "- Request ID: {}", request.id).expect("write request id");
    writeln!(content, "- Approved: {}", approved_at.format(TIMESTAMP_FORMAT))
        .expect("write approved");
    if !request.comments.is_empty() {
        writeln!(content, "- Director's comments: {}", request.comments)
            .expect("write comments");
    }
    writeln!(content, "{rule}").expect("write rule");
    content.push('\n');

    content.push_str(
        "NEXT STEPS:\n\
         1. Download and print the attached official permission letter\n\
         2. Contact the building authority 48 hours before your visit\n\
         3. Carry your student ID along with this permission letter\n\
         4. Follow all safety and professional protocols during your visit\n\
         5. Submit your case study report within 2 weeks of completion\n\n",
    );
    content.push_str(
        "IMPORTANT INSTRUCTIONS:\n\
         - Present this official letter to the building authority/security\n\
         - Maintain professional conduct throughout your study\n\
         - Respect all property guidelines and restrictions\n\
         - Take photographs only with permission\n\
         - Do not share or publish any sensitive information\n\n",
    );
    writeln!(
        content,
        "If you face any issues during your case study, contact our office immediately."
    )
    .expect("write contact line");
    content.push('\n');
    signature(&mut content, institution);
    content.push('\n');

    writeln!(content, "{rule}").expect("write rule");
    writeln!(content, "Official permission letter is attached as PDF.")
        .expect("write attachment note");
    writeln!(content, "For queries: {}", institution.office_email).expect("write office email");

    EmailMessage {
        to: request.student.email.clone(),
        subject: format!("Case study request approved - {}", request.id),
        body: content,
    }
}
