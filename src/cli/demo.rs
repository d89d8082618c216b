use case_study_desk::config::AppConfig;
use case_study_desk::error::AppError;
use case_study_desk::workflows::case_study::{
    export_file_name, export_rows, write_csv, CaseStudySubmission, DecisionOutcome,
    DocumentRenderer, DocumentationType, EmailMessage, RequestLedger, SiteDetails,
    StudentDetails, StudyRequirements,
};
use chrono::Local;
use clap::Args;
use std::fs::{self, File};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Directory that receives the permission letter PDF and the ledger CSV export.
    #[arg(long)]
    pub(crate) out_dir: Option<PathBuf>,
    /// Reject the sample request instead of approving it.
    #[arg(long)]
    pub(crate) reject: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { out_dir, reject } = args;

    let config = AppConfig::load()?;
    let ledger = RequestLedger::new();
    let renderer = DocumentRenderer::new(config.institution.clone());

    println!(
        "Case study desk demo ({}, {})",
        config.institution.institution, config.institution.school
    );

    let record = match ledger.submit(demo_submission()) {
        Ok(record) => record,
        Err(err) => {
            println!("  Submission rejected: {}", err);
            return Ok(());
        }
    };
    println!(
        "- Received request {} -> status {}",
        record.id, record.status
    );

    print_email("Student confirmation", &renderer.student_confirmation(&record)?);
    print_email(
        "Director approval request",
        &renderer.director_approval_request(&record)?,
    );

    let (outcome, comments) = if reject {
        (DecisionOutcome::Rejected, "")
    } else {
        (
            DecisionOutcome::Approved,
            "Coordinate access with the estate office before the first visit.",
        )
    };
    let decided = ledger.decide(&record.id, outcome, comments)?;
    println!(
        "\n- Director decision for {}: {} ({})",
        decided.id, decided.status, decided.comments
    );

    let letter = match outcome {
        DecisionOutcome::Approved => {
            print_email(
                "Student approval notice",
                &renderer.student_approval_notice(&decided)?,
            );
            let letter = renderer.approval_letter(&decided, Local::now().naive_local())?;
            println!(
                "\nPermission letter {} ({} page(s))",
                letter.file_name,
                letter.page_count()
            );
            println!("{}", letter.to_text());
            Some(letter)
        }
        DecisionOutcome::Rejected => {
            println!("  No permission letter issued for a rejected request");
            None
        }
    };

    let counts = ledger.counts();
    println!(
        "\nLedger summary: {} total | {} pending | {} approved | {} rejected",
        counts.total, counts.pending, counts.approved, counts.rejected
    );

    let Some(out_dir) = out_dir else {
        return Ok(());
    };

    fs::create_dir_all(&out_dir)?;
    if let Some(letter) = letter {
        let path = out_dir.join(&letter.file_name);
        fs::write(&path, letter.to_pdf_bytes())?;
        println!("- Wrote {}", path.display());
    }

    let rows = export_rows(&ledger.list_by_status(None));
    let path = out_dir.join(export_file_name(Local::now().date_naive()));
    write_csv(&rows, File::create(&path)?)?;
    println!("- Wrote {}", path.display());

    Ok(())
}

fn print_email(heading: &str, email: &EmailMessage) {
    println!("\n{heading}");
    println!("  To: {}", email.to);
    println!("  Subject: {}", email.subject);
    for line in email.body.lines() {
        println!("  | {line}");
    }
}

fn demo_submission() -> CaseStudySubmission {
    CaseStudySubmission {
        student: StudentDetails {
            name: "Meera Nair".to_string(),
            student_id: "R22AR117".to_string(),
            program: "B.Arch".to_string(),
            year: "4th Year".to_string(),
            email: "meera.nair@example.edu".to_string(),
            phone: "+91 9000012345".to_string(),
        },
        site: SiteDetails {
            building_name: "Bangalore International Centre".to_string(),
            address: "7, 4th Main Road, Domlur II Stage\nBengaluru 560071".to_string(),
            building_type: "Cultural".to_string(),
            purpose: "Documentation of passive cooling strategies and public courtyard use"
                .to_string(),
            course: "Architectural Design VII".to_string(),
            faculty_guide: "Ar. S. Menon".to_string(),
        },
        requirements: StudyRequirements {
            duration: "2 Weeks".to_string(),
            visit_count: "3-4 Visits".to_string(),
            documentation_types: [
                DocumentationType::Photography,
                DocumentationType::Measurements,
                DocumentationType::TechnicalDrawings,
            ]
            .into_iter()
            .collect(),
        },
        special_requirements: Some("Roof terrace access for section drawings".to_string()),
        declaration_accepted: true,
    }
}
