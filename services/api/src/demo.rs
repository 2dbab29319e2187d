use crate::infra::{build_service, parse_framework, read_document, AnalysisService};
use clap::Args;
use doc_analyzer::analysis::AnalysisRequest;
use doc_analyzer::assessment::AnalysisFramework;
use doc_analyzer::config::AppConfig;
use doc_analyzer::error::AppError;
use doc_analyzer::telemetry;
use serde_json::json;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Path to a UTF-8 text document
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// File name recorded with the request (defaults to the path's file name)
    #[arg(long)]
    pub(crate) file_name: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Path to a UTF-8 text document
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Framework echoed in the rationale (OWASP, NIST, ISO27001, GDPR, CUSTOM)
    #[arg(long, value_parser = parse_framework, default_value = "CUSTOM")]
    pub(crate) framework: AnalysisFramework,
}

#[derive(Args, Debug)]
pub(crate) struct ClassifyArgs {
    /// Path to a UTF-8 text document
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// File name used for categorisation (defaults to the path's file name)
    #[arg(long)]
    pub(crate) file_name: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the full JSON response for every sample instead of a digest line.
    #[arg(long)]
    pub(crate) verbose: bool,
}

struct SampleDocument {
    title: &'static str,
    file_name: &'static str,
    text: &'static str,
}

const SAMPLE_DOCUMENTS: &[SampleDocument] = &[
    SampleDocument {
        title: "Mutual NDA",
        file_name: "mutual-nda.txt",
        text: "MUTUAL NON-DISCLOSURE AGREEMENT\n\nEach party may disclose proprietary \
               information and trade secret material to the other. The receiving party \
               shall hold all such information in strict confidence for three years.",
    },
    SampleDocument {
        title: "Terms update email",
        file_name: "terms-update.eml",
        text: "From: legal@example.com\nSubject: Changes to our Terms\n\nDear customer,\n\
               We are making changes to our fees. The effective date of this policy update \
               is the first of next month.",
    },
    SampleDocument {
        title: "Marketplace terms",
        file_name: "marketplace-terms.txt",
        text: "These Terms of Service govern your use of the marketplace. By creating an \
               account you accept the acceptable use rules and the user agreement below.",
    },
    SampleDocument {
        title: "Supplier MSA",
        file_name: "supplier-msa.txt",
        text: "Master services contract between Acme Corp (customer) and Widget Ltd \
               (supplier). Deliverables are invoiced monthly; the SLA provides service \
               credits below 99.5% availability. Payment terms are net 45.",
    },
    SampleDocument {
        title: "Team offsite memo",
        file_name: "offsite.txt",
        text: "Reminder: the offsite starts at 9am on Thursday. Bring a laptop and \
               comfortable shoes.",
    },
];

fn load_service() -> Result<std::sync::Arc<AnalysisService>, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    build_service(&config)
}

fn print_json(value: &impl serde::Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => eprintln!("failed to render output: {err}"),
    }
}

pub(crate) async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let service = load_service()?;
    let request = read_document(&args.file, args.file_name)?;

    match service.analyze(request).await {
        Ok(response) => {
            print_json(&response);
            Ok(())
        }
        Err(err) => {
            print_json(&json!({ "error": err.kind(), "message": err.to_string() }));
            Err(err.into())
        }
    }
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let service = load_service()?;
    let request = read_document(&args.file, None)?;
    let assessment = service.assess(&request, args.framework)?;
    print_json(&assessment);
    Ok(())
}

pub(crate) fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let service = load_service()?;
    let request = read_document(&args.file, args.file_name)?;
    let classification = service.categorize(&request)?;
    print_json(&classification);
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = load_service()?;

    println!("Document analysis demo ({} samples)", SAMPLE_DOCUMENTS.len());
    for sample in SAMPLE_DOCUMENTS {
        let request = AnalysisRequest::new(sample.text, Some(sample.file_name.to_string()));
        let assessment = service.assess(&request, AnalysisFramework::Custom)?;
        let classification = service.categorize(&request)?;

        println!("\n{} ({})", sample.title, sample.file_name);
        match service.analyze(request).await {
            Ok(response) if args.verbose => print_json(&response),
            Ok(response) => println!(
                "  type: {} | category: {} | risks: {} | confidence: {}",
                response.document_type,
                response.risk_category,
                response.risks.len(),
                response
                    .metadata
                    .confidence_score
                    .map(|score| format!("{score:.2}"))
                    .unwrap_or_else(|| "n/a".to_string()),
            ),
            Err(err) => println!("  {}: {}", err.kind(), err),
        }
        println!(
            "  sensitivity: {} (score {:.2}) | filed as: {} ({:.2})",
            assessment.risk_level.label(),
            assessment.risk_score,
            classification.category.label(),
            classification.confidence
        );
    }

    Ok(())
}
