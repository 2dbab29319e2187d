use crate::demo::{
    run_analyze, run_assess, run_classify, run_demo, AnalyzeArgs, AssessArgs, ClassifyArgs,
    DemoArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use doc_analyzer::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Document Analyzer",
    about = "Analyze legal and business documents for risk from the command line or over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run the analysis pipeline over a local file and print the JSON response
    Analyze(AnalyzeArgs),
    /// Score a local file for sensitive-content risk
    Assess(AssessArgs),
    /// File a local document under a business category (contract, invoice, report, ...)
    Classify(ClassifyArgs),
    /// Run the bundled sample documents through the pipeline
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Analyze(args) => run_analyze(args).await,
        Command::Assess(args) => run_assess(args),
        Command::Classify(args) => run_classify(args),
        Command::Demo(args) => run_demo(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_analyzer::assessment::AnalysisFramework;

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["doc-analyzer-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn assess_parses_framework_names() {
        let cli = Cli::try_parse_from([
            "doc-analyzer-api",
            "assess",
            "--file",
            "contract.txt",
            "--framework",
            "gdpr",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Assess(args)) => {
                assert_eq!(args.framework, AnalysisFramework::Gdpr);
                assert_eq!(args.file.to_str(), Some("contract.txt"));
            }
            other => panic!("expected assess command, got {other:?}"),
        }
    }

    #[test]
    fn unknown_framework_is_rejected() {
        let result = Cli::try_parse_from([
            "doc-analyzer-api",
            "assess",
            "--file",
            "contract.txt",
            "--framework",
            "sox",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn classify_accepts_a_file_name_override() {
        let cli = Cli::try_parse_from([
            "doc-analyzer-api",
            "classify",
            "--file",
            "scan-0042.txt",
            "--file-name",
            "invoice-0042.pdf",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Classify(args)) => {
                assert_eq!(args.file.to_str(), Some("scan-0042.txt"));
                assert_eq!(args.file_name.as_deref(), Some("invoice-0042.pdf"));
            }
            other => panic!("expected classify command, got {other:?}"),
        }
    }
}
