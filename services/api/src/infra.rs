use doc_analyzer::analysis::{AnalysisRequest, ConfiguredGenerator, DocumentAnalysisService};
use doc_analyzer::assessment::AnalysisFramework;
use doc_analyzer::config::AppConfig;
use doc_analyzer::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

pub(crate) type AnalysisService = DocumentAnalysisService<ConfiguredGenerator>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn build_service(config: &AppConfig) -> Result<Arc<AnalysisService>, AppError> {
    let rules = config.analysis_rules()?;
    let generator = ConfiguredGenerator::from_config(&config.generator)?;
    info!(generator = %generator.describe(), "text generator configured");
    Ok(Arc::new(DocumentAnalysisService::with_timeout(
        rules,
        generator,
        config.generator.timeout,
    )))
}

/// Read a document from disk. The file name defaults to the path's final component.
pub(crate) fn read_document(
    path: &Path,
    file_name: Option<String>,
) -> Result<AnalysisRequest, AppError> {
    let bytes = std::fs::read(path)?;
    let file_name = file_name.or_else(|| {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
    });
    Ok(AnalysisRequest::from_bytes(&bytes, file_name))
}

pub(crate) fn parse_framework(raw: &str) -> Result<AnalysisFramework, String> {
    AnalysisFramework::parse(raw).ok_or_else(|| {
        format!("unknown framework '{raw}' (expected OWASP, NIST, ISO27001, GDPR or CUSTOM)")
    })
}
