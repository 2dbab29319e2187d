use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use serde_json::Value;

use crate::analysis::{
    AnalysisRequest, AnalysisRules, DocumentAnalysisService, GenerationError, ScriptedGenerator,
    TextGenerator,
};

pub(super) const NDA_TEXT: &str = "MUTUAL NON-DISCLOSURE AGREEMENT\n\nThe parties agree to keep \
all Confidential Information, including trade secret material and product roadmaps, strictly \
private for a period of two years.";

pub(super) const VENDOR_TEXT: &str = "Master services contract between Acme Corp and the \
supplier. Deliverables are due monthly and the SLA guarantees 99.9% uptime.";

pub(super) fn request(text: &str) -> AnalysisRequest {
    AnalysisRequest::new(text, None)
}

pub(super) fn reference_service() -> DocumentAnalysisService<ScriptedGenerator> {
    DocumentAnalysisService::new(AnalysisRules::default(), ScriptedGenerator::reference())
}

pub(super) fn scripted_service(response: &str) -> DocumentAnalysisService<ScriptedGenerator> {
    DocumentAnalysisService::new(AnalysisRules::default(), ScriptedGenerator::new(response))
}

/// Records prompts and answers with the reference response.
#[derive(Default)]
pub(super) struct RecordingGenerator {
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl RecordingGenerator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().expect("prompt lock").clone()
    }
}

impl TextGenerator for RecordingGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().expect("prompt lock") = Some(prompt.to_string());
        ScriptedGenerator::reference().generate(prompt).await
    }
}

pub(super) struct StalledGenerator;

impl TextGenerator for StalledGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(String::new())
    }
}

pub(super) struct PanickingGenerator;

impl TextGenerator for PanickingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        panic!("generator exploded")
    }
}

pub(super) fn shared<G: TextGenerator + 'static>(
    service: DocumentAnalysisService<G>,
) -> Arc<DocumentAnalysisService<G>> {
    Arc::new(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
