//! Steps shared by every solving flow: decode, OCR, prompt, complete, normalize.

use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{error, info, warn};

use super::SolveError;
use crate::config::FlowSettings;
use crate::domain::image::EncodedImage;
use crate::domain::normalization::{normalize, ContractRecord, NormalizationPath};
use crate::domain::prompts::{Flow, PromptPair};
use crate::ports::{AIProvider, CompletionRequest, MessageRole, OcrEngine, RequestMetadata};

/// Collaborators and settings for one flow.
#[derive(Clone)]
pub(crate) struct Pipeline {
    flow: Flow,
    ai_provider: Arc<dyn AIProvider>,
    ocr: Arc<dyn OcrEngine>,
    settings: FlowSettings,
}

impl Pipeline {
    pub(crate) fn new(
        flow: Flow,
        ai_provider: Arc<dyn AIProvider>,
        ocr: Arc<dyn OcrEngine>,
        settings: FlowSettings,
    ) -> Self {
        Self {
            flow,
            ai_provider,
            ocr,
            settings,
        }
    }

    /// Decodes every payload, failing on the first invalid one.
    pub(crate) fn decode_images(images: &[String]) -> Result<Vec<EncodedImage>, SolveError> {
        images
            .iter()
            .enumerate()
            .map(|(index, data)| {
                EncodedImage::decode(data).map_err(|source| SolveError::Image { index, source })
            })
            .collect()
    }

    /// Recognizes all images and joins their text, in input order, with blank lines.
    pub(crate) async fn recognize_all(
        &self,
        images: &[EncodedImage],
        trace_id: &str,
    ) -> Result<String, SolveError> {
        let texts = try_join_all(images.iter().map(|image| self.ocr.recognize(image))).await?;

        for (index, text) in texts.iter().enumerate() {
            if text.trim().is_empty() {
                warn!(flow = %self.flow, trace_id, index, "no text recognized in image");
            }
        }

        Ok(texts
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n"))
    }

    /// OCR text of `images` followed by the optional typed `text`.
    ///
    /// Fails with `InvalidInput` when the combination is empty.
    pub(crate) async fn gather_input(
        &self,
        images: &[String],
        text: Option<&str>,
        trace_id: &str,
    ) -> Result<String, SolveError> {
        let decoded = Self::decode_images(images)?;
        let mut combined = self.recognize_all(&decoded, trace_id).await?;

        if let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) {
            if !combined.is_empty() {
                combined.push_str("\n\n");
            }
            combined.push_str(text);
        }

        if combined.is_empty() {
            return Err(SolveError::invalid_input(
                "no text could be read from the request",
            ));
        }
        Ok(combined)
    }

    /// Sends the prompt and normalizes the reply into `R`.
    pub(crate) async fn solve<R: ContractRecord>(
        &self,
        prompt: PromptPair,
        trace_id: &str,
    ) -> Result<R, SolveError> {
        let mut request = CompletionRequest::new(RequestMetadata::new(self.flow, trace_id))
            .with_system_prompt(prompt.system)
            .with_message(MessageRole::User, prompt.user)
            .with_max_tokens(self.settings.max_tokens)
            .with_temperature(self.settings.temperature);
        if let Some(model) = &self.settings.model {
            request = request.with_model(model.clone());
        }

        let response = self.ai_provider.complete(request).await.map_err(|err| {
            error!(flow = %self.flow, trace_id, error = %err, "model call failed");
            SolveError::Upstream(err)
        })?;

        let normalized = normalize(&response.content, R::contract());
        let defaulted = normalized
            .record
            .fields()
            .filter(|(_, field)| field.is_defaulted())
            .count();
        info!(
            flow = %self.flow,
            trace_id,
            model = %response.model,
            recovered = normalized.path == NormalizationPath::Recovered,
            defaulted,
            "model output normalized"
        );

        Ok(normalized.into_typed())
    }
}
