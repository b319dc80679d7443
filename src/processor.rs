//! Sequential summarize / keyphrase / question pipeline over one document
//!
//! Each step degrades to a fixed fallback string when the remote call fails,
//! so one broken model never stops the other two from running.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::clients::{ChatMessage, ChatRequest, InferenceBackend, InferenceError};
use crate::config::{Config, GenerationConfig, LimitsConfig, ModelsConfig};
use crate::error::{Result, TextProcessorError};
use crate::keyphrase::{self, TaggedSpan};
use crate::prompts::multiple_choice_prompt;
use crate::utils::text::truncate_chars;

pub const SUMMARY_FALLBACK: &str = "Failed to summarize.";
pub const KEYWORDS_FALLBACK: &str = "Failed to extract keywords.";
pub const GENERATION_FALLBACK: &str = "Failed to generate text.";

/// Read a UTF-8 text file
pub fn load_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|e| TextProcessorError::Input {
        message: match e.kind() {
            std::io::ErrorKind::NotFound => format!("File not found: {}", path.display()),
            _ => format!("Failed to read {}: {}", path.display(), e),
        },
    })
}

pub struct TextProcessor<B: InferenceBackend> {
    backend: B,
    models: ModelsConfig,
    limits: LimitsConfig,
    generation: GenerationConfig,
}

impl<B: InferenceBackend> TextProcessor<B> {
    pub fn new(backend: B, config: &Config) -> Self {
        Self {
            backend,
            models: config.models.clone(),
            limits: config.limits.clone(),
            generation: config.generation.clone(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn try_summarize(&self, text: &str) -> std::result::Result<String, InferenceError> {
        let input = truncate_chars(text, self.limits.summary_input_chars);
        debug!(
            "Summarizing {} chars with {}",
            input.chars().count(),
            self.models.summarization
        );
        self.backend
            .summarize(&self.models.summarization, input)
            .await
    }

    pub async fn summarize(&self, text: &str) -> String {
        info!("Summarizing text");
        match self.try_summarize(text).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Summarization error: {}", e);
                SUMMARY_FALLBACK.to_string()
            }
        }
    }

    /// Tag the text prefix and rebuild keyphrases against the full text
    pub async fn try_extract_keywords(
        &self,
        text: &str,
        max_keywords: usize,
    ) -> std::result::Result<String, InferenceError> {
        let input = truncate_chars(text, self.limits.keyphrase_input_chars);
        let records = self
            .backend
            .classify_tokens(&self.models.keyphrase, input)
            .await?;
        let spans: Vec<TaggedSpan> = keyphrase::ingest(records);
        Ok(keyphrase::extract_keyphrases(text, &spans, max_keywords))
    }

    pub async fn extract_keywords(&self, text: &str, max_keywords: usize) -> String {
        info!("Extracting keywords");
        match self.try_extract_keywords(text, max_keywords).await {
            Ok(keywords) => keywords,
            Err(e) => {
                warn!("Keyword extraction error: {}", e);
                KEYWORDS_FALLBACK.to_string()
            }
        }
    }

    pub fn question_request(&self, text: &str, num_questions: u8) -> ChatRequest {
        ChatRequest {
            model: self.models.generation.clone(),
            messages: vec![ChatMessage::user(multiple_choice_prompt(num_questions, text))],
            max_tokens: self.generation.max_tokens,
            temperature: self.generation.temperature,
            top_p: self.generation.top_p,
        }
    }

    pub async fn try_generate_questions(
        &self,
        text: &str,
        num_questions: u8,
    ) -> std::result::Result<String, InferenceError> {
        let request = self.question_request(text, num_questions);
        self.backend.chat_completion(&request).await
    }

    pub async fn generate_questions(&self, text: &str, num_questions: u8) -> String {
        info!("Generating {} questions", num_questions);
        match self.try_generate_questions(text, num_questions).await {
            Ok(generated) => generated,
            Err(e) => {
                warn!("Text generation error: {}", e);
                GENERATION_FALLBACK.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_text_missing_file_names_path() {
        let err = load_text("definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, TextProcessorError::Input { .. }));
        assert!(err.to_string().contains("File not found: definitely/not/here.txt"));
    }

    #[test]
    fn test_load_text_reads_utf8() {
        let path = std::env::temp_dir().join(format!("tp_load_{}.txt", std::process::id()));
        std::fs::write(&path, "naïve café\n").unwrap();
        assert_eq!(load_text(&path).unwrap(), "naïve café\n");
        std::fs::remove_file(&path).ok();
    }
}
