use log::{debug, info, warn};

use crate::llm_provider::{ChatMessage, LLMProvider};
use crate::preferences::{Extraction, ExtractionError, PreferenceRecord, parse_preferences};

const SYSTEM_PROMPT: &str = "You're a helpful book assistant. \
Extract the genre, author, and length from the user's prompt. \
Return the result in JSON format like: \
{\"genre\": \"mystery\", \"author\": \"Agatha Christie\", \"length\": \"short\"}";

/// Turns a free-text book query into a [`PreferenceRecord`] with one
/// completion request. Failures never reach the caller.
pub struct PreferenceExtractor {
    provider: Box<dyn LLMProvider>,
}

impl PreferenceExtractor {
    pub fn new(provider: Box<dyn LLMProvider>) -> Self {
        Self { provider }
    }

    /// System instruction followed by the query, verbatim.
    fn build_messages(query: &str) -> Vec<ChatMessage> {
        vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(query)]
    }

    /// Extract preferences, falling back to the empty record on any failure.
    pub async fn extract(&self, query: &str) -> PreferenceRecord {
        self.extract_detailed(query).await.into_record()
    }

    /// Same single attempt as [`extract`](Self::extract), keeping the reason
    /// when the result had to be degraded.
    pub async fn extract_detailed(&self, query: &str) -> Extraction {
        let messages = Self::build_messages(query);
        info!(
            "Extracting preferences via {} ({})",
            self.provider.name(),
            self.provider.model_name()
        );

        let outcome = match self.provider.complete(&messages).await {
            Ok(content) => {
                debug!("Completion content: {}", content);
                parse_preferences(&content)
            }
            Err(e) => Err(ExtractionError::Transport(format!("{:#}", e))),
        };

        let extraction = match outcome {
            Ok(record) => {
                info!("Extracted preferences: {:?}", record);
                Extraction::Extracted(record)
            }
            Err(reason) => Extraction::Degraded { reason },
        };
        if let Some(reason) = extraction.reason() {
            warn!("Preference extraction fell back to empty record: {}", reason);
        }
        extraction
    }
}
