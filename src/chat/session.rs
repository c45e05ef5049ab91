use std::sync::Arc;
use tracing::{debug, error, info};

use crate::chat::types::{Transcript, TranscriptEntry, TurnOutcome};
use crate::error::{Error, Result};
use crate::models::InferenceProvider;

/// Shown in place of a reply when the model call fails.
pub const FALLBACK_MESSAGE: &str = "I'm sorry, but I couldn't process your request at this time.";

/// One user's conversation with the assistant.
///
/// `submit` takes `&mut self`, so a session never has more than one model
/// call in flight.
pub struct ChatSession {
    provider: Arc<dyn InferenceProvider>,
    transcript: Transcript,
}

impl ChatSession {
    pub fn new(provider: Arc<dyn InferenceProvider>) -> Self {
        Self {
            provider,
            transcript: Transcript::new(),
        }
    }

    /// Runs one turn. Blank input is rejected without touching the transcript;
    /// model failures are turned into [`FALLBACK_MESSAGE`] and reported through
    /// the returned outcome.
    pub async fn submit(&mut self, user_text: &str) -> Result<TurnOutcome> {
        if user_text.trim().is_empty() {
            return Err(Error::validation("Message is empty"));
        }

        self.transcript.push(TranscriptEntry::user(user_text));
        debug!(
            provider = self.provider.get_provider_name(),
            entries = self.transcript.len(),
            "Submitting user message"
        );

        let (reply, outcome) = match self.provider.generate(user_text).await {
            Ok(text) => (text, TurnOutcome::Replied),
            Err(e) => {
                error!("Error generating response: {}", e);
                (
                    FALLBACK_MESSAGE.to_string(),
                    TurnOutcome::Fallback {
                        reason: e.to_string(),
                    },
                )
            }
        };

        self.transcript.push(TranscriptEntry::assistant(reply));
        info!(turns = self.transcript.turn_count(), fallback = outcome.is_fallback(), "Turn complete");

        Ok(outcome)
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn model_id(&self) -> &str {
        self.provider.get_model_id()
    }

    pub fn provider_name(&self) -> &str {
        self.provider.get_provider_name()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::StubProvider;
    use super::*;
    use crate::chat::types::Speaker;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_hello_scenario() {
        let mut session = ChatSession::new(Arc::new(StubProvider::replying("Hi there!")));

        let outcome = session.submit("Hello").await.unwrap();
        assert_eq!(outcome, TurnOutcome::Replied);

        let pairs: Vec<_> = session.transcript().iter().map(|e| e.as_pair()).collect();
        assert_eq!(
            pairs,
            vec![(Speaker::User, "Hello"), (Speaker::Assistant, "Hi there!")]
        );
    }

    #[tokio::test]
    async fn test_each_submit_appends_two_entries() {
        let mut session = ChatSession::new(Arc::new(StubProvider::replying("ok")));

        for (i, text) in ["one", "two", "three"].iter().enumerate() {
            let before = session.transcript().len();
            session.submit(text).await.unwrap();
            let entries = session.transcript().entries();
            assert_eq!(entries.len(), before + 2);
            assert_eq!(entries[entries.len() - 2].as_pair(), (Speaker::User, *text));
            assert_eq!(entries[entries.len() - 1].as_pair(), (Speaker::Assistant, "ok"));
            assert_eq!(session.transcript().turn_count(), i + 1);
        }
    }

    #[tokio::test]
    async fn test_failure_records_fallback() {
        let mut session = ChatSession::new(Arc::new(StubProvider::failing()));

        let outcome = session.submit("What rates do you offer?").await.unwrap();
        assert!(outcome.is_fallback());
        assert!(outcome
            .failure_reason()
            .unwrap()
            .contains("endpoint unreachable"));

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(
            transcript.last().unwrap().message(),
            "I'm sorry, but I couldn't process your request at this time."
        );
        assert_eq!(transcript.last().unwrap().speaker(), Speaker::Assistant);
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected() {
        let provider = Arc::new(StubProvider::replying("unused"));
        let mut session = ChatSession::new(provider.clone());

        assert!(matches!(session.submit("").await, Err(Error::Validation(_))));
        assert!(matches!(session.submit("  \t\n").await, Err(Error::Validation(_))));
        assert!(session.transcript().is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transcript_read_is_idempotent() {
        let mut session = ChatSession::new(Arc::new(StubProvider::replying("Hi there!")));
        session.submit("Hello").await.unwrap();

        let first = session.transcript().clone();
        let second = session.transcript().clone();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_message_is_sent_verbatim() {
        let mut session = ChatSession::new(Arc::new(StubProvider::replying("noted")));
        session.submit("  padded  ").await.unwrap();
        assert_eq!(session.transcript().entries()[0].message(), "  padded  ");
    }
}
