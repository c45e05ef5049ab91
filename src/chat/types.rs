use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who said a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::User => "You",
            Speaker::Assistant => "Assistant",
        }
    }
}

/// One line of the transcript. Fields are read-only once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    speaker: Speaker,
    message: String,
    timestamp: DateTime<Utc>,
}

impl TranscriptEntry {
    pub fn new(speaker: Speaker, message: impl Into<String>) -> Self {
        Self {
            speaker,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(message: impl Into<String>) -> Self {
        Self::new(Speaker::User, message)
    }

    pub fn assistant(message: impl Into<String>) -> Self {
        Self::new(Speaker::Assistant, message)
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// `(speaker, message)` view, mostly for comparisons.
    pub fn as_pair(&self) -> (Speaker, &str) {
        (self.speaker, &self.message)
    }
}

/// Append-only, insertion-ordered list of entries.
///
/// Alternation of speakers is expected but not enforced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TranscriptEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    /// Number of completed user/assistant exchanges.
    pub fn turn_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.speaker == Speaker::Assistant)
            .count()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a TranscriptEntry;
    type IntoIter = std::slice::Iter<'a, TranscriptEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// How the assistant side of a turn was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The model answered.
    Replied,
    /// The model call failed and the fallback message was recorded instead.
    Fallback { reason: String },
}

impl TurnOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, TurnOutcome::Fallback { .. })
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            TurnOutcome::Replied => None,
            TurnOutcome::Fallback { reason } => Some(reason),
        }
    }
}
