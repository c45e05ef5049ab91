pub mod session;
pub mod types;

pub use session::{ChatSession, FALLBACK_MESSAGE};
pub use types::{Speaker, Transcript, TranscriptEntry, TurnOutcome};
