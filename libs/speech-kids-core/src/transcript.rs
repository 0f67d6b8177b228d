//! One-shot grading of speech transcripts.
//!
//! A recognizer may report several transcripts for one utterance (interim
//! results, repeated callbacks). Each listening cycle is graded at most once:
//! the first non-empty transcript is graded and later ones are ignored until
//! the grader is re-armed by `start_listening` or `reset_transcript`.

use crate::matching::{grade_response, MatchResult};
use crate::types::MatchingMode;

#[derive(Debug, Clone, Default)]
pub struct TranscriptGrader {
    processed: bool,
}

impl TranscriptGrader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new listening attempt.
    pub fn start_listening(&mut self) {
        self.processed = false;
    }

    /// Discard the current transcript, e.g. when moving to the next word.
    pub fn reset_transcript(&mut self) {
        self.processed = false;
    }

    /// Whether the next non-empty transcript will be graded.
    pub fn is_armed(&self) -> bool {
        !self.processed
    }

    /// Grade `transcript` against `target` if this cycle has not been graded.
    pub fn submit(&mut self, transcript: &str, target: &str) -> Option<MatchResult> {
        if self.processed || transcript.is_empty() {
            return None;
        }
        self.processed = true;
        Some(grade_response(MatchingMode::Fuzzy, transcript, target))
    }
}
