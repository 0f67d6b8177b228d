//! Answer matching for spoken and selected responses.

use crate::types::MatchingMode;
use serde::{Deserialize, Serialize};

/// Largest edit distance still accepted as a correct utterance.
pub const MAX_EDIT_DISTANCE: usize = 2;

/// Result of grading a response against the expected answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Whether the response is considered correct.
    pub is_correct: bool,
    /// Edit distance between the normalized strings.
    pub distance: usize,
    /// The matching mode used.
    pub matching_mode: MatchingMode,
    /// Normalized response (for display).
    pub response_normalized: String,
    /// Normalized expected answer (for display).
    pub expected_normalized: String,
}

/// Grade a response with the given matching mode.
pub fn grade_response(mode: MatchingMode, response: &str, expected: &str) -> MatchResult {
    let response_normalized = normalize(response);
    let expected_normalized = normalize(expected);
    let distance = levenshtein_distance(&response_normalized, &expected_normalized);

    let is_correct = match mode {
        MatchingMode::Exact => response_normalized == expected_normalized,
        MatchingMode::Fuzzy => accepts(&response_normalized, &expected_normalized, distance),
    };

    MatchResult {
        is_correct,
        distance,
        matching_mode: mode,
        response_normalized,
        expected_normalized,
    }
}

/// Decide whether a transcript is close enough to the target word.
///
/// Both sides are trimmed and lower-cased, then accepted on equality,
/// containment in either direction, or an edit distance of at most
/// [`MAX_EDIT_DISTANCE`].
pub fn is_acceptable_match(spoken: &str, target: &str) -> bool {
    let spoken = normalize(spoken);
    let target = normalize(target);
    let distance = levenshtein_distance(&spoken, &target);
    accepts(&spoken, &target, distance)
}

fn accepts(spoken: &str, target: &str, distance: usize) -> bool {
    // An empty needle is contained in everything; only real text counts.
    spoken == target
        || (!target.is_empty() && spoken.contains(target))
        || (!spoken.is_empty() && target.contains(spoken))
        || distance <= MAX_EDIT_DISTANCE
}

/// Trim surrounding whitespace and lower-case.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Calculate Levenshtein distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Two rows of the (m+1) x (n+1) table are enough.
    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;

        for j in 1..=n {
            let cost = if a_chars[i - 1] == b_chars[j - 1] {
                0
            } else {
                1
            };

            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}
