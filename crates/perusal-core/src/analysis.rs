//! Complexity-aware reading-time estimation.
//!
//! The estimate is `tokens / words_per_minute` minutes, scaled by a
//! discrete [`Complexity`] factor. The factor comes from two signals:
//!
//! - **syntactic depth**: within each sentence, count tokens tagged as
//!   verbs, subordinating conjunctions or wh-words. The largest count
//!   over all sentences stands in for clause nesting.
//! - **average sentence length**: `floor(0.75 * tokens) / sentences`,
//!   where the 0.75 discounts punctuation and other non-word tokens.
//!
//! | max depth | avg. length | complexity            |
//! |-----------|-------------|-----------------------|
//! | <= 4      | <= 20       | [`Complexity::Low`]      (1.0) |
//! | <= 4      | > 20        | [`Complexity::Moderate`] (1.5) |
//! | > 4       | <= 20       | [`Complexity::Moderate`] (1.5) |
//! | > 4       | > 20        | [`Complexity::High`]     (2.0) |

use std::time::Duration;

use crate::error::AppError;
use crate::models::{Complexity, ReadingResource, TaggedDocument};
use crate::traits::Tagger;

const WORDS_PER_TOKEN: f64 = 0.75;
const DEPTH_THRESHOLD: usize = 4;
const SENTENCE_LENGTH_THRESHOLD: f64 = 20.0;

/// Default reading speed in words per minute.
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

/// Result of scoring one document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub complexity: Complexity,
    /// Unscaled reading time in minutes.
    pub base_minutes: f64,
    pub token_count: usize,
    pub word_count: usize,
    pub sentence_count: usize,
    pub max_depth: usize,
}

impl Estimate {
    pub fn scaled_minutes(&self) -> f64 {
        self.base_minutes * self.complexity.factor()
    }

    /// Scaled reading time, rounded to whole seconds.
    pub fn read_time(&self) -> Duration {
        Duration::from_secs((self.scaled_minutes() * 60.0).round() as u64)
    }
}

/// Largest per-sentence count of clause-deepening tokens.
pub fn max_syntactic_depth(doc: &TaggedDocument) -> usize {
    let mut depth = 0;
    let mut max_depth = 0;

    for token in &doc.tokens {
        if token.deepens_clause() {
            depth += 1;
        } else if token.ends_sentence() {
            max_depth = max_depth.max(depth);
            depth = 0;
        }
    }

    max_depth
}

fn classify(max_depth: usize, average_sentence_length: f64) -> Complexity {
    let deep = max_depth > DEPTH_THRESHOLD;
    let long = average_sentence_length > SENTENCE_LENGTH_THRESHOLD;

    match (deep, long) {
        (false, false) => Complexity::Low,
        (false, true) | (true, false) => Complexity::Moderate,
        (true, true) => Complexity::High,
    }
}

/// Score a tagged document.
pub fn score(doc: &TaggedDocument, words_per_minute: u32) -> Result<Estimate, AppError> {
    if words_per_minute == 0 {
        return Err(AppError::AnalysisError(
            "reading speed must be at least 1 word per minute".into(),
        ));
    }
    if doc.sentence_count == 0 {
        return Err(AppError::AnalysisError("document has no sentences".into()));
    }

    let token_count = doc.tokens.len();
    let word_count = (token_count as f64 * WORDS_PER_TOKEN).floor() as usize;
    let max_depth = max_syntactic_depth(doc);
    let average_sentence_length = word_count as f64 / doc.sentence_count as f64;

    Ok(Estimate {
        complexity: classify(max_depth, average_sentence_length),
        base_minutes: token_count as f64 / f64::from(words_per_minute),
        token_count,
        word_count,
        sentence_count: doc.sentence_count,
        max_depth,
    })
}

/// Tags text with an injected [`Tagger`] and scores it.
#[derive(Debug, Clone)]
pub struct ComplexityEstimator<T: Tagger> {
    tagger: T,
    words_per_minute: u32,
}

impl<T: Tagger> ComplexityEstimator<T> {
    pub fn new(tagger: T, words_per_minute: u32) -> Self {
        Self {
            tagger,
            words_per_minute,
        }
    }

    pub fn words_per_minute(&self) -> u32 {
        self.words_per_minute
    }

    /// Join the fragments into one document, tag it, and score it.
    pub fn estimate<S: AsRef<str>>(&self, fragments: &[S]) -> Result<Estimate, AppError> {
        let text = fragments
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" ");
        let doc = self.tagger.tag(&text)?;
        score(&doc, self.words_per_minute)
    }

    /// Score an extracted resource and record the result on it.
    ///
    /// Blogs are passed through unscored. Returns the estimate when one
    /// was computed.
    pub fn analyse(&self, resource: &mut ReadingResource) -> Result<Option<Estimate>, AppError> {
        if !resource.kind.is_scored() {
            tracing::debug!(url = %resource.raw_url, "Skipping scoring for blog resource");
            return Ok(None);
        }

        let estimate = self.estimate(&resource.raw_content)?;
        resource.word_count = estimate.word_count;
        resource.complexity = Some(estimate.complexity);
        resource.read_time = Some(estimate.read_time());
        Ok(Some(estimate))
    }
}
