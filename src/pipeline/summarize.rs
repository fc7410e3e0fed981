//! Natural-language summaries of a diff.
//!
//! A failed language-model call is never an error here. It degrades to a
//! [`Summary::Fallback`] that carries the failure and a raw diff excerpt,
//! so the report still goes out.

use std::fmt;

use crate::models::SummaryConfig;
use crate::services::TextGenerator;
use crate::utils::truncate_chars;

pub const NOTHING_TO_ANALYZE: &str = "No changes to analyze.";

/// Limits applied to a single summarization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryLimits {
    /// Diff characters embedded in the prompt
    pub prompt_chars: usize,
    /// Diff characters kept in a fallback summary
    pub fallback_chars: usize,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

impl Default for SummaryLimits {
    fn default() -> Self {
        Self::from(&SummaryConfig::default())
    }
}

impl From<&SummaryConfig> for SummaryLimits {
    fn from(config: &SummaryConfig) -> Self {
        Self {
            prompt_chars: config.prompt_char_limit,
            fallback_chars: config.fallback_char_limit,
            max_tokens: config.max_tokens,
        }
    }
}

/// Result of a summarization attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary {
    /// Empty diff, the service was not called.
    NothingToAnalyze,
    /// Text returned by the service, verbatim.
    Generated(String),
    /// The service call failed.
    Fallback { error: String, excerpt: String },
}

impl Summary {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Summary::Fallback { .. })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Summary::NothingToAnalyze => f.write_str(NOTHING_TO_ANALYZE),
            Summary::Generated(text) => f.write_str(text),
            Summary::Fallback { error, excerpt } => write!(
                f,
                "Error analyzing changes: {error}\n\nRaw diff:\n{excerpt}"
            ),
        }
    }
}

/// Prompt sent to the language model for a diff.
pub fn build_prompt(diff: &str, max_chars: usize) -> String {
    format!(
        "Please analyze the changes in this document and provide a clear, concise summary.\n\
         \n\
         Focus on:\n\
         - What sections changed\n\
         - Key additions or deletions\n\
         - Important updates or modifications\n\
         - Overall significance of changes\n\
         \n\
         Here are the detected changes:\n\
         {}\n\
         \n\
         Please provide a professional summary suitable for an email.",
        truncate_chars(diff, max_chars)
    )
}

/// Turns diffs into short summaries through a [`TextGenerator`].
pub struct ChangeSummarizer<'a> {
    generator: &'a dyn TextGenerator,
    limits: SummaryLimits,
}

impl<'a> ChangeSummarizer<'a> {
    pub fn new(generator: &'a dyn TextGenerator, limits: SummaryLimits) -> Self {
        Self { generator, limits }
    }

    pub async fn summarize(&self, diff: &str) -> Summary {
        if diff.is_empty() {
            return Summary::NothingToAnalyze;
        }

        let prompt = build_prompt(diff, self.limits.prompt_chars);
        match self.generator.generate(&prompt, self.limits.max_tokens).await {
            Ok(text) => {
                log::info!("Summary generated ({} chars)", text.chars().count());
                Summary::Generated(text)
            }
            Err(e) => {
                log::warn!("Summarization failed, using raw diff excerpt: {}", e);
                Summary::Fallback {
                    error: e.to_string(),
                    excerpt: truncate_chars(diff, self.limits.fallback_chars).to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::llm::MockTextGenerator;

    #[tokio::test]
    async fn test_empty_diff_skips_service() {
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().times(0);

        let summarizer = ChangeSummarizer::new(&generator, SummaryLimits::default());
        let summary = summarizer.summarize("").await;

        assert_eq!(summary, Summary::NothingToAnalyze);
        assert_eq!(summary.to_string(), "No changes to analyze.");
    }

    #[tokio::test]
    async fn test_generated_text_returned_verbatim() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .withf(|prompt, max_tokens| prompt.contains("+new line") && *max_tokens == 1000)
            .times(1)
            .returning(|_, _| Ok("  The fee table was updated.\n".to_string()));

        let summarizer = ChangeSummarizer::new(&generator, SummaryLimits::default());
        let summary = summarizer.summarize("-old line\n+new line\n").await;

        assert_eq!(
            summary,
            Summary::Generated("  The fee table was updated.\n".to_string())
        );
    }

    #[tokio::test]
    async fn test_service_failure_falls_back() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(|_, _| Err(AppError::summarization("API returned 401 Unauthorized")));

        let diff = format!("--- Previous Week\n+++ Current Week\n{}", "+x\n".repeat(2000));
        let summarizer = ChangeSummarizer::new(&generator, SummaryLimits::default());
        let summary = summarizer.summarize(&diff).await;

        match &summary {
            Summary::Fallback { error, excerpt } => {
                assert!(error.contains("401 Unauthorized"));
                assert!(!excerpt.is_empty());
                assert_eq!(excerpt.chars().count(), 2000);
                assert!(diff.starts_with(excerpt.as_str()));
            }
            other => panic!("expected fallback, got {other:?}"),
        }
        let text = summary.to_string();
        assert!(text.contains("401 Unauthorized"));
        assert!(text.contains("Raw diff:\n--- Previous Week"));
    }

    #[test]
    fn test_prompt_structure() {
        let prompt = build_prompt("-a\n+b\n", 8000);
        let focus = prompt.find("Focus on:").unwrap();
        let diff = prompt.find("-a\n+b\n").unwrap();
        let tone = prompt.find("professional summary").unwrap();
        assert!(focus < diff && diff < tone);
        for item in [
            "What sections changed",
            "Key additions or deletions",
            "Important updates or modifications",
            "Overall significance of changes",
        ] {
            assert!(prompt.contains(item));
        }
    }

    #[test]
    fn test_prompt_truncates_diff() {
        let diff = "y".repeat(9000);
        let prompt = build_prompt(&diff, 8000);
        assert!(prompt.contains(&"y".repeat(8000)));
        assert!(!prompt.contains(&"y".repeat(8001)));
    }
}
