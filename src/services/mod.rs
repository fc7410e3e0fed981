//! External collaborators of the pipeline.
//!
//! Each service sits behind a narrow trait so the orchestrator can be driven
//! by fakes in tests:
//!
//! - `fetcher`: downloads the document ([`DocumentFetcher`])
//! - `extractor`: turns PDF bytes into text ([`TextExtractor`])
//! - `llm`: language-model text generation ([`TextGenerator`])
//! - `mailer`: report delivery ([`Notifier`])

pub mod extractor;
pub mod fetcher;
pub mod llm;
pub mod mailer;

pub use extractor::{PdfTextExtractor, TextExtractor};
pub use fetcher::{DocumentFetcher, HttpFetcher};
pub use llm::{AnthropicClient, TextGenerator};
pub use mailer::{Delivery, Notifier, SmtpNotifier};
