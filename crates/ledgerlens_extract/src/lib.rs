//! Receipt-to-Draft Extraction Pipeline
//!
//! The one non-trivial path in LedgerLens: take an embedded receipt image
//! and the caller's reference lists, ask a vision model for structured
//! expense data, then treat the model's answer as untrusted input all the
//! way down. Every invocation moves through a fixed sequence:
//!
//! ```text
//! Validating -> Prompting -> AwaitingInference -> ParsingResponse -> Normalizing -> Done
//! ```
//!
//! Any step's failure short-circuits with an [`ExtractError`]; no partial
//! drafts are ever returned. Guardrail violations (an id the caller never
//! offered, an out-of-range amount) are NOT failures - they are corrected
//! to null, reported in `warnings`, and the confidence is forced down,
//! because the product goal is to always offer a best-effort draft and
//! flag uncertainty instead of blocking the user.
//!
//! # Modules
//!
//! - [`image`]: data-URL validation into an [`ImagePayload`]
//! - [`prompt`]: system instruction and user-turn construction
//! - [`response`]: locating readable text in the provider's raw response
//! - [`normalize`]: per-field sanitization and referential guardrails
//! - [`extractor`]: the [`DraftExtractor`] tying the steps together

pub mod error;
pub mod extractor;
pub mod image;
pub mod normalize;
pub mod prompt;
pub mod response;

pub use error::{ExtractError, Result};
pub use extractor::{DraftExtractor, ExtractOptions, DEFAULT_AMOUNT_CEILING};
pub use image::ImagePayload;
pub use normalize::{normalize_draft, WARN_ACCOUNT_NOT_ALLOWED, WARN_CATEGORY_NOT_ALLOWED};
