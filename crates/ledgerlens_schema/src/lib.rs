//! Domain types for receipt draft extraction
//!
//! # Philosophy: Draft = Proposal, never a record
//!
//! The draft lifecycle in LedgerLens:
//!
//! 1. **Capture**: User photographs a receipt
//! 2. **Extraction**: Vision model proposes structured expense data
//! 3. **Guardrails**: Proposal is clamped against the caller's reference lists
//! 4. **Review**: User sees the draft pre-filled in the expense form
//! 5. **Confirmation**: User explicitly saves - only then does a record exist
//!
//! Nothing in this crate is ever persisted by the extraction service. A
//! [`DraftExpense`] is created once per request, returned, and discarded.
//! The invariant that matters: a draft can never reference a category or
//! account id the caller did not explicitly offer in that same request.
//!
//! # Modules
//!
//! - [`draft`]: The [`DraftExpense`] output entity and [`Confidence`] rating
//! - [`reference`]: Caller-supplied, request-scoped reference lists

pub mod draft;
pub mod reference;

pub use draft::{Confidence, DraftExpense};
pub use reference::{ReferenceAccount, ReferenceCategory};
