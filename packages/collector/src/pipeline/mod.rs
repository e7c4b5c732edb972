//! Extraction pipeline - the core of the library.
//!
//! The pipeline orchestrates:
//! - Prompt construction (extraction, verification, and single-text structuring)
//! - Response normalization into records
//! - The extract → verify state machine with fallback

pub mod extract;
pub mod normalize;
pub mod prompts;

pub use extract::{ExtractionOutcome, Extractor, Verification};
pub use normalize::{normalize_response, strip_code_fences};
pub use prompts::{
    format_extract_prompt, format_structure_prompt, format_verify_prompt, EXTRACT_PROMPT,
    STRUCTURE_PROMPT, VERIFY_PROMPT,
};
