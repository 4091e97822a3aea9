//! Text extraction from fetched content
//!
//! This module converts raw HTML or PDF bytes into normalized plain
//! text and judges whether the result is substantive enough to keep.
//!
//! ## Key Components
//!
//! - `extract_html`: layered HTML extraction (main-content scoring, a
//!   single re-fetch, then a crude whole-document render)
//! - `extract_pdf`: page-bounded PDF extraction with per-page fault
//!   isolation
//! - `is_substantive`: the content-quality gate applied before a source
//!   is accepted
//!
//! Both extractors degrade to an empty string instead of failing.

mod html;
mod pdf;
mod validate;

pub use html::extract_html;
pub use pdf::extract_pdf;
pub use validate::is_substantive;

/// Minimum character count for extracted text to count as content
pub const MIN_CONTENT_CHARS: usize = 100;

/// Whether a declared content type selects the PDF extraction branch
pub fn is_pdf_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.contains("pdf"))
}
