//! Prescription text → canonical treatment codes.
//!
//! Keyword and synonym tables are ordered slices: scan order decides which
//! code is discovered first and therefore the final ordering.

pub mod extractor;
pub mod keywords;
pub mod similarity;

pub use extractor::*;
pub use keywords::*;
