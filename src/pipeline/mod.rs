//! Prescription processing: text extraction, then treatment detection.

pub mod extraction;
pub mod treatments;
