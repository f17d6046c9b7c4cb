//! Core library for medical claim extraction.
//!
//! This crate provides:
//! - Canonical claim record model (document, member, patient, diagnoses,
//!   line items, totals)
//! - Pattern-based extraction over OCR text
//! - Repair of model-produced JSON into the canonical schema
//! - Deterministic reconciliation of the two partial records
//! - An async pipeline and question answering over a chat backend

pub mod error;
pub mod models;
pub mod claim;
pub mod prompt;
pub mod pipeline;

pub use error::{ClaimsError, Result};
pub use models::claim::{
    Admission, ClaimRecord, Diagnosis, DocumentInfo, LineItem, Medication, Member, Patient,
    Totals,
};
pub use models::config::{ClaimsConfig, ExtractionConfig, ModelConfig, QaConfig};
pub use claim::{
    ClaimExtractor, ExtractionSource, ModelOutputAdapter, PartialClaim, PatternExtractor,
};
pub use claim::merge::{merge, merge_into, CriticalField, MergeReport};
pub use claim::rules::amounts::normalize_amount;
pub use claim::text::clean_text;
pub use pipeline::{preparse, ClaimPipeline, ExtractedDocument};

/// Re-export backend types.
pub use claimx_inference::{ChatBackend, ChatMessage, ChatRequest, InferenceError, TogetherBackend};
