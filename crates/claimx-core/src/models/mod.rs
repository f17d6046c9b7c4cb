//! Data models for claim extraction.

pub mod claim;
pub mod config;
mod lenient;
