//! Core entities for equibrief
//!
//! This crate defines the shared types used throughout the equibrief
//! workspace: citations, the claim-to-source tracker, and the core error
//! type.

pub mod citation;
pub mod error;

pub use citation::{Citation, CitationTracker, SourceType};
pub use error::{Error, Result};
