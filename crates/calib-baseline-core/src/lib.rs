//! Core types and utilities for comparing calibration results to a baseline.
//!
//! This crate is intentionally small and purely data-driven. It does *not*
//! run any calibration itself; it loads two result documents (a recorded
//! baseline and a freshly computed result) and scores their agreement
//! against configured tolerances.

mod compare;
mod document;
mod logger;
mod tolerance;
mod transform;

pub use compare::{compare_documents, compare_files, ComparisonReport, ReportIoError};
pub use document::{AttributeValue, DocumentError, Node, ResultDocument};
pub use tolerance::{
    check_absolute, check_ratio, check_ratio_vector, Failure, FailureKind, Side, ToleranceSpec,
    DEFAULT_RATIO_TOLERANCE,
};
pub use transform::{rotation_error_deg, translation_error, RigidTransform};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, level_from_verbosity};
