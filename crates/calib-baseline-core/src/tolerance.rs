//! Tolerance rules and failure accounting.
//!
//! Two comparison rules cover every checked field: an absolute threshold on
//! transform errors, and a relative-ratio tolerance on baseline/current
//! metric ratios. Failures are accumulated as records, never raised as
//! errors; the length of the record list is the run's verdict.

use std::fmt;

use serde::Serialize;

/// Relative tolerance applied to metric ratios when none is configured.
pub const DEFAULT_RATIO_TOLERANCE: f64 = 0.05;

/// Thresholds for one comparison run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ToleranceSpec {
    /// Absolute translation-error threshold, millimeters.
    pub translation_error_mm: f64,
    /// Absolute rotation-error threshold, degrees.
    pub rotation_error_deg: f64,
    /// Relative tolerance on baseline/current metric ratios.
    pub ratio_tolerance: f64,
}

impl ToleranceSpec {
    /// Transform thresholds with the default 5% metric tolerance.
    pub fn new(translation_error_mm: f64, rotation_error_deg: f64) -> Self {
        Self {
            translation_error_mm,
            rotation_error_deg,
            ratio_tolerance: DEFAULT_RATIO_TOLERANCE,
        }
    }
}

/// Which document a missing piece of data belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Baseline,
    Current,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Baseline => write!(f, "baseline"),
            Side::Current => write!(f, "current"),
        }
    }
}

/// Specific problem found while comparing one field.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    DocumentUnreadable { side: Side, reason: String },
    SectionMissing { side: Side },
    AttributeMissing { side: Side },
    AbsoluteExceeded { error: f64, threshold: f64, unit: &'static str },
    RatioExceeded { baseline: f64, current: f64, tolerance: f64 },
    RatioUndefined { baseline: f64 },
}

/// One recorded failure with the field it concerns.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Failure {
    /// Slash-separated section path plus attribute, e.g.
    /// `ErrorReports/PointReconstructionErrorAnalysis@PRE[3]`.
    pub field: String,
    pub kind: FailureKind,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FailureKind::DocumentUnreadable { side, reason } => {
                write!(f, "reading the {side} document failed: {reason}")
            }
            FailureKind::SectionMissing { side } => {
                write!(f, "{side} {} section is missing", self.field)
            }
            FailureKind::AttributeMissing { side } => {
                write!(f, "{side} {} attribute is missing", self.field)
            }
            FailureKind::AbsoluteExceeded {
                error,
                threshold,
                unit,
            } => write!(
                f,
                "{} error is higher than expected: {error} {unit} (threshold: {threshold} {unit})",
                self.field
            ),
            FailureKind::RatioExceeded {
                baseline,
                current,
                tolerance,
            } => write!(
                f,
                "{} mismatch: current={current}, baseline={baseline} (tolerance: {tolerance})",
                self.field
            ),
            FailureKind::RatioUndefined { baseline } => write!(
                f,
                "{} ratio is undefined: current=0, baseline={baseline}",
                self.field
            ),
        }
    }
}

/// Absolute-threshold rule: fails only on a strict `error > threshold`.
///
/// An error exactly at the threshold passes.
pub fn check_absolute(
    field: &str,
    error: f64,
    threshold: f64,
    unit: &'static str,
    failures: &mut Vec<Failure>,
) {
    if error > threshold {
        failures.push(Failure {
            field: field.to_string(),
            kind: FailureKind::AbsoluteExceeded {
                error,
                threshold,
                unit,
            },
        });
    }
}

/// Relative-ratio rule on `baseline / current`.
///
/// Fails when the ratio leaves `[1 - tolerance, 1 + tolerance]`. The ratio
/// is undefined for `current == 0`: exact agreement (`baseline == 0` too)
/// passes, anything else is recorded as an explicit failure so that a
/// non-finite ratio never reaches the verdict.
pub fn check_ratio(
    field: &str,
    baseline: f64,
    current: f64,
    tolerance: f64,
    failures: &mut Vec<Failure>,
) {
    if current == 0.0 {
        if baseline != 0.0 {
            failures.push(Failure {
                field: field.to_string(),
                kind: FailureKind::RatioUndefined { baseline },
            });
        }
        return;
    }
    let ratio = baseline / current;
    if ratio > 1.0 + tolerance || ratio < 1.0 - tolerance {
        failures.push(Failure {
            field: field.to_string(),
            kind: FailureKind::RatioExceeded {
                baseline,
                current,
                tolerance,
            },
        });
    }
}

/// Ratio rule applied independently per component; no short-circuit, each
/// failing component is reported on its own.
pub fn check_ratio_vector(
    field: &str,
    baseline: &[f64],
    current: &[f64],
    tolerance: f64,
    failures: &mut Vec<Failure>,
) {
    for (i, (b, c)) in baseline.iter().zip(current).enumerate() {
        check_ratio(&format!("{field}[{i}]"), *b, *c, tolerance, failures);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_rule_is_strict() {
        let mut failures = Vec::new();
        check_absolute("t", 0.2, 0.2, "mm", &mut failures);
        assert!(failures.is_empty(), "error at the threshold must pass");

        check_absolute("t", 0.2000001, 0.2, "mm", &mut failures);
        assert_eq!(failures.len(), 1);
        assert!(matches!(
            failures[0].kind,
            FailureKind::AbsoluteExceeded { threshold, .. } if threshold == 0.2
        ));
    }

    #[test]
    fn ratio_boundary_is_strict() {
        let mut failures = Vec::new();
        // ratio exactly 1 + tolerance passes
        check_ratio("m", 1.05, 1.0, 0.05, &mut failures);
        assert!(failures.is_empty());

        check_ratio("m", 1.06, 1.0, 0.05, &mut failures);
        check_ratio("m", 0.94, 1.0, 0.05, &mut failures);
        assert_eq!(failures.len(), 2);
    }

    #[test]
    fn ratio_rule_is_asymmetric() {
        // Swapping baseline and current changes the verdict near the lower
        // bound: 0.951/1.0 passes while 1.0/0.951 ~ 1.0515 fails.
        let mut failures = Vec::new();
        check_ratio("m", 0.951, 1.0, 0.05, &mut failures);
        assert!(failures.is_empty());

        check_ratio("m", 1.0, 0.951, 0.05, &mut failures);
        assert_eq!(failures.len(), 1);
    }

    #[test]
    fn zero_current_is_handled_explicitly() {
        let mut failures = Vec::new();
        check_ratio("m", 0.0, 0.0, 0.05, &mut failures);
        assert!(failures.is_empty(), "exact agreement at zero passes");

        check_ratio("m", 0.5, 0.0, 0.05, &mut failures);
        assert_eq!(failures.len(), 1);
        assert!(matches!(
            failures[0].kind,
            FailureKind::RatioUndefined { baseline } if baseline == 0.5
        ));

        // zero baseline against a nonzero current is an ordinary ratio miss
        check_ratio("m", 0.0, 0.5, 0.05, &mut failures);
        assert_eq!(failures.len(), 2);
        assert!(matches!(failures[1].kind, FailureKind::RatioExceeded { .. }));
    }

    #[test]
    fn vector_components_are_checked_independently() {
        let baseline = [1.0, 1.0, 1.0, 1.0];
        let current = [2.0, 1.0, 1.0, 0.5];
        let mut failures = Vec::new();
        check_ratio_vector("v", &baseline, &current, 0.05, &mut failures);
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].field, "v[0]");
        assert_eq!(failures[1].field, "v[3]");
    }

    #[test]
    fn failure_lines_name_field_and_values() {
        let failure = Failure {
            field: "ErrorReports/PointReconstructionErrorAnalysis@PRE[2]".to_string(),
            kind: FailureKind::RatioExceeded {
                baseline: 1.0,
                current: 2.0,
                tolerance: 0.05,
            },
        };
        let line = failure.to_string();
        assert!(line.contains("PRE[2]"));
        assert!(line.contains("current=2"));
        assert!(line.contains("baseline=1"));
    }
}
