//! Fixed-schema comparison driver.
//!
//! The driver walks a declarative list of `(section path, attribute, rule)`
//! entries, so adding a checked field means adding a schema entry rather
//! than new control flow. Document loading and comparison are a single
//! synchronous pass; the only state is the failure list accumulated for the
//! duration of one call.

use std::fs;
use std::path::Path;

use log::error;
use serde::Serialize;

use crate::document::{DocumentError, Node, ResultDocument};
use crate::tolerance::{
    check_absolute, check_ratio, check_ratio_vector, Failure, FailureKind, Side, ToleranceSpec,
};
use crate::transform::{rotation_error_deg, translation_error, RigidTransform};

#[derive(Clone, Copy, Debug)]
enum CheckRule {
    /// 16-element row-major transform, compared by translation and rotation
    /// error against the absolute thresholds.
    Transform,
    /// Fixed-length metric vector, ratio-checked per component.
    Vector { len: usize },
    /// Scalar metric, ratio-checked.
    Scalar,
}

struct FieldCheck {
    section: &'static [&'static str],
    attribute: &'static str,
    rule: CheckRule,
}

/// Every field a calibration result document is expected to carry.
const SCHEMA: &[FieldCheck] = &[
    FieldCheck {
        section: &["CalibrationResults", "CalibrationTransform"],
        attribute: "TransformImageToProbe",
        rule: CheckRule::Transform,
    },
    FieldCheck {
        section: &["ErrorReports", "PointReconstructionErrorAnalysis"],
        attribute: "PRE",
        rule: CheckRule::Vector { len: 9 },
    },
    FieldCheck {
        section: &["ErrorReports", "PointReconstructionErrorAnalysis"],
        attribute: "ValidationDataConfidenceLevel",
        rule: CheckRule::Scalar,
    },
    FieldCheck {
        section: &["ErrorReports", "PointLineDistanceErrorAnalysis"],
        attribute: "PLDE",
        rule: CheckRule::Vector { len: 3 },
    },
    FieldCheck {
        section: &["ErrorReports", "PointLineDistanceErrorAnalysis"],
        attribute: "ValidationDataConfidenceLevel",
        rule: CheckRule::Scalar,
    },
];

#[derive(thiserror::Error, Debug)]
pub enum ReportIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Verdict of one comparison run: the ordered list of recorded failures.
///
/// An empty list is a pass; any recorded failure is a fail. The report is
/// created fresh per run and never persisted by the driver itself.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ComparisonReport {
    pub failures: Vec<Failure>,
}

impl ComparisonReport {
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Write the failure list to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ReportIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    fn record(&mut self, field: &str, kind: FailureKind) {
        let failure = Failure {
            field: field.to_string(),
            kind,
        };
        error!("{failure}");
        self.failures.push(failure);
    }
}

/// Load both documents and compare them.
///
/// An unreadable document records one failure and aborts the run; the
/// baseline is checked first, matching the per-field ordering below.
pub fn compare_files(
    baseline_path: impl AsRef<Path>,
    current_path: impl AsRef<Path>,
    tolerances: &ToleranceSpec,
) -> ComparisonReport {
    let mut report = ComparisonReport::default();

    let baseline = match ResultDocument::load(baseline_path) {
        Ok(doc) => doc,
        Err(err) => {
            report.record("document", unreadable(Side::Baseline, err));
            return report;
        }
    };
    let current = match ResultDocument::load(current_path) {
        Ok(doc) => doc,
        Err(err) => {
            report.record("document", unreadable(Side::Current, err));
            return report;
        }
    };

    run_checks(&baseline, &current, tolerances, &mut report);
    report
}

/// Compare two already-loaded documents.
pub fn compare_documents(
    baseline: &ResultDocument,
    current: &ResultDocument,
    tolerances: &ToleranceSpec,
) -> ComparisonReport {
    let mut report = ComparisonReport::default();
    run_checks(baseline, current, tolerances, &mut report);
    report
}

fn unreadable(side: Side, err: DocumentError) -> FailureKind {
    FailureKind::DocumentUnreadable {
        side,
        reason: err.to_string(),
    }
}

fn run_checks(
    baseline: &ResultDocument,
    current: &ResultDocument,
    tolerances: &ToleranceSpec,
    report: &mut ComparisonReport,
) {
    // A missing section is recorded once; every check underneath it is
    // skipped, sibling sections are still visited.
    let mut missing_sections: Vec<&'static [&'static str]> = Vec::new();

    for check in SCHEMA {
        if missing_sections
            .iter()
            .any(|prefix| check.section.starts_with(prefix))
        {
            continue;
        }
        let Some((bl_node, cur_node)) = resolve_section(
            baseline.root(),
            current.root(),
            check.section,
            &mut missing_sections,
            report,
        ) else {
            continue;
        };
        apply_check(check, bl_node, cur_node, tolerances, report);
    }
}

/// Descend both documents along `section`, recording one failure for the
/// shallowest missing level. The baseline side is consulted first.
fn resolve_section<'a>(
    baseline: &'a Node,
    current: &'a Node,
    section: &'static [&'static str],
    missing_sections: &mut Vec<&'static [&'static str]>,
    report: &mut ComparisonReport,
) -> Option<(&'a Node, &'a Node)> {
    let mut bl = baseline;
    let mut cur = current;
    for depth in 0..section.len() {
        let name = section[depth];
        let prefix = &section[..=depth];
        let side = match (bl.find_child(name), cur.find_child(name)) {
            (Some(next_bl), Some(next_cur)) => {
                bl = next_bl;
                cur = next_cur;
                continue;
            }
            (None, _) => Side::Baseline,
            (_, None) => Side::Current,
        };
        report.record(&prefix.join("/"), FailureKind::SectionMissing { side });
        missing_sections.push(prefix);
        return None;
    }
    Some((bl, cur))
}

fn apply_check(
    check: &FieldCheck,
    bl_node: &Node,
    cur_node: &Node,
    tolerances: &ToleranceSpec,
    report: &mut ComparisonReport,
) {
    let field = format!("{}@{}", check.section.join("/"), check.attribute);
    match check.rule {
        CheckRule::Transform => {
            let Some(bl_flat) = bl_node.vector_attribute(check.attribute, 16) else {
                report.record(&field, FailureKind::AttributeMissing { side: Side::Baseline });
                return;
            };
            let Some(cur_flat) = cur_node.vector_attribute(check.attribute, 16) else {
                report.record(&field, FailureKind::AttributeMissing { side: Side::Current });
                return;
            };
            let bl_transform = RigidTransform::from_row_slice(&bl_flat);
            let cur_transform = RigidTransform::from_row_slice(&cur_flat);

            check_absolute(
                &format!("{field} translation"),
                translation_error(&bl_transform, &cur_transform),
                tolerances.translation_error_mm,
                "mm",
                &mut report.failures,
            );
            check_absolute(
                &format!("{field} rotation"),
                rotation_error_deg(&bl_transform, &cur_transform),
                tolerances.rotation_error_deg,
                "deg",
                &mut report.failures,
            );
        }
        CheckRule::Vector { len } => {
            let Some(bl_values) = bl_node.vector_attribute(check.attribute, len) else {
                report.record(&field, FailureKind::AttributeMissing { side: Side::Baseline });
                return;
            };
            let Some(cur_values) = cur_node.vector_attribute(check.attribute, len) else {
                report.record(&field, FailureKind::AttributeMissing { side: Side::Current });
                return;
            };
            check_ratio_vector(
                &field,
                &bl_values,
                &cur_values,
                tolerances.ratio_tolerance,
                &mut report.failures,
            );
        }
        CheckRule::Scalar => {
            let Some(bl_value) = bl_node.scalar_attribute(check.attribute) else {
                report.record(&field, FailureKind::AttributeMissing { side: Side::Baseline });
                return;
            };
            let Some(cur_value) = cur_node.scalar_attribute(check.attribute) else {
                report.record(&field, FailureKind::AttributeMissing { side: Side::Current });
                return;
            };
            check_ratio(
                &field,
                bl_value,
                cur_value,
                tolerances.ratio_tolerance,
                &mut report.failures,
            );
        }
    }
}
