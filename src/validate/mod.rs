//! # Selection Validation
//!
//! Three validators gate manifest generation: dependency closure,
//! network-mode compatibility, and port conflicts. Each is a pure
//! function of the read-only [`SelectionContext`] and returns an
//! independent [`ValidationReport`]; [`validate_all`] merges them by
//! concatenation, which is order-independent, so validator execution
//! order does not affect the outcome.
//!
//! Validators never stop at the first finding. All applicable findings
//! for a selection are collected and returned together so the operator
//! can fix every problem in one pass.
//!
//! ## Severity Taxonomy
//!
//! | Severity | Meaning | Blocks generation |
//! |----------|---------|-------------------|
//! | `Warning` | advisory, e.g. a host port already bound | no |
//! | `Error` | user-correctable, e.g. a missing dependency | yes |
//! | `Critical` | structurally impossible request | yes |

pub mod dependency;
pub mod network;
pub mod port;

pub use self::dependency::DependencyValidator;
pub use self::network::NetworkValidator;
pub use self::port::PortValidator;

use crate::probe::PortProbe;
use crate::registry::Registry;
use crate::selection::SelectionContext;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Findings
// =============================================================================

/// How serious a validation finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Surfaced to the user, never blocks generation.
    Warning,
    /// Blocks generation; a normal, user-correctable outcome.
    Error,
    /// Blocks generation; the request is structurally impossible.
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("WARNING"),
            Severity::Error => f.write_str("ERROR"),
            Severity::Critical => f.write_str("CRITICAL"),
        }
    }
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Which aspect of the selection the finding concerns
    /// (`dependencies`, `vpn`, `network`, `ports`).
    pub field: String,
    /// Human-readable description.
    pub message: String,
    /// Severity of the finding.
    pub severity: Severity,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.field, self.message)
    }
}

// =============================================================================
// Report
// =============================================================================

/// Accumulated findings for one selection.
///
/// Validity is derived, not stored: the report is valid exactly when the
/// error list is empty, so adding a warning can never flip it and adding
/// an error or critical always does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Findings that block generation (`Error` and `Critical`).
    pub errors: Vec<Finding>,
    /// Advisory findings.
    pub warnings: Vec<Finding>,
}

impl ValidationReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finding, routing it by severity.
    pub fn add(&mut self, field: &str, message: impl Into<String>, severity: Severity) {
        let finding = Finding {
            field: field.to_string(),
            message: message.into(),
            severity,
        };
        if severity == Severity::Warning {
            self.warnings.push(finding);
        } else {
            self.errors.push(finding);
        }
    }

    /// Appends every finding of `other` to this report.
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Whether generation may proceed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether any blocking finding was recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Whether any advisory finding was recorded.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Errors carrying the given field tag.
    pub fn errors_for(&self, field: &str) -> Vec<&Finding> {
        self.errors.iter().filter(|f| f.field == field).collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for finding in self.errors.iter().chain(self.warnings.iter()) {
            writeln!(f, "  {}", finding)?;
        }
        Ok(())
    }
}

// =============================================================================
// Validator Trait
// =============================================================================

/// A validator inspecting one aspect of a selection.
pub trait StackValidator {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Inspects the selection and reports findings. Never short-circuits:
    /// every applicable finding is collected.
    fn validate(&self, ctx: &SelectionContext) -> ValidationReport;
}

/// Runs every validator against the selection and merges the results.
pub fn validate_all(
    ctx: &SelectionContext,
    registry: &Registry,
    probe: &dyn PortProbe,
) -> ValidationReport {
    let dependency = DependencyValidator::new(registry);
    let network = NetworkValidator::new();
    let port = PortValidator::new(probe);
    let validators: [&dyn StackValidator; 3] = [&dependency, &network, &port];

    let mut merged = ValidationReport::new();
    for validator in validators {
        let report = validator.validate(ctx);
        tracing::debug!(
            validator = validator.name(),
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "validator finished"
        );
        merged.merge(report);
    }
    merged
}
