//! Dependency closure validation.

use crate::constants::GATEWAY_SERVICE_ID;
use crate::registry::Registry;
use crate::selection::SelectionContext;
use crate::validate::{Severity, StackValidator, ValidationReport};
use std::collections::HashSet;

/// Checks that every declared dependency of every selected service is
/// itself part of the selection.
///
/// Dependencies are never auto-resolved: a missing one is a hard error
/// naming the requiring service and the dependency's catalog name (or the
/// raw id when the id is unknown to the registry). No cycle detection is
/// performed; the catalog is assumed acyclic.
pub struct DependencyValidator<'a> {
    registry: &'a Registry,
}

impl<'a> DependencyValidator<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }
}

impl StackValidator for DependencyValidator<'_> {
    fn name(&self) -> &'static str {
        "dependency"
    }

    fn validate(&self, ctx: &SelectionContext) -> ValidationReport {
        let mut report = ValidationReport::new();

        let selected: HashSet<&str> = ctx.services.iter().map(|s| s.id.as_str()).collect();

        for service in &ctx.services {
            for dep_id in &service.dependencies {
                if selected.contains(dep_id.as_str()) {
                    continue;
                }

                // Prefer the catalog name; fall back to the raw id for
                // dependency ids the registry does not know.
                let dep_name = self
                    .registry
                    .get(dep_id)
                    .map(|dep| dep.name.clone())
                    .unwrap_or_else(|_| dep_id.clone());

                report.add(
                    "dependencies",
                    format!(
                        "Service '{}' requires '{}' but it is not selected",
                        service.name, dep_name
                    ),
                    Severity::Error,
                );
            }
        }

        // Defensive assertion: the orchestrator injects the gateway before
        // validation runs, so this branch should never fire in normal
        // operation.
        if ctx.vpn_enabled && !selected.contains(GATEWAY_SERVICE_ID) {
            report.add(
                "vpn",
                "VPN mode is enabled but the Gluetun gateway is not part of the selection",
                Severity::Critical,
            );
        }

        report
    }
}
