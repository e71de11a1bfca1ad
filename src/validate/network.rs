//! Network-mode compatibility validation.

use crate::selection::SelectionContext;
use crate::service::Service;
use crate::validate::{Finding, Severity, StackValidator, ValidationReport};

/// Checks every selected service against the active deployment mode.
///
/// Rules, evaluated per service; the first failing rule is reported and
/// the scan moves on to the next service:
///
/// 1. A service that requires the tunnel is an error when VPN mode is
///    disabled.
/// 2. With VPN enabled, every non-gateway service must be VPN-compatible
///    (`requires_vpn` implies `vpn_enabled`; everything else passes).
/// 3. With VPN disabled, a service must declare at least one bridge
///    network, guarding against catalog entries with incomplete network
///    metadata.
pub struct NetworkValidator;

impl NetworkValidator {
    pub fn new() -> Self {
        Self
    }

    fn check_service(service: &Service, vpn_enabled: bool) -> Option<Finding> {
        if service.requires_vpn && !vpn_enabled {
            return Some(Finding {
                field: "vpn".to_string(),
                message: format!(
                    "Service '{}' requires VPN but VPN mode is disabled",
                    service.name
                ),
                severity: Severity::Error,
            });
        }

        if vpn_enabled {
            if !service.is_gateway() && !service.is_compatible_with_vpn(true) {
                return Some(Finding {
                    field: "vpn".to_string(),
                    message: format!("Service '{}' is not compatible with VPN mode", service.name),
                    severity: Severity::Error,
                });
            }
        } else if service.network.bridge_mode.networks.is_empty() {
            return Some(Finding {
                field: "network".to_string(),
                message: format!(
                    "Service '{}' has no bridge network configuration",
                    service.name
                ),
                severity: Severity::Error,
            });
        }

        None
    }
}

impl Default for NetworkValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl StackValidator for NetworkValidator {
    fn name(&self) -> &'static str {
        "network"
    }

    fn validate(&self, ctx: &SelectionContext) -> ValidationReport {
        let mut report = ValidationReport::new();

        for service in &ctx.services {
            if let Some(finding) = Self::check_service(service, ctx.vpn_enabled) {
                if finding.severity == Severity::Warning {
                    report.warnings.push(finding);
                } else {
                    report.errors.push(finding);
                }
            }
        }

        report
    }
}
