//! Port conflict validation.

use crate::probe::PortProbe;
use crate::selection::SelectionContext;
use crate::service::Protocol;
use crate::validate::{Severity, StackValidator, ValidationReport};
use std::collections::{BTreeMap, BTreeSet};

/// Checks the selection's effective host-port surface for conflicts.
///
/// The surface depends on the deployment mode:
///
/// - **Bridge mode**: every service exposes its own declared host ports.
/// - **VPN mode**: only the gateway touches the host; every other
///   service's ports are re-exposed through the gateway's network stack,
///   so the surface is the union of all non-gateway port lists.
///
/// A `(host port, protocol)` pair owned by more than one service is an
/// error and always blocks generation. Separately, each effective host
/// port is probed on the local machine; a port that is already bound
/// yields a warning only — the check is advisory and racy, and the
/// system cannot tell a previous run of the same stack from an unrelated
/// process.
pub struct PortValidator<'a> {
    probe: &'a dyn PortProbe,
}

impl<'a> PortValidator<'a> {
    pub fn new(probe: &'a dyn PortProbe) -> Self {
        Self { probe }
    }
}

impl StackValidator for PortValidator<'_> {
    fn name(&self) -> &'static str {
        "port"
    }

    fn validate(&self, ctx: &SelectionContext) -> ValidationReport {
        let mut report = ValidationReport::new();

        // (host port, protocol) -> owning service names, in a BTreeMap so
        // findings come out in a stable order.
        let mut owners: BTreeMap<(u16, Protocol), Vec<&str>> = BTreeMap::new();

        for service in &ctx.services {
            if ctx.vpn_enabled && service.is_gateway() {
                // The gateway republishes the others' ports; its own
                // declared list is not part of the surface.
                continue;
            }
            for port in &service.ports {
                owners
                    .entry((port.host, port.protocol))
                    .or_default()
                    .push(service.name.as_str());
            }
        }

        for ((host, protocol), names) in &owners {
            if names.len() > 1 {
                report.add(
                    "ports",
                    format!(
                        "Port {}/{} is used by multiple services: {}",
                        host,
                        protocol,
                        names.join(", ")
                    ),
                    Severity::Error,
                );
            }
        }

        // One advisory probe per distinct host port number.
        let distinct: BTreeSet<u16> = owners.keys().map(|(host, _)| *host).collect();
        for host in distinct {
            if self.probe.is_port_in_use(host) {
                report.add(
                    "ports",
                    format!("Port {} is already in use on the system", host),
                    Severity::Warning,
                );
            }
        }

        report
    }
}
