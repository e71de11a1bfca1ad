//! Tests for the port conflict validator and the host port probe.

use mediarig::service::{BridgeModeConfig, NetworkConfig, VpnModeConfig};
use mediarig::validate::PortValidator;
use mediarig::{
    NoProbe, PortMapping, PortProbe, Protocol, SelectionContext, Service, ServiceCategory,
    Severity, StackValidator, TcpProbe,
};
use std::collections::BTreeSet;
use std::net::TcpListener;
use std::path::PathBuf;

fn service(id: &str, name: &str, category: ServiceCategory) -> Service {
    Service {
        id: id.to_string(),
        name: name.to_string(),
        category,
        description: String::new(),
        image: format!("example/{}:latest", id),
        container_name: id.to_string(),
        ports: Vec::new(),
        volumes: Vec::new(),
        environment: Vec::new(),
        devices: Vec::new(),
        cap_add: Vec::new(),
        network: NetworkConfig {
            bridge_mode: BridgeModeConfig {
                hostname: id.to_string(),
                networks: vec!["media".to_string()],
            },
            vpn_mode: VpnModeConfig {
                network_mode: "service:gluetun".to_string(),
            },
        },
        restart: "unless-stopped".to_string(),
        supports_vpn: true,
        requires_vpn: false,
        dependencies: Vec::new(),
        optional: false,
    }
}

fn with_port(mut svc: Service, host: u16, protocol: Protocol) -> Service {
    svc.ports.push(PortMapping {
        host,
        container: host,
        protocol,
    });
    svc
}

fn context(services: Vec<Service>, vpn_enabled: bool) -> SelectionContext {
    SelectionContext {
        services,
        vpn_enabled,
        base_path: "/opt/mediarig".to_string(),
        output_dir: PathBuf::from("."),
    }
}

/// Probe with a canned set of busy ports.
struct BusyPorts(BTreeSet<u16>);

impl PortProbe for BusyPorts {
    fn is_port_in_use(&self, port: u16) -> bool {
        self.0.contains(&port)
    }
}

// =============================================================================
// Bridge-Mode Conflicts
// =============================================================================

#[test]
fn test_bridge_mode_no_conflict() {
    let a = with_port(service("a", "A", ServiceCategory::Download), 8080, Protocol::Tcp);
    let b = with_port(service("b", "B", ServiceCategory::Media), 7878, Protocol::Tcp);

    let probe = NoProbe::new();
    let report = PortValidator::new(&probe).validate(&context(vec![a, b], false));
    assert!(report.is_valid());
    assert!(!report.has_warnings());
}

#[test]
fn test_bridge_mode_conflict_names_both_services() {
    let a = with_port(
        service("qbittorrent", "qBittorrent", ServiceCategory::Download),
        8080,
        Protocol::Tcp,
    );
    let b = with_port(
        service("sabnzbd", "SABnzbd", ServiceCategory::Download),
        8080,
        Protocol::Tcp,
    );

    let probe = NoProbe::new();
    let report = PortValidator::new(&probe).validate(&context(vec![a, b], false));

    let errors = report.errors_for("ports");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("8080"));
    assert!(errors[0].message.contains("qBittorrent"));
    assert!(errors[0].message.contains("SABnzbd"));
    assert_eq!(errors[0].severity, Severity::Error);
}

#[test]
fn test_same_port_different_protocol_is_not_a_conflict() {
    let a = with_port(service("a", "A", ServiceCategory::Download), 6881, Protocol::Tcp);
    let b = with_port(service("b", "B", ServiceCategory::Media), 6881, Protocol::Udp);

    let probe = NoProbe::new();
    let report = PortValidator::new(&probe).validate(&context(vec![a, b], false));
    assert!(report.is_valid());
}

// =============================================================================
// VPN-Mode Surface
// =============================================================================

#[test]
fn test_vpn_mode_gateway_own_ports_not_counted() {
    // The gateway republishes the others' ports; a port declared on the
    // gateway itself must not collide with a tunnelled service's port.
    let gateway = with_port(
        service("gluetun", "Gluetun", ServiceCategory::Vpn),
        8080,
        Protocol::Tcp,
    );
    let qbit = with_port(
        service("qbittorrent", "qBittorrent", ServiceCategory::Download),
        8080,
        Protocol::Tcp,
    );

    let probe = NoProbe::new();
    let report = PortValidator::new(&probe).validate(&context(vec![gateway, qbit], true));
    assert!(report.is_valid());
}

#[test]
fn test_vpn_mode_tunnelled_services_conflict() {
    let gateway = service("gluetun", "Gluetun", ServiceCategory::Vpn);
    let a = with_port(
        service("qbittorrent", "qBittorrent", ServiceCategory::Download),
        8080,
        Protocol::Tcp,
    );
    let b = with_port(
        service("sabnzbd", "SABnzbd", ServiceCategory::Download),
        8080,
        Protocol::Tcp,
    );

    let probe = NoProbe::new();
    let report = PortValidator::new(&probe).validate(&context(vec![gateway, a, b], true));
    assert_eq!(report.errors_for("ports").len(), 1);
}

// =============================================================================
// Advisory In-Use Warnings
// =============================================================================

#[test]
fn test_busy_port_is_warning_not_error() {
    let a = with_port(service("a", "A", ServiceCategory::Download), 8080, Protocol::Tcp);

    let probe = BusyPorts([8080].into_iter().collect());
    let report = PortValidator::new(&probe).validate(&context(vec![a], false));

    assert!(report.is_valid(), "an in-use port must never block generation");
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].severity, Severity::Warning);
    assert!(report.warnings[0].message.contains("8080"));
}

#[test]
fn test_tcp_udp_pair_warns_once_per_port() {
    let mut a = service("a", "A", ServiceCategory::Download);
    a = with_port(a, 6881, Protocol::Tcp);
    a = with_port(a, 6881, Protocol::Udp);

    let probe = BusyPorts([6881].into_iter().collect());
    let report = PortValidator::new(&probe).validate(&context(vec![a], false));
    assert_eq!(report.warnings.len(), 1);
}

#[test]
fn test_free_ports_produce_no_warnings() {
    let a = with_port(service("a", "A", ServiceCategory::Download), 8080, Protocol::Tcp);

    let probe = BusyPorts(BTreeSet::new());
    let report = PortValidator::new(&probe).validate(&context(vec![a], false));
    assert!(!report.has_warnings());
}

// =============================================================================
// TCP Probe
// =============================================================================

#[test]
fn test_tcp_probe_detects_bound_port() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let probe = TcpProbe::new();
    assert!(probe.is_port_in_use(port));

    drop(listener);
    assert!(!probe.is_port_in_use(port));
}
