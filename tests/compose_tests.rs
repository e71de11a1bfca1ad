//! Tests for the compose rendering strategies.

use mediarig::compose::{strategy_for, BridgeModeStrategy, ComposeStrategy, VpnModeStrategy};
use mediarig::service::{BridgeModeConfig, NetworkConfig, VpnModeConfig};
use mediarig::{Error, PortMapping, Protocol, Service, ServiceCategory};

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

fn with_port(mut svc: Service, host: u16, container: u16, protocol: Protocol) -> Service {
    svc.ports.push(PortMapping {
        host,
        container,
        protocol,
    });
    svc
}

fn parse(yaml: &str) -> serde_yaml::Value {
    serde_yaml::from_str(yaml).expect("rendered manifest must be valid YAML")
}

// =============================================================================
// Strategy Selection
// =============================================================================

#[test]
fn test_strategy_dispatch_on_vpn_flag() {
    assert_eq!(strategy_for(false).mode(), "bridge");
    assert_eq!(strategy_for(true).mode(), "vpn");
}

// =============================================================================
// Bridge Mode
// =============================================================================

#[test]
fn test_bridge_render_declares_shared_network() {
    let radarr = with_port(
        service("radarr", "Radarr", ServiceCategory::Media),
        7878,
        7878,
        Protocol::Tcp,
    );

    let yaml = BridgeModeStrategy.render(&[radarr]).unwrap();
    let doc = parse(&yaml);

    let driver = &doc["networks"]["media"]["driver"];
    assert_eq!(driver.as_str(), Some("bridge"));

    let entry = &doc["services"]["radarr"];
    assert_eq!(entry["hostname"].as_str(), Some("radarr"));
    assert_eq!(entry["restart"].as_str(), Some("unless-stopped"));
    assert_eq!(entry["networks"][0].as_str(), Some("media"));
    assert_eq!(entry["ports"][0].as_str(), Some("7878:7878"));
    assert!(entry.get("network_mode").is_none());
}

#[test]
fn test_bridge_render_udp_port_suffix() {
    let qbit = with_port(
        service("qbittorrent", "qBittorrent", ServiceCategory::Download),
        6881,
        6881,
        Protocol::Udp,
    );

    let yaml = BridgeModeStrategy.render(&[qbit]).unwrap();
    let doc = parse(&yaml);
    assert_eq!(
        doc["services"]["qbittorrent"]["ports"][0].as_str(),
        Some("6881:6881/udp")
    );
}

#[test]
fn test_bridge_render_skips_gateway() {
    let gateway = service("gluetun", "Gluetun", ServiceCategory::Vpn);
    let radarr = service("radarr", "Radarr", ServiceCategory::Media);

    let yaml = BridgeModeStrategy.render(&[gateway, radarr]).unwrap();
    let doc = parse(&yaml);

    assert!(doc["services"].get("gluetun").is_none());
    assert!(doc["services"].get("radarr").is_some());
}

#[test]
fn test_bridge_render_omits_empty_sections() {
    let bare = service("bare", "Bare", ServiceCategory::Media);

    let yaml = BridgeModeStrategy.render(&[bare]).unwrap();
    let doc = parse(&yaml);
    let entry = &doc["services"]["bare"];
    assert!(entry.get("ports").is_none());
    assert!(entry.get("volumes").is_none());
    assert!(entry.get("environment").is_none());
    assert!(entry.get("devices").is_none());
    assert!(entry.get("cap_add").is_none());
}

// =============================================================================
// VPN Mode
// =============================================================================

#[test]
fn test_vpn_render_requires_gateway() {
    let radarr = service("radarr", "Radarr", ServiceCategory::Media);
    let err = VpnModeStrategy.render(&[radarr]).unwrap_err();
    assert!(matches!(err, Error::GatewayMissing));
}

#[test]
fn test_vpn_render_only_gateway_has_ports() {
    let gateway = service("gluetun", "Gluetun", ServiceCategory::Vpn);
    let qbit = with_port(
        service("qbittorrent", "qBittorrent", ServiceCategory::Download),
        8080,
        8080,
        Protocol::Tcp,
    );
    let radarr = with_port(
        service("radarr", "Radarr", ServiceCategory::Media),
        7878,
        7878,
        Protocol::Tcp,
    );

    let yaml = VpnModeStrategy.render(&[gateway, qbit, radarr]).unwrap();
    let doc = parse(&yaml);

    let gateway_ports = doc["services"]["gluetun"]["ports"]
        .as_sequence()
        .expect("gateway must publish the aggregate list");
    let ports: Vec<&str> = gateway_ports.iter().filter_map(|v| v.as_str()).collect();
    assert_eq!(ports, vec!["8080:8080", "7878:7878"]);

    assert!(doc["services"]["qbittorrent"].get("ports").is_none());
    assert!(doc["services"]["radarr"].get("ports").is_none());
}

#[test]
fn test_vpn_render_aggregate_is_deduplicated() {
    // Two tunnelled services declaring the identical mapping must yield
    // one aggregate entry (a duplicate-free union).
    let gateway = service("gluetun", "Gluetun", ServiceCategory::Vpn);
    let a = with_port(service("a", "A", ServiceCategory::Download), 9117, 9117, Protocol::Tcp);
    let b = with_port(service("b", "B", ServiceCategory::Media), 9117, 9117, Protocol::Tcp);

    let yaml = VpnModeStrategy.render(&[gateway, a, b]).unwrap();
    let doc = parse(&yaml);

    let ports = doc["services"]["gluetun"]["ports"].as_sequence().unwrap();
    assert_eq!(ports.len(), 1);
}

#[test]
fn test_vpn_render_tunnelled_services_share_namespace() {
    let gateway = service("gluetun", "Gluetun", ServiceCategory::Vpn);
    let radarr = service("radarr", "Radarr", ServiceCategory::Media);

    let yaml = VpnModeStrategy.render(&[gateway, radarr]).unwrap();
    let doc = parse(&yaml);

    assert_eq!(
        doc["services"]["radarr"]["network_mode"].as_str(),
        Some("service:gluetun")
    );
    assert!(doc["services"]["radarr"].get("networks").is_none());
    assert!(doc["services"]["radarr"].get("hostname").is_none());
    // No user-defined network in VPN mode.
    assert!(doc.get("networks").is_none());
}

#[test]
fn test_vpn_render_keeps_gateway_capabilities() {
    let mut gateway = service("gluetun", "Gluetun", ServiceCategory::Vpn);
    gateway.cap_add = vec!["NET_ADMIN".to_string()];
    gateway.devices = vec!["/dev/net/tun:/dev/net/tun".to_string()];
    let radarr = service("radarr", "Radarr", ServiceCategory::Media);

    let yaml = VpnModeStrategy.render(&[gateway, radarr]).unwrap();
    let doc = parse(&yaml);

    assert_eq!(
        doc["services"]["gluetun"]["cap_add"][0].as_str(),
        Some("NET_ADMIN")
    );
    assert_eq!(
        doc["services"]["gluetun"]["devices"][0].as_str(),
        Some("/dev/net/tun:/dev/net/tun")
    );
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_render_is_repeatable() {
    let gateway = service("gluetun", "Gluetun", ServiceCategory::Vpn);
    let radarr = with_port(
        service("radarr", "Radarr", ServiceCategory::Media),
        7878,
        7878,
        Protocol::Tcp,
    );

    let services = [gateway, radarr];
    let first = VpnModeStrategy.render(&services).unwrap();
    let second = VpnModeStrategy.render(&services).unwrap();
    assert_eq!(first, second);
}
