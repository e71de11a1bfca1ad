//! Bridge-mode rendering.

use crate::compose::{
    append_runtime_config, base_body, insert_str, port_entry, string_seq, to_yaml, ComposeStrategy,
};
use crate::constants::{BRIDGE_NETWORK_DRIVER, BRIDGE_NETWORK_NAME};
use crate::error::Result;
use crate::service::Service;
use serde_yaml::{Mapping, Value};

/// Renders each service with its own ports, volumes, and membership in
/// the shared `media` bridge network.
///
/// Gateway services never appear in bridge mode; any vpn-category entry
/// in the input is skipped so the contract holds even for hand-built
/// selections.
pub struct BridgeModeStrategy;

impl ComposeStrategy for BridgeModeStrategy {
    fn mode(&self) -> &'static str {
        "bridge"
    }

    fn render(&self, services: &[Service]) -> Result<String> {
        let mut entries = Mapping::new();

        for service in services.iter().filter(|s| !s.is_gateway()) {
            entries.insert(
                Value::String(service.id.clone()),
                Value::Mapping(render_service(service)),
            );
        }

        let mut document = Mapping::new();
        document.insert(Value::String("services".to_string()), Value::Mapping(entries));
        document.insert(
            Value::String("networks".to_string()),
            Value::Mapping(shared_network()),
        );

        to_yaml(&Value::Mapping(document))
    }
}

fn render_service(service: &Service) -> Mapping {
    let mut body = base_body(service);

    let hostname = &service.network.bridge_mode.hostname;
    if !hostname.is_empty() {
        insert_str(&mut body, "hostname", hostname);
    }

    append_runtime_config(&mut body, service);

    if !service.ports.is_empty() {
        body.insert(
            Value::String("ports".to_string()),
            string_seq(service.ports.iter().map(port_entry)),
        );
    }

    body.insert(
        Value::String("networks".to_string()),
        string_seq(service.network.bridge_mode.networks.iter().cloned()),
    );

    insert_str(&mut body, "restart", &service.restart);
    body
}

/// The single user-defined network every service joins.
fn shared_network() -> Mapping {
    let mut driver = Mapping::new();
    insert_str(&mut driver, "driver", BRIDGE_NETWORK_DRIVER);

    let mut networks = Mapping::new();
    networks.insert(
        Value::String(BRIDGE_NETWORK_NAME.to_string()),
        Value::Mapping(driver),
    );
    networks
}
