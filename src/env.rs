//! Environment file rendering.
//!
//! The `.env` file supplies the values the rendered manifest references:
//! project identity, the base media path substituted into volume
//! templates, container ownership ids, and — when the stack tunnels
//! through the gateway — the VPN credentials and tunnel settings.

use crate::constants::{
    DEFAULT_BASE_PATH, DEFAULT_DNS_ADDRESS, DEFAULT_PGID, DEFAULT_PROJECT_NAME, DEFAULT_PUID,
    DEFAULT_TIMEZONE, DEFAULT_UMASK, DEFAULT_VPN_TYPE,
};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// VPN tunnel settings written when VPN mode is enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpnSettings {
    /// VPN provider name understood by the gateway image.
    pub service_provider: String,
    /// Tunnel type (`wireguard` or `openvpn`).
    pub vpn_type: String,
    /// WireGuard private key.
    pub wireguard_private_key: String,
    /// WireGuard peer public key.
    pub wireguard_public_key: String,
    /// WireGuard interface addresses.
    pub wireguard_addresses: String,
    /// Preferred exit countries.
    pub server_countries: String,
    /// Provider port-forwarding toggle (`on`/`off`).
    pub port_forwarding: String,
    /// DNS address used inside the tunnel.
    pub dns_address: String,
}

impl Default for VpnSettings {
    fn default() -> Self {
        Self {
            service_provider: String::new(),
            vpn_type: DEFAULT_VPN_TYPE.to_string(),
            wireguard_private_key: String::new(),
            wireguard_public_key: String::new(),
            wireguard_addresses: String::new(),
            server_countries: String::new(),
            port_forwarding: "off".to_string(),
            dns_address: DEFAULT_DNS_ADDRESS.to_string(),
        }
    }
}

/// Everything the env renderer needs for one stack.
///
/// Custom pairs are an ordered list, not a map: they are appended
/// verbatim in caller order so two consecutive renders are
/// byte-identical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvSettings {
    /// Compose project name.
    pub project_name: String,
    /// Base path substituted into `${BASE_PATH}` volume templates.
    pub base_path: String,
    /// Timezone passed to every container.
    pub timezone: String,
    /// Numeric user id for file ownership.
    pub puid: String,
    /// Numeric group id for file ownership.
    pub pgid: String,
    /// File-creation mask.
    pub umask: String,
    /// Tunnel settings; written only when present.
    pub vpn: Option<VpnSettings>,
    /// Caller-supplied pairs appended verbatim.
    pub custom: Vec<(String, String)>,
}

impl Default for EnvSettings {
    fn default() -> Self {
        Self {
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            puid: DEFAULT_PUID.to_string(),
            pgid: DEFAULT_PGID.to_string(),
            umask: DEFAULT_UMASK.to_string(),
            vpn: None,
            custom: Vec::new(),
        }
    }
}

/// Renders the env file contents.
///
/// Pure string assembly, fully deterministic for a given settings value.
pub fn render_env(settings: &EnvSettings) -> String {
    let mut out = String::new();

    // writeln! to a String is infallible.
    let _ = writeln!(out, "# Compose project");
    let _ = writeln!(out, "COMPOSE_PROJECT_NAME={}", settings.project_name);
    let _ = writeln!(out);
    let _ = writeln!(out, "# Media stack");
    let _ = writeln!(out, "BASE_PATH={}", settings.base_path);
    let _ = writeln!(out, "TZ={}", settings.timezone);
    let _ = writeln!(out, "PUID={}", settings.puid);
    let _ = writeln!(out, "PGID={}", settings.pgid);
    let _ = writeln!(out, "UMASK={}", settings.umask);

    if let Some(vpn) = &settings.vpn {
        let _ = writeln!(out);
        let _ = writeln!(out, "# VPN gateway");
        let _ = writeln!(out, "VPN_SERVICE_PROVIDER={}", vpn.service_provider);
        let _ = writeln!(out, "VPN_TYPE={}", vpn.vpn_type);
        let _ = writeln!(out, "WIREGUARD_PRIVATE_KEY={}", vpn.wireguard_private_key);
        let _ = writeln!(out, "WIREGUARD_PUBLIC_KEY={}", vpn.wireguard_public_key);
        let _ = writeln!(out, "WIREGUARD_ADDRESSES={}", vpn.wireguard_addresses);
        let _ = writeln!(out, "SERVER_COUNTRIES={}", vpn.server_countries);
        let _ = writeln!(out, "VPN_PORT_FORWARDING={}", vpn.port_forwarding);
        let _ = writeln!(out, "DNS_ADDRESS={}", vpn.dns_address);
    }

    if !settings.custom.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "# Custom");
        for (key, value) in &settings.custom {
            let _ = writeln!(out, "{}={}", key, value);
        }
    }

    out
}
