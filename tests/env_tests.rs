//! Tests for the environment file renderer.

use mediarig::{render_env, EnvSettings, VpnSettings};

// =============================================================================
// Defaults
// =============================================================================

#[test]
fn test_default_settings() {
    let settings = EnvSettings::default();
    assert_eq!(settings.project_name, "mediarig");
    assert_eq!(settings.base_path, "/opt/mediarig");
    assert_eq!(settings.timezone, "UTC");
    assert_eq!(settings.puid, "1000");
    assert_eq!(settings.pgid, "1000");
    assert_eq!(settings.umask, "002");
    assert!(settings.vpn.is_none());
    assert!(settings.custom.is_empty());
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn test_render_contains_core_keys() {
    let out = render_env(&EnvSettings::default());
    for key in [
        "COMPOSE_PROJECT_NAME=mediarig",
        "BASE_PATH=/opt/mediarig",
        "TZ=UTC",
        "PUID=1000",
        "PGID=1000",
        "UMASK=002",
    ] {
        assert!(out.contains(key), "missing '{}' in:\n{}", key, out);
    }
}

#[test]
fn test_render_omits_vpn_section_without_vpn() {
    let out = render_env(&EnvSettings::default());
    assert!(!out.contains("VPN_SERVICE_PROVIDER"));
    assert!(!out.contains("WIREGUARD_PRIVATE_KEY"));
}

#[test]
fn test_render_vpn_section() {
    let mut settings = EnvSettings {
        timezone: "America/New_York".to_string(),
        ..EnvSettings::default()
    };
    settings.vpn = Some(VpnSettings {
        service_provider: "mullvad".to_string(),
        wireguard_private_key: "key-material".to_string(),
        server_countries: "Netherlands".to_string(),
        ..VpnSettings::default()
    });

    let out = render_env(&settings);
    for key in [
        "TZ=America/New_York",
        "VPN_SERVICE_PROVIDER=mullvad",
        "VPN_TYPE=wireguard",
        "WIREGUARD_PRIVATE_KEY=key-material",
        "SERVER_COUNTRIES=Netherlands",
        "VPN_PORT_FORWARDING=off",
        "DNS_ADDRESS=1.1.1.1",
    ] {
        assert!(out.contains(key), "missing '{}' in:\n{}", key, out);
    }
}

#[test]
fn test_render_appends_custom_pairs_in_order() {
    let settings = EnvSettings {
        custom: vec![
            ("ZEBRA".to_string(), "first".to_string()),
            ("ALPHA".to_string(), "second".to_string()),
        ],
        ..EnvSettings::default()
    };

    let out = render_env(&settings);
    let zebra = out.find("ZEBRA=first").expect("custom pair missing");
    let alpha = out.find("ALPHA=second").expect("custom pair missing");
    // Caller order, not key order.
    assert!(zebra < alpha);
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_render_is_repeatable() {
    let mut settings = EnvSettings::default();
    settings.vpn = Some(VpnSettings::default());
    settings.custom.push(("EXTRA".to_string(), "1".to_string()));

    assert_eq!(render_env(&settings), render_env(&settings));
}
