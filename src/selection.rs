//! Selection normalization and per-request context.
//!
//! A [`SelectionContext`] is the state of one generation request: the
//! registry-resolved services, the VPN flag, and the caller-supplied
//! paths. It is built fresh per invocation and discarded afterwards; the
//! validators receive it read-only and never mutate it.

use crate::constants::GATEWAY_SERVICE_ID;
use crate::service::Service;
use std::path::PathBuf;

/// Normalizes a selection for the requested deployment mode.
///
/// When VPN mode is on and the gateway id is absent, the gateway is
/// prepended exactly once; otherwise the input is returned unchanged.
/// This runs before resolution and validation so the validators stay
/// pure functions of an already-normalized selection.
pub fn normalize_selection(ids: &[String], vpn_enabled: bool) -> Vec<String> {
    let mut normalized = Vec::with_capacity(ids.len() + 1);

    if vpn_enabled && !ids.iter().any(|id| id == GATEWAY_SERVICE_ID) {
        normalized.push(GATEWAY_SERVICE_ID.to_string());
    }
    normalized.extend(ids.iter().cloned());
    normalized
}

/// The state of one generation request.
#[derive(Debug, Clone)]
pub struct SelectionContext {
    /// Resolved services, sorted by category then name.
    pub services: Vec<Service>,
    /// Whether the stack deploys through the VPN gateway.
    pub vpn_enabled: bool,
    /// Base path substituted into volume templates via the env file.
    pub base_path: String,
    /// Directory the rendered files are written to.
    pub output_dir: PathBuf,
}

impl SelectionContext {
    /// Whether the gateway service is part of the selection.
    pub fn has_gateway(&self) -> bool {
        self.services.iter().any(|s| s.id == GATEWAY_SERVICE_ID)
    }
}
