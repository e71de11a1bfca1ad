//! # Service Registry
//!
//! Loads the bundled service catalog and answers lookup queries for the
//! rest of the crate. The catalog ships inside the binary (one YAML
//! document per service under `src/catalog/`), is parsed exactly once at
//! construction, and is immutable afterwards: the registry is a read-only
//! value for the remainder of process execution and is safe to share
//! across threads without locking.
//!
//! Construction is the only unrecoverable failure point in the subsystem.
//! A catalog document that fails to parse, a duplicate id, or an id that
//! violates the naming rules all abort [`Registry::load`]; everything
//! downstream assumes a populated registry.

use crate::constants::{validate_service_id, GATEWAY_SERVICE_ID};
use crate::error::{Error, Result};
use crate::service::{Service, ServiceCategory};
use std::collections::HashMap;
use tracing::{debug, info};

/// Bundled catalog documents, one per service.
const CATALOG_FILES: &[(&str, &str)] = &[
    ("qbittorrent.yaml", include_str!("catalog/qbittorrent.yaml")),
    ("sabnzbd.yaml", include_str!("catalog/sabnzbd.yaml")),
    ("prowlarr.yaml", include_str!("catalog/prowlarr.yaml")),
    ("flaresolverr.yaml", include_str!("catalog/flaresolverr.yaml")),
    ("sonarr.yaml", include_str!("catalog/sonarr.yaml")),
    ("radarr.yaml", include_str!("catalog/radarr.yaml")),
    ("lidarr.yaml", include_str!("catalog/lidarr.yaml")),
    ("lazylibrarian.yaml", include_str!("catalog/lazylibrarian.yaml")),
    ("bazarr.yaml", include_str!("catalog/bazarr.yaml")),
    ("jellyfin.yaml", include_str!("catalog/jellyfin.yaml")),
    ("jellyseerr.yaml", include_str!("catalog/jellyseerr.yaml")),
    ("fileflows.yaml", include_str!("catalog/fileflows.yaml")),
    ("gluetun.yaml", include_str!("catalog/gluetun.yaml")),
];

/// Registry of every known service, indexed by id and by category.
#[derive(Debug)]
pub struct Registry {
    services: HashMap<String, Service>,
}

impl Registry {
    /// Loads the bundled catalog.
    ///
    /// # Errors
    ///
    /// - A document fails YAML parsing
    /// - An id fails [`validate_service_id`]
    /// - Two documents share an id
    pub fn load() -> Result<Self> {
        let mut services = HashMap::with_capacity(CATALOG_FILES.len());

        for (file, contents) in CATALOG_FILES.iter().copied() {
            let service: Service =
                serde_yaml::from_str(contents).map_err(|e| Error::CatalogLoad {
                    file: file.to_string(),
                    reason: e.to_string(),
                })?;

            validate_service_id(&service.id).map_err(|reason| Error::InvalidServiceId {
                id: service.id.clone(),
                reason,
            })?;

            debug!(id = %service.id, category = %service.category, "loaded catalog entry");

            let id = service.id.clone();
            if services.insert(id.clone(), service).is_some() {
                return Err(Error::DuplicateServiceId(id));
            }
        }

        info!(count = services.len(), "service registry loaded");
        Ok(Self { services })
    }

    /// Returns a service by id.
    pub fn get(&self, id: &str) -> Result<&Service> {
        self.services
            .get(id)
            .ok_or_else(|| Error::ServiceNotFound(id.to_string()))
    }

    /// Whether the registry knows the given id.
    pub fn contains(&self, id: &str) -> bool {
        self.services.contains_key(id)
    }

    /// Total number of services in the catalog.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether the catalog is empty. Never true for the bundled catalog.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// All services, sorted by category then name.
    ///
    /// This is the stable order every listing and rendered manifest uses,
    /// so output does not depend on hash-map iteration.
    pub fn all(&self) -> Vec<&Service> {
        let mut all: Vec<&Service> = self.services.values().collect();
        all.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
        all
    }

    /// Services in one category, sorted by name.
    pub fn by_category(&self, category: ServiceCategory) -> Vec<&Service> {
        let mut matched: Vec<&Service> = self
            .services
            .values()
            .filter(|s| s.category == category)
            .collect();
        matched.sort_by(|a, b| a.name.cmp(&b.name));
        matched
    }

    /// Services deployable under the given VPN flag, sorted by category
    /// then name. The gateway itself is excluded: it is infrastructure,
    /// not a selectable stack member.
    pub fn filter_by_vpn_compatibility(&self, vpn_enabled: bool) -> Vec<&Service> {
        self.all()
            .into_iter()
            .filter(|s| !s.is_gateway() && s.is_compatible_with_vpn(vpn_enabled))
            .collect()
    }

    /// Resolves a list of ids into owned service values, in input order.
    ///
    /// # Errors
    ///
    /// Any unknown id aborts resolution before validation can run.
    pub fn resolve(&self, ids: &[String]) -> Result<Vec<Service>> {
        let mut resolved = Vec::with_capacity(ids.len());
        for id in ids {
            resolved.push(self.get(id)?.clone());
        }
        Ok(resolved)
    }

    /// The VPN gateway service.
    ///
    /// # Errors
    ///
    /// The bundled catalog always contains the gateway; a miss means the
    /// catalog itself is malformed.
    pub fn gateway(&self) -> Result<&Service> {
        self.get(GATEWAY_SERVICE_ID)
    }
}
