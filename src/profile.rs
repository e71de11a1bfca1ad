//! Saved configuration profiles.
//!
//! A profile captures one generation request — selected services, VPN
//! settings, environment values, output directory — under a name, so a
//! stack can be regenerated without re-entering anything. Profiles live
//! as YAML files in a store directory (`~/.mediarig/profiles` by
//! default); export writes JSON, import accepts either format.

use crate::constants::{validate_service_id, PROFILE_DIR, PROFILE_VERSION};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// VPN portion of a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileVpn {
    /// Whether the profile deploys through the gateway.
    pub enabled: bool,
    /// VPN provider name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub provider: String,
    /// Key material or password for the tunnel.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub private_key: String,
    /// Preferred exit countries.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub countries: String,
}

/// A saved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Profile name; also the file stem on disk.
    pub name: String,
    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-save timestamp.
    pub updated_at: DateTime<Utc>,
    /// Profile format version.
    pub version: String,
    /// VPN settings.
    #[serde(default)]
    pub vpn: ProfileVpn,
    /// Selected service ids.
    #[serde(default)]
    pub services: Vec<String>,
    /// Environment values, keyed by variable name.
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
    /// Output directory of the generated files.
    #[serde(default)]
    pub output_dir: String,
}

impl Profile {
    /// A new empty profile stamped with the current time.
    pub fn new(name: &str) -> Self {
        let now = Utc::now();
        Self {
            name: name.to_string(),
            description: String::new(),
            created_at: now,
            updated_at: now,
            version: PROFILE_VERSION.to_string(),
            vpn: ProfileVpn::default(),
            services: Vec::new(),
            environment: BTreeMap::new(),
            output_dir: String::new(),
        }
    }
}

/// Summary row for profile listings.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    pub name: String,
    pub description: String,
    pub updated_at: DateTime<Utc>,
    pub services: Vec<String>,
}

/// On-disk profile store.
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    /// A store rooted at an explicit directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The default store under the user's home directory.
    pub fn default_location() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "home directory not found",
            ))
        })?;
        Ok(Self::new(home.join(PROFILE_DIR)))
    }

    /// The store directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        validate_service_id(name).map_err(|reason| Error::InvalidServiceId {
            id: name.to_string(),
            reason,
        })?;
        Ok(self.dir.join(format!("{}.yaml", name)))
    }

    fn ensure_dir(&self) -> Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            fs::DirBuilder::new()
                .recursive(true)
                .mode(0o700)
                .create(&self.dir)?;
        }
        #[cfg(not(unix))]
        {
            fs::create_dir_all(&self.dir)?;
        }
        Ok(())
    }

    /// Saves a profile, refreshing its `updated_at` stamp and version.
    pub fn save(&self, profile: &Profile) -> Result<()> {
        self.ensure_dir()?;
        let path = self.path_for(&profile.name)?;

        let mut stored = profile.clone();
        stored.updated_at = Utc::now();
        stored.version = PROFILE_VERSION.to_string();

        let data =
            serde_yaml::to_string(&stored).map_err(|e| Error::Serialization(e.to_string()))?;
        fs::write(&path, data)?;
        info!(name = %profile.name, path = %path.display(), "profile saved");
        Ok(())
    }

    /// Loads a profile by name.
    pub fn load(&self, name: &str) -> Result<Profile> {
        let path = self.path_for(name)?;
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ProfileNotFound(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        serde_yaml::from_str(&data).map_err(|e| Error::InvalidProfile {
            path,
            reason: e.to_string(),
        })
    }

    /// Whether a profile exists.
    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).map(|p| p.exists()).unwrap_or(false)
    }

    /// Summaries of every readable profile, sorted by name. Unreadable
    /// files are skipped.
    pub fn list(&self) -> Result<Vec<ProfileSummary>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut summaries = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match self.load(name) {
                Ok(profile) => summaries.push(ProfileSummary {
                    name: profile.name,
                    description: profile.description,
                    updated_at: profile.updated_at,
                    services: profile.services,
                }),
                Err(e) => debug!(name, error = %e, "skipping unreadable profile"),
            }
        }

        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    /// Deletes a profile.
    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(name, "profile deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::ProfileNotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Exports a profile as pretty-printed JSON.
    pub fn export_json(&self, name: &str, output: &Path) -> Result<()> {
        let profile = self.load(name)?;
        let data = serde_json::to_string_pretty(&profile)
            .map_err(|e| Error::Serialization(e.to_string()))?;
        fs::write(output, data)?;
        info!(name, path = %output.display(), "profile exported");
        Ok(())
    }

    /// Imports a profile from a YAML or JSON file and saves it into the
    /// store under its own name.
    pub fn import(&self, input: &Path) -> Result<Profile> {
        let data = fs::read_to_string(input)?;

        let profile: Profile = serde_yaml::from_str(&data)
            .or_else(|_| serde_json::from_str(&data))
            .map_err(|e: serde_json::Error| Error::InvalidProfile {
                path: input.to_path_buf(),
                reason: e.to_string(),
            })?;

        self.save(&profile)?;
        Ok(profile)
    }
}
