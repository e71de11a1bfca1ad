//! # mediarig
//!
//! **Media-Automation Stack Assembler**
//!
//! This crate turns a selection of self-hosted media services (download
//! client, indexers, media managers, streaming server, optional VPN
//! tunnel) into a validated docker-compose manifest plus a matching
//! `.env` file. It decides whether a combination is legal — dependencies
//! satisfied, network modes compatible, no port collisions — and, if so,
//! renders both documents deterministically.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                           mediarig                               │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌──────────────────────────────────────────────────────────┐    │
//! │  │                     Orchestrator                         │    │
//! │  │   normalize → resolve → validate → render → write        │    │
//! │  └──────────────────────────────────────────────────────────┘    │
//! │        │                    │                    │               │
//! │  ┌───────────┐    ┌──────────────────┐    ┌──────────────┐       │
//! │  │ Registry  │    │    Validators    │    │  Strategies  │       │
//! │  │ embedded  │    │ dependency       │    │ bridge mode  │       │
//! │  │ catalog,  │    │ network/VPN      │    │ vpn mode     │       │
//! │  │ read-only │    │ port conflicts   │    │ (trait)      │       │
//! │  └───────────┘    └──────────────────┘    └──────────────┘       │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Deployment Topologies
//!
//! | Mode | Networking | Host ports |
//! |------|------------|------------|
//! | Bridge | shared `media` bridge network, own hostname | each service publishes its own |
//! | VPN | every service shares the gateway's namespace | gateway publishes the union |
//!
//! # Determinism
//!
//! The registry sorts services by category then name before rendering,
//! and both renderers build order-preserving document trees, so a given
//! selection produces byte-identical output regardless of the order the
//! ids were passed in — and two consecutive previews are always
//! identical (nothing in the manifest body depends on time or hashing).
//!
//! # Example
//!
//! ```rust,ignore
//! use mediarig::{Orchestrator, Registry, StackRequest};
//!
//! fn main() -> mediarig::Result<()> {
//!     let registry = Registry::load()?;
//!     let orchestrator = Orchestrator::new(&registry);
//!
//!     let request = StackRequest::new(
//!         vec!["qbittorrent".into(), "prowlarr".into(), "radarr".into()],
//!         true,
//!     );
//!     let rendered = orchestrator.preview(&request)?;
//!     println!("{}", rendered.compose);
//!     Ok(())
//! }
//! ```

pub mod compose;
pub mod constants;
pub mod env;
pub mod error;
pub mod orchestrator;
pub mod probe;
pub mod profile;
pub mod registry;
pub mod selection;
pub mod service;
pub mod validate;

// Re-exports
pub use constants::GATEWAY_SERVICE_ID;
pub use env::{render_env, EnvSettings, VpnSettings};
pub use error::{Error, Result};
pub use orchestrator::{Orchestrator, RenderedStack, StackRequest};
pub use probe::{NoProbe, PortProbe, TcpProbe};
pub use profile::{Profile, ProfileStore};
pub use registry::Registry;
pub use selection::{normalize_selection, SelectionContext};
pub use service::{PortMapping, Protocol, Service, ServiceCategory, VolumeMapping};
pub use validate::{validate_all, Finding, Severity, StackValidator, ValidationReport};
