//! mediarig - Media Stack Assembler CLI
//!
//! Generates a validated docker-compose manifest and `.env` file for a
//! selection of self-hosted media services.
//!
//! ## Usage
//!
//! ```sh
//! mediarig list
//! mediarig preview --services qbittorrent,prowlarr,radarr --vpn
//! mediarig generate --services qbittorrent,prowlarr,radarr --vpn -o ./stack
//! mediarig generate --profile homelab
//! mediarig profiles list
//! ```

use clap::{Parser, Subcommand};
use mediarig::{
    EnvSettings, Orchestrator, Profile, ProfileStore, Registry, RenderedStack, Result,
    ServiceCategory, StackRequest, VpnSettings,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// The media stack assembler CLI.
#[derive(Parser, Debug)]
#[command(name = "mediarig")]
#[command(about = "Assemble a self-hosted media stack into docker-compose files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate docker-compose.yml and .env.
    Generate {
        /// Comma-separated service ids.
        #[arg(short, long, value_delimiter = ',')]
        services: Vec<String>,

        /// Route the stack through the VPN gateway.
        #[arg(long)]
        vpn: bool,

        /// Output directory for the generated files (default: the
        /// profile's directory, or the current directory).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Base path for configuration and media volumes.
        #[arg(long)]
        base_path: Option<String>,

        /// Load selection and settings from a saved profile.
        #[arg(short, long)]
        profile: Option<String>,

        /// Save the request as a profile after generation.
        #[arg(long)]
        save_as: Option<String>,

        /// Overwrite existing files without creating backups.
        #[arg(long)]
        no_backup: bool,
    },
    /// Render both files to stdout without writing anything.
    Preview {
        /// Comma-separated service ids.
        #[arg(short, long, value_delimiter = ',')]
        services: Vec<String>,

        /// Route the stack through the VPN gateway.
        #[arg(long)]
        vpn: bool,

        /// Base path for configuration and media volumes.
        #[arg(long)]
        base_path: Option<String>,
    },
    /// List the available services by category.
    List {
        /// Only show services deployable with this VPN flag.
        #[arg(long)]
        vpn: Option<bool>,
    },
    /// Manage saved profiles.
    Profiles {
        #[command(subcommand)]
        command: ProfileCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ProfileCommands {
    /// List saved profiles.
    List,
    /// Show one profile.
    Show { name: String },
    /// Delete a profile.
    Delete { name: String },
    /// Export a profile as JSON.
    Export { name: String, output: PathBuf },
    /// Import a profile from a YAML or JSON file.
    Import { input: PathBuf },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Catalog load failure is the one unrecoverable error: nothing can
    // run without a populated registry.
    let registry = Registry::load()?;

    match cli.command {
        Commands::Generate {
            services,
            vpn,
            output,
            base_path,
            profile,
            save_as,
            no_backup,
        } => cmd_generate(
            &registry, services, vpn, output, base_path, profile, save_as, !no_backup,
        ),
        Commands::Preview {
            services,
            vpn,
            base_path,
        } => cmd_preview(&registry, services, vpn, base_path),
        Commands::List { vpn } => {
            cmd_list(&registry, vpn);
            Ok(())
        }
        Commands::Profiles { command } => cmd_profiles(command),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_generate(
    registry: &Registry,
    services: Vec<String>,
    vpn: bool,
    output: Option<PathBuf>,
    base_path: Option<String>,
    profile_name: Option<String>,
    save_as: Option<String>,
    backup: bool,
) -> Result<()> {
    let store = ProfileStore::default_location()?;

    let mut request = match profile_name {
        Some(name) => {
            let profile = store.load(&name)?;
            eprintln!("Loaded profile '{}'", profile.name);
            request_from_profile(&profile)
        }
        None => StackRequest::new(services, vpn),
    };

    if let Some(output) = output {
        request.output_dir = output;
    }
    if let Some(base_path) = base_path {
        request.env.base_path = base_path;
    }

    let orchestrator = Orchestrator::new(registry);
    let rendered = orchestrator.generate(&request, backup)?;
    print_warnings(&rendered);

    println!(
        "Created {} and {} in {}",
        mediarig::constants::COMPOSE_FILE_NAME,
        mediarig::constants::ENV_FILE_NAME,
        request.output_dir.display()
    );
    println!(
        "Next: cd {} && docker compose up -d",
        request.output_dir.display()
    );

    if let Some(name) = save_as {
        let profile = profile_from_request(&name, &request);
        store.save(&profile)?;
        println!("Saved profile '{}'", name);
    }

    Ok(())
}

fn cmd_preview(
    registry: &Registry,
    services: Vec<String>,
    vpn: bool,
    base_path: Option<String>,
) -> Result<()> {
    let mut request = StackRequest::new(services, vpn);
    if let Some(base_path) = base_path {
        request.env.base_path = base_path;
    }

    let orchestrator = Orchestrator::new(registry);
    let rendered = orchestrator.preview(&request)?;
    print_warnings(&rendered);

    println!("# --- {} ---", mediarig::constants::COMPOSE_FILE_NAME);
    println!("{}", rendered.compose);
    println!("# --- {} ---", mediarig::constants::ENV_FILE_NAME);
    println!("{}", rendered.env);
    Ok(())
}

fn cmd_list(registry: &Registry, vpn: Option<bool>) {
    for category in ServiceCategory::ALL {
        let services = match vpn {
            Some(flag) => registry
                .filter_by_vpn_compatibility(flag)
                .into_iter()
                .filter(|s| s.category == category)
                .collect::<Vec<_>>(),
            None => registry.by_category(category),
        };
        if services.is_empty() {
            continue;
        }

        println!("{}:", category);
        for service in services {
            let marker = if service.optional { " (optional)" } else { "" };
            println!("  {:<14} {}{}", service.id, service.description, marker);
        }
    }
}

fn cmd_profiles(command: ProfileCommands) -> Result<()> {
    let store = ProfileStore::default_location()?;

    match command {
        ProfileCommands::List => {
            let summaries = store.list()?;
            if summaries.is_empty() {
                println!("No saved profiles.");
                return Ok(());
            }
            for summary in summaries {
                println!(
                    "{:<20} {:<10} services: {}",
                    summary.name,
                    summary.updated_at.format("%Y-%m-%d"),
                    summary.services.join(", ")
                );
            }
        }
        ProfileCommands::Show { name } => {
            let profile = store.load(&name)?;
            let yaml = serde_yaml::to_string(&profile)
                .map_err(|e| mediarig::Error::Serialization(e.to_string()))?;
            print!("{}", yaml);
        }
        ProfileCommands::Delete { name } => {
            store.delete(&name)?;
            println!("Deleted profile '{}'", name);
        }
        ProfileCommands::Export { name, output } => {
            store.export_json(&name, &output)?;
            println!("Exported '{}' to {}", name, output.display());
        }
        ProfileCommands::Import { input } => {
            let profile = store.import(&input)?;
            println!("Imported profile '{}'", profile.name);
        }
    }

    Ok(())
}

fn print_warnings(rendered: &RenderedStack) {
    for warning in &rendered.report.warnings {
        eprintln!("warning: {}", warning.message);
    }
}

/// Rebuilds a request from a saved profile.
fn request_from_profile(profile: &Profile) -> StackRequest {
    let mut env = EnvSettings::default();
    if let Some(value) = profile.environment.get("COMPOSE_PROJECT_NAME") {
        env.project_name = value.clone();
    }
    if let Some(value) = profile.environment.get("BASE_PATH") {
        env.base_path = value.clone();
    }
    if let Some(value) = profile.environment.get("TZ") {
        env.timezone = value.clone();
    }
    if let Some(value) = profile.environment.get("PUID") {
        env.puid = value.clone();
    }
    if let Some(value) = profile.environment.get("PGID") {
        env.pgid = value.clone();
    }
    if let Some(value) = profile.environment.get("UMASK") {
        env.umask = value.clone();
    }

    if profile.vpn.enabled {
        env.vpn = Some(VpnSettings {
            service_provider: profile.vpn.provider.clone(),
            wireguard_private_key: profile.vpn.private_key.clone(),
            server_countries: profile.vpn.countries.clone(),
            ..VpnSettings::default()
        });
    }

    StackRequest {
        service_ids: profile.services.clone(),
        vpn_enabled: profile.vpn.enabled,
        output_dir: if profile.output_dir.is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(&profile.output_dir)
        },
        env,
    }
}

/// Captures a request as a profile for later reuse.
fn profile_from_request(name: &str, request: &StackRequest) -> Profile {
    let mut profile = Profile::new(name);
    profile.services = request.service_ids.clone();
    profile.vpn.enabled = request.vpn_enabled;
    profile.output_dir = request.output_dir.display().to_string();

    profile
        .environment
        .insert("COMPOSE_PROJECT_NAME".into(), request.env.project_name.clone());
    profile
        .environment
        .insert("BASE_PATH".into(), request.env.base_path.clone());
    profile.environment.insert("TZ".into(), request.env.timezone.clone());
    profile.environment.insert("PUID".into(), request.env.puid.clone());
    profile.environment.insert("PGID".into(), request.env.pgid.clone());
    profile.environment.insert("UMASK".into(), request.env.umask.clone());

    if let Some(vpn) = &request.env.vpn {
        profile.vpn.provider = vpn.service_provider.clone();
        profile.vpn.private_key = vpn.wireguard_private_key.clone();
        profile.vpn.countries = vpn.server_countries.clone();
    }

    profile
}
