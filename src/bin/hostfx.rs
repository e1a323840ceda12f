//! hostfx CLI - runtime and SDK resolution frontend
//!
//! Usage:
//!   hostfx list-sdks                     List installed SDKs
//!   hostfx list-frameworks [name]        List installed shared frameworks
//!   hostfx resolve-sdk [--cwd DIR]       Resolve the SDK for a directory
//!   hostfx resolve-frameworks <app>      Resolve an app's framework set

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use hostfx::{HostMode, RollForwardPolicy, SdkResolver, install, resolve_frameworks_for_app};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Default install root: `DOTNET_ROOT` via clap, then a per-user install,
/// then the machine-global location.
fn default_dotnet_root() -> PathBuf {
    if let Some(home) = dirs::home_dir() {
        let user_root = home.join(".dotnet");
        if user_root.join("sdk").is_dir() || user_root.join("shared").is_dir() {
            return user_root;
        }
    }
    #[cfg(windows)]
    {
        std::env::var_os("ProgramFiles")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(r"C:\Program Files"))
            .join("dotnet")
    }
    #[cfg(not(windows))]
    {
        PathBuf::from("/usr/share/dotnet")
    }
}

/// The environment convention is `0`/`1`; accept those alongside the
/// usual boolean spellings.
fn lenient_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        other => Err(format!("invalid boolean value: {other}")),
    }
}

#[derive(Parser)]
#[command(name = "hostfx")]
#[command(about = "Resolve .NET-style SDKs and shared frameworks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Root of the dotnet install layout
    #[arg(long, global = true, env = "DOTNET_ROOT")]
    dotnet_root: Option<PathBuf>,

    /// Also consult the machine-global install location
    #[arg(
        long,
        global = true,
        env = "DOTNET_MULTILEVEL_LOOKUP",
        value_parser = lenient_bool,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true"
    )]
    multilevel: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List installed SDKs
    ListSdks,

    /// List installed shared frameworks
    ListFrameworks {
        /// Restrict the listing to one framework name
        name: Option<String>,
    },

    /// Resolve the SDK a CLI command would dispatch to
    ResolveSdk {
        /// Directory to resolve for (nearest global.json wins)
        #[arg(long)]
        cwd: Option<PathBuf>,
    },

    /// Resolve the frameworks an application would load
    ResolveFrameworks {
        /// Application binary or its runtimeconfig.json
        app: PathBuf,

        /// Override the first framework reference's roll-forward policy
        #[arg(long, env = "DOTNET_ROLL_FORWARD")]
        roll_forward: Option<RollForwardPolicy>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let dotnet_root = cli.dotnet_root.unwrap_or_else(default_dotnet_root);
    let hives = install::default_hives(&dotnet_root, cli.multilevel);

    match cli.command {
        Commands::ListSdks => {
            let sdks = install::scan_sdks(&hives);
            if sdks.is_empty() {
                println!("{}", "(no SDKs installed)".dimmed());
            }
            for sdk in sdks {
                println!("{} {}", sdk.version.bold(), format!("[{}]", sdk.root_dir.display()).dimmed());
            }
        }

        Commands::ListFrameworks { name } => {
            let frameworks = install::scan_frameworks(&hives, name.as_deref());
            if frameworks.is_empty() {
                println!("{}", "(no frameworks installed)".dimmed());
            }
            for fx in frameworks {
                let name = fx.name.as_deref().unwrap_or_default().to_string();
                println!(
                    "{} {} {}",
                    name.cyan(),
                    fx.version.bold(),
                    format!("[{}]", fx.root_dir.display()).dimmed()
                );
            }
        }

        Commands::ResolveSdk { cwd } => {
            let cwd = match cwd {
                Some(dir) => dir,
                None => std::env::current_dir()?,
            };
            let resolver = SdkResolver::from_nearest_global_file(&cwd);
            if let Some(file) = resolver.global_file() {
                println!("global.json: {}", file.display().dimmed());
            }
            match resolver.resolve_or_error(&dotnet_root) {
                Ok(dir) => println!("{} {}", "sdk:".green(), dir.display()),
                Err(err) => bail!("{err} (status {:#x})", err.status_code().value()),
            }
        }

        Commands::ResolveFrameworks { app, roll_forward } => {
            // A config path directly means split-fx layout; a binary means
            // the config sits next to it.
            let mode = if app.extension().is_some_and(|e| e == "json") {
                HostMode::SplitFx
            } else {
                HostMode::Muxer
            };
            let config_path = mode.runtime_config_path(&app);
            let config = hostfx::RuntimeConfig::from_file(&config_path)
                .map_err(|err| anyhow::anyhow!("{err} (status {:#x})", err.status_code().value()))?;
            let definitions = resolve_frameworks_for_app(&app, config, &hives, roll_forward)
                .map_err(|err| anyhow::anyhow!("{err} (status {:#x})", err.status_code().value()))?;
            for definition in &definitions {
                // The app entry carries no found version.
                if definition.found_version.is_empty() {
                    println!("{} {}", "app:".green(), definition.dir.display());
                } else {
                    println!(
                        "{} {} {} {}",
                        definition.name.cyan(),
                        definition.found_version.bold(),
                        format!("(requested {})", definition.requested_version).dimmed(),
                        definition.dir.display()
                    );
                }
            }
        }
    }

    Ok(())
}
