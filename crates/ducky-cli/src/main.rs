use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ducky::{
    commands::{nuget, steam},
    worker::{self, WorkerOpts},
    CliError, GlobalOpts,
};
use ducky_logger as logger;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ducky")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Game mod packaging and publishing",
    long_about = "Ducky packages game mods as NuGet packages and publishes them to the Steam Workshop."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Package mods as NuGet packages
    Nuget {
        #[command(subcommand)]
        action: NugetAction,
    },
    /// Publish mods to the Steam Workshop
    Steam {
        #[command(subcommand)]
        action: SteamAction,
    },
}

#[derive(Subcommand)]
enum NugetAction {
    /// Build a .nupkg from a mod directory
    Pack {
        /// Path to the mod directory
        path: PathBuf,
        /// Output directory for the package (default: the mod directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Push a built package to a NuGet server
    Push {
        /// Path to a .nupkg file, or to a mod directory with --pack
        path: PathBuf,
        /// Package the mod directory before pushing
        #[arg(short, long)]
        pack: bool,
        /// NuGet server URL (default: NUGET_SERVER or nuget.org)
        #[arg(short, long)]
        server: Option<String>,
        /// API key (default: NUGET_API_KEY)
        #[arg(short = 'k', long)]
        api_key: Option<String>,
        /// Directory holding the package (default: the mod directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check a mod directory for packaging problems
    Validate {
        /// Path to the mod directory
        path: PathBuf,
    },
}

#[derive(Subcommand)]
enum SteamAction {
    /// Check a mod directory for Workshop publishing problems
    Validate {
        /// Path to the mod directory
        path: PathBuf,
    },
    /// Upload a mod to the Steam Workshop
    Push {
        /// Path to the mod directory
        path: PathBuf,
        /// Also push localized titles/descriptions from description/*.md
        #[arg(long)]
        update_description: bool,
        /// Change note for this update
        #[arg(long)]
        changelog: Option<String>,
        /// Leave the change note without the ducky footer
        #[arg(long)]
        skip_tail: bool,
    },
    /// Internal: runs the actual upload in an isolated process
    #[command(hide = true)]
    UploadWorker {
        path: PathBuf,
        #[arg(long)]
        update_description: bool,
        #[arg(long)]
        changelog: Option<String>,
        #[arg(long)]
        skip_tail: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init_with_verbosity(cli.global.verbosity_level()) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }
    init_tracing(cli.global.verbosity_level());

    let result: Result<(), CliError> = match cli.command {
        Commands::Nuget { action } => match action {
            NugetAction::Pack { path, output } => nuget::handle_pack(&path, output.as_deref()),
            NugetAction::Push {
                path,
                pack,
                server,
                api_key,
                output,
            } => nuget::handle_push(
                &path,
                pack,
                server.as_deref(),
                api_key.as_deref(),
                output.as_deref(),
            ),
            NugetAction::Validate { path } => nuget::handle_validate(&path),
        },
        Commands::Steam { action } => match action {
            SteamAction::Validate { path } => steam::handle_validate(&path),
            SteamAction::Push {
                path,
                update_description,
                changelog,
                skip_tail,
            } => steam::handle_push(
                &path,
                &WorkerOpts {
                    update_description,
                    changelog,
                    skip_tail,
                },
            ),
            SteamAction::UploadWorker {
                path,
                update_description,
                changelog,
                skip_tail,
            } => {
                // The worker reports through its event stream, not the
                // normal error path
                std::process::exit(worker::run_upload_worker(
                    &path,
                    &WorkerOpts {
                        update_description,
                        changelog,
                        skip_tail,
                    },
                ));
            }
        },
    };

    if let Err(e) = result {
        logger::error_with_suggestions(&e.to_string(), e.suggestions());
        std::process::exit(1);
    }
}

/// Surface library tracing events on stderr at the chosen verbosity
fn init_tracing(verbosity: u8) {
    let default_filter = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}
