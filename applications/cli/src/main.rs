/// docsync - folder and file sync for remote document stores
use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use docsync_cli::{commands, CliConfig, CredentialOverrides};
use docsync_client::DocsClient;
use docsync_core::Role;
use docsync_engine::DocumentSync;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "docsync")]
#[command(about = "Sync folders and files with a remote document store", long_about = None)]
struct Cli {
    /// Project directory holding docsync.toml and the documents folder
    #[arg(long, global = true, default_value = ".")]
    project: PathBuf,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log more (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Remote {
    /// Configured server name or server URL
    #[arg(short, long, env = "DOCSYNC_SERVER")]
    server: String,

    #[arg(long, env = "DOCSYNC_USERNAME")]
    username: Option<String>,

    #[arg(long, env = "DOCSYNC_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[arg(long, env = "DOCSYNC_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a folder and any missing parents
    CreateFolder {
        /// Folder path, e.g. site:mySite/images
        path: String,
        #[command(flatten)]
        remote: Remote,
    },
    /// Delete a folder and everything in it
    DeleteFolder {
        path: String,
        #[command(flatten)]
        remote: Remote,
    },
    /// Upload a file into an existing folder
    UploadFile {
        file: PathBuf,
        /// Target folder path (default: home folder)
        #[arg(short, long, default_value = "/")]
        folder: String,
        #[command(flatten)]
        remote: Remote,
    },
    /// Download a file
    DownloadFile {
        /// File path, e.g. site:mySite/images/banner.png
        path: String,
        /// Local directory to save into (must exist)
        #[arg(short, long)]
        folder: Option<PathBuf>,
        #[command(flatten)]
        remote: Remote,
    },
    /// Upload a directory tree; a trailing `/` uploads only its contents
    UploadFolder {
        dir: String,
        /// Target folder path (default: home folder)
        #[arg(short, long, default_value = "/")]
        folder: String,
        #[command(flatten)]
        remote: Remote,
    },
    /// Download a folder tree
    DownloadFolder {
        path: String,
        /// Local directory to save into (must exist)
        #[arg(short, long)]
        folder: Option<PathBuf>,
        #[command(flatten)]
        remote: Remote,
    },
    /// Share a folder with users
    ShareFolder {
        path: String,
        /// Comma separated user names
        #[arg(short, long, required = true, value_delimiter = ',')]
        users: Vec<String>,
        /// viewer, downloader, contributor or manager
        #[arg(short, long)]
        role: Role,
        #[command(flatten)]
        remote: Remote,
    },
    /// Remove users' access to a folder
    UnshareFolder {
        path: String,
        /// Comma separated user names
        #[arg(short, long, required = true, value_delimiter = ',')]
        users: Vec<String>,
        #[command(flatten)]
        remote: Remote,
    },
}

impl Commands {
    fn remote(&self) -> &Remote {
        match self {
            Commands::CreateFolder { remote, .. }
            | Commands::DeleteFolder { remote, .. }
            | Commands::UploadFile { remote, .. }
            | Commands::DownloadFile { remote, .. }
            | Commands::UploadFolder { remote, .. }
            | Commands::DownloadFolder { remote, .. }
            | Commands::ShareFolder { remote, .. }
            | Commands::UnshareFolder { remote, .. } => remote,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr, stdout carries the command report
    let default_filter = match cli.verbose {
        0 => "docsync=warn",
        1 => "docsync=info",
        _ => "docsync=debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = CliConfig::load(&cli.project, cli.config.as_deref())
        .context("failed to load configuration")?;
    config.validate()?;

    let remote = cli.command.remote();
    let overrides = CredentialOverrides {
        username: remote.username.clone(),
        password: remote.password.clone(),
        token: remote.token.clone(),
    };
    let server = config.server(&remote.server, &overrides)?;
    let client = DocsClient::new(server)?;
    tracing::debug!(server = %client.url(), "Connecting");

    let sync = DocumentSync::new(&client, config.sync_options(&cli.project));

    let project = cli.project.as_path();

    let succeeded = match &cli.command {
        Commands::CreateFolder { path, .. } => commands::create_folder(&sync, path).await?,
        Commands::DeleteFolder { path, .. } => commands::delete_folder(&sync, path).await?,
        Commands::UploadFile { file, folder, .. } => {
            commands::upload_file(&sync, &in_project(project, file), folder).await?
        }
        Commands::DownloadFile { path, folder, .. } => {
            let target = folder.as_deref().map(|dir| in_project(project, dir));
            commands::download_file(&sync, path, target.as_deref()).await?
        }
        Commands::UploadFolder { dir, folder, .. } => {
            let content_only = commands::contents_only(dir);
            let source = in_project(project, Path::new(dir));
            commands::upload_folder(&sync, &source, content_only, folder).await?
        }
        Commands::DownloadFolder { path, folder, .. } => {
            let target = folder.as_deref().map(|dir| in_project(project, dir));
            commands::download_folder(&sync, path, target.as_deref()).await?
        }
        Commands::ShareFolder {
            path, users, role, ..
        } => commands::share_folder(&sync, path, users, *role).await?,
        Commands::UnshareFolder { path, users, .. } => {
            commands::unshare_folder(&sync, path, users).await?
        }
    };

    Ok(succeeded)
}

/// Local paths are taken from the project directory; absolute ones stay as given.
fn in_project(project: &Path, path: &Path) -> PathBuf {
    project.join(path)
}
