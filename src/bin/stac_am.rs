use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use stac_asset_manager::config::ConfigLoader;
use stac_asset_manager::error::StacError;
use stac_asset_manager::fetch::HttpFetcher;
use stac_asset_manager::item::Item;
use stac_asset_manager::store::DownloadStore;

#[derive(Parser)]
#[command(name = "stac-am")]
#[command(about = "Download STAC item assets to template-derived local paths")]
#[command(version, author)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Download assets of an item")]
    Download(DownloadArgs),
    #[command(about = "Show item summary and available assets")]
    Info(InfoArgs),
}

#[derive(Args)]
struct DownloadArgs {
    /// Path to an item record JSON file
    item: String,

    /// Asset keys or aliases to download
    keys: Vec<String>,

    #[arg(long)]
    all: bool,

    #[arg(long)]
    config: Option<String>,

    #[arg(long)]
    data_dir: Option<String>,

    #[arg(long)]
    filename: Option<String>,
}

#[derive(Args)]
struct InfoArgs {
    /// Path to an item record JSON file
    item: String,
}

#[derive(Debug, Serialize)]
struct DownloadReport {
    item: String,
    downloads: Vec<DownloadEntry>,
}

#[derive(Debug, Serialize)]
struct DownloadEntry {
    key: String,
    path: Option<String>,
}

#[derive(Debug, Serialize)]
struct InfoReport {
    summary: Vec<(String, serde_json::Value)>,
    bbox: [f64; 4],
    assets: Vec<AssetEntry>,
}

#[derive(Debug, Serialize)]
struct AssetEntry {
    key: String,
    href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    media_type: Option<String>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(stac) = report.downcast_ref::<StacError>() {
            return ExitCode::from(map_exit_code(stac));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &StacError) -> u8 {
    match error {
        StacError::ConfigRead(_) | StacError::ConfigParse(_) => 2,
        StacError::Transport(_) | StacError::TransportStatus { .. } => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Download(args) => run_download(args),
        Commands::Info(args) => run_info(args),
    }
}

fn run_download(args: DownloadArgs) -> miette::Result<()> {
    if args.keys.is_empty() && !args.all {
        return Err(miette::Report::msg(
            "at least one asset key required (or pass --all)",
        ));
    }

    let mut config = ConfigLoader::resolve(args.config.as_deref()).into_diagnostic()?;
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(filename) = args.filename {
        config.filename = filename;
    }

    let item = Item::from_file(&args.item).into_diagnostic()?;
    let fetcher = HttpFetcher::new().into_diagnostic()?;
    let store = DownloadStore::new(config, fetcher);

    let mut downloads = Vec::new();
    if args.all {
        for (key, path) in store.download_all(&item).into_diagnostic()? {
            downloads.push(DownloadEntry {
                key,
                path: Some(path.to_string()),
            });
        }
    } else {
        for key in &args.keys {
            let path = store.download(&item, key).into_diagnostic()?;
            downloads.push(DownloadEntry {
                key: key.clone(),
                path: path.map(|path| path.to_string()),
            });
        }
    }

    print_json(&DownloadReport {
        item: item.id().to_string(),
        downloads,
    })
}

fn run_info(args: InfoArgs) -> miette::Result<()> {
    let item = Item::from_file(&args.item).into_diagnostic()?;

    let summary = item
        .properties()
        .summary_keys()
        .into_iter()
        .filter_map(|key| {
            item.properties()
                .find(key)
                .map(|value| (key.to_string(), value.clone()))
        })
        .collect();
    let assets = item
        .assets()
        .iter()
        .map(|(key, asset)| AssetEntry {
            key: key.clone(),
            href: asset.href.clone(),
            media_type: asset.media_type.clone(),
        })
        .collect();

    print_json(&InfoReport {
        summary,
        bbox: item.bbox(),
        assets,
    })
}

fn print_json<T: Serialize>(value: &T) -> miette::Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{json}");
    Ok(())
}
