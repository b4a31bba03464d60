use clap::{Parser, Subcommand};
use edit_mapper::config::{self, MapperConfig};
use edit_mapper::mapping::CustomMapper;
use edit_mapper::{RequestDescriptor, RequestStyle, build_mapper};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "edit-mapper")]
#[command(about = "Map image requests to image edit instructions")]
#[command(long_about = "\
Map image requests to image edit instructions

Reads an image request (a URI, or an API Gateway proxy event) and prints the
edit instructions an image engine should apply, as JSON on stdout.

Request styles:

  semantic   /photos/dawn.jpg?w=300&h=200&fit=cover&fm=webp&q=80
  custom     legacy paths, rewritten with [rewrite] before mapping
  thumbor    /fit-in/300x200/photos/dawn.jpg

Configuration is read from edit-mapper.toml (see 'edit-mapper gen-config') and
overridden by REQUEST_STYLE, REWRITE_MATCH_PATTERN and REWRITE_SUBSTITUTION.
Set RUST_LOG=edit_mapper=debug to trace mapping decisions on stderr.")]
#[command(version = version_string())]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::CONFIG_FILE_NAME, global = true)]
    config: PathBuf,

    /// Override the configured request style
    #[arg(long, global = true)]
    style: Option<RequestStyle>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Map a request URI (path plus query string) to edits
    Map {
        /// Request URI, e.g. "/dawn.jpg?w=300&fm=webp"
        uri: String,
    },
    /// Map an API Gateway proxy event read from a JSON file
    Event {
        /// Path to the event JSON
        file: PathBuf,
    },
    /// Apply the custom-style rewrite rule to a path
    Rewrite {
        /// Legacy request path
        path: String,
    },
    /// Print a stock edit-mapper.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Map { uri } => {
            let config = load_config(&cli.config, cli.style)?;
            let request = RequestDescriptor::from_uri(&uri);
            print_edits(&config, &request)?;
        }
        Command::Event { file } => {
            let config = load_config(&cli.config, cli.style)?;
            let content = std::fs::read_to_string(&file)?;
            let request: RequestDescriptor = serde_json::from_str(&content)?;
            print_edits(&config, &request)?;
        }
        Command::Rewrite { path } => {
            let config = load_config(&cli.config, cli.style)?;
            let mapper = CustomMapper::new(&config.rewrite)?;
            println!("{}", mapper.parse_custom_path(Some(&path))?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr so stdout carries only the JSON result.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("edit_mapper=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config file and environment, then apply the `--style` flag.
fn load_config(
    path: &Path,
    style: Option<RequestStyle>,
) -> Result<MapperConfig, Box<dyn std::error::Error>> {
    let mut config = config::load_config(path, |key| std::env::var(key).ok())?;
    if let Some(style) = style {
        config.request_style = style;
    }
    tracing::debug!(style = %config.request_style, "configuration loaded");
    Ok(config)
}

fn print_edits(
    config: &MapperConfig,
    request: &RequestDescriptor,
) -> Result<(), Box<dyn std::error::Error>> {
    let mapper = build_mapper(config)?;
    let edits = mapper.map_to_edits(request)?;
    println!("{}", serde_json::to_string_pretty(&edits)?);
    Ok(())
}
