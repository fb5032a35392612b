use clap::{Parser, Subcommand};
use gallery_share::config::{self, LoggingConfig};
use gallery_share::index::build_index;
use gallery_share::share::{ImageRoot, build_links};
use gallery_share::types::RequestOrigin;
use gallery_share::{output, server};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "gallery-share")]
#[command(about = "Image gallery server with crawler-friendly share pages")]
#[command(long_about = "\
Image gallery server with crawler-friendly share pages

Serves a browsable index of two image collections and, for any image, a share
page carrying Open Graph and Twitter card metadata so links unfurl in chat
apps and social networks.

Content structure:

  site/
  ├── config.toml                  # Optional, see gen-config
  ├── public/                      # Front end (index.html, script.js, …)
  └── images/
      ├── daily/                   # Rotating collection
      │   └── promotions/
      │       ├── 01.jpg
      │       └── 02.png
      └── history/                 # Archive
          └── 2024-summer/
              └── photo.jpg

Share links:
  /image-page/images%2Fdaily%2Fpromotions%2F01.jpg   share page (302 to /image?img=…)
  /image?img=images%2Fdaily%2Fpromotions%2F01.jpg    share page, query form

Run 'gallery-share gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content root (holds config.toml, the image directory and public/)
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server until Ctrl-C
    Serve {
        /// Address to bind, overrides [server].host
        #[arg(long)]
        host: Option<String>,
        /// Port to bind, overrides [server].port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the gallery index
    Index {
        /// Print the JSON served at /api/images instead of a tree
        #[arg(long)]
        json: bool,
    },
    /// Resolve an image path and print its share links
    Share {
        /// Path fragment as it would appear after /image-page/, encoded or not
        fragment: String,
        /// Host to build links for (default: localhost:<port>)
        #[arg(long)]
        host: Option<String>,
        /// Protocol to build links for
        #[arg(long, default_value = "http")]
        proto: String,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let mut site_config = config::load_config(&cli.root)?;
    init_tracing(&site_config.logging);

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                site_config.server.host = host;
            }
            if let Some(port) = port {
                site_config.server.port = port;
            }
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(&cli.root, &site_config))?;
        }
        Command::Index { json } => {
            let root = ImageRoot::new(&cli.root, Path::new(&site_config.images_dir))?;
            let index = build_index(root.images_root());
            if json {
                println!("{}", serde_json::to_string_pretty(&index)?);
            } else {
                output::print_index_output(&index);
            }
        }
        Command::Share {
            fragment,
            host,
            proto,
        } => {
            let root = ImageRoot::new(&cli.root, Path::new(&site_config.images_dir))?;
            let host = host.unwrap_or_else(|| format!("localhost:{}", site_config.server.port));
            let origin = RequestOrigin::new(host, proto);
            match root.resolve(&fragment) {
                Ok(resource) => {
                    let links = build_links(&resource, &origin);
                    output::print_share_output(&resource.relative_path(), &links);
                }
                Err(err) => {
                    eprintln!("{fragment}: {err}");
                    std::process::exit(1);
                }
            }
        }
        Command::GenConfig => {}
    }

    Ok(())
}

/// Install the global subscriber. `RUST_LOG` wins over `[logging].filter`.
///
/// Logs go to stderr so `index --json` output stays machine-readable.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
