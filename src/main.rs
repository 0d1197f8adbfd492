use clap::{Parser, Subcommand};
use image_thumbnailer::config::{self, ThumbnailerConfig};
use image_thumbnailer::event;
use image_thumbnailer::handler::{self, HandlerSettings};
use image_thumbnailer::imaging::RustBackend;
use image_thumbnailer::output;
use image_thumbnailer::storage::FsStorage;
use image_thumbnailer::types::SourceReference;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "image-thumbnailer")]
#[command(about = "Generate resized variants of images uploaded to object storage")]
#[command(long_about = "\
Generate resized variants of images uploaded to object storage

Buckets are directories under the storage root. An object created at
<root>/<bucket>/original/<name>.<ext> gets its variants written next to it:

  storage/
  └── photos/
      ├── original/
      │   └── vacation.png               # Uploaded source
      └── thumbs/
          ├── vacation_original.png      # Re-encoded, same dimensions
          ├── vacation_thumb_1200.png    # Resized to 1200px wide
          ├── vacation_thumb_640.png
          └── vacation_thumb_420.png

Only jpg, jpeg and png keys are processed (case-sensitive); anything else is
reported as skipped.

Run 'image-thumbnailer gen-config' to generate a documented thumbnailer.toml.")]
#[command(version)]
struct Cli {
    /// Configuration file (missing file = stock defaults)
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Override `storage.root` from the config file
    #[arg(long, global = true)]
    storage_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Handle every record of an object-created event file
    HandleEvent {
        /// Path to the event JSON
        event: PathBuf,
    },
    /// Handle a single object by its raw (possibly encoded) key
    Process {
        /// Bucket name, a directory under the storage root
        container: String,
        /// Object key as it appears in notifications, e.g. original/my+photo.jpg
        key: String,
    },
    /// Print a stock thumbnailer.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    let sources = match &cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(());
        }
        Command::HandleEvent { event } => event::load_event(event)?.sources(),
        Command::Process { container, key } => {
            vec![SourceReference::new(container.as_str(), key.as_str())]
        }
    };

    let config = config::load_config(&cli.config)?;
    init_thread_pool(&config.processing);

    let root = cli
        .storage_root
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.storage.root));
    let failed = run(&config, &FsStorage::new(root), &sources)?;
    if failed > 0 {
        return Err(format!("{failed} of {} objects failed", sources.len()).into());
    }
    Ok(())
}

/// Handle each source in order, printing its outcome. Returns the failure count.
fn run(
    config: &ThumbnailerConfig,
    storage: &FsStorage,
    sources: &[SourceReference],
) -> Result<usize, Box<dyn std::error::Error>> {
    let settings = HandlerSettings::from_config(config)?;
    let backend = RustBackend::new();

    let mut failed = 0;
    for source in sources {
        match handler::handle(storage, &backend, source, &settings) {
            Ok(outcome) => output::print_outcome(source, &outcome),
            Err(e) => {
                output::print_failure(source, &e);
                failed += 1;
            }
        }
    }
    Ok(failed)
}

/// Log to stderr, filtered by `RUST_LOG` (default: this crate at info).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("image_thumbnailer=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: the config can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
