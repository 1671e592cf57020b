use clap::{Parser, Subcommand};
use log::{debug, info};
use picture_chooser::config::{self, ChooserConfig};
use picture_chooser::imaging::RustCodec;
use picture_chooser::launcher::FileLauncher;
use picture_chooser::output::{self, PickReport};
use picture_chooser::{PickKind, PickOptions, PictureChooser};
use std::path::PathBuf;

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
#[command(name = "picture-chooser")]
#[command(about = "Pick pictures and deliver them as resized JPEGs")]
#[command(long_about = "\
Pick pictures and deliver them as resized JPEGs

Every delivered picture is re-encoded as JPEG with its longer side bounded by
--max-pixel-dimension. Pictures already inside the bound keep their size; they
are never upscaled. EXIF orientation is applied before resizing.

Picking:
  choose PATH           One picture. A directory offers its first image.
  choose-many PATH...   Every image found, in order. Failed images are skipped.

Each picture is written to --out-dir as <name>.jpg, where <name> is the source
file name without its extension.

Settings are read from picture-chooser.toml in the working directory, or the
file given with --config. Run 'picture-chooser gen-config' for a documented
stock file. Set RUST_LOG=trace to follow each request.")]
#[command(version = version_string())]
struct Cli {
    /// Longer side of delivered pictures, in pixels
    #[arg(long, global = true, allow_negative_numbers = true)]
    max_pixel_dimension: Option<i64>,

    /// JPEG quality, 1-100
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..=100))]
    quality: Option<u32>,

    /// Directory delivered pictures are written to
    #[arg(long, default_value = "picked", global = true)]
    out_dir: PathBuf,

    /// Config file
    #[arg(long, default_value = config::CONFIG_FILE_NAME, global = true)]
    config: PathBuf,

    /// Print the result as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pick one picture
    Choose {
        /// Image file or directory to pick from
        path: PathBuf,
    },
    /// Pick every picture found under the given paths
    ChooseMany {
        /// Image files or directories to pick from
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Print a stock picture-chooser.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let (kind, paths) = match cli.command {
        Command::Choose { ref path } => (PickKind::PickSingle, vec![path.clone()]),
        Command::ChooseMany { ref paths } => (PickKind::PickMultiple, paths.clone()),
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(());
        }
    };

    let chooser_config = config::load_config(&cli.config)?;
    debug!("Loaded config: {chooser_config:?}");
    init_thread_pool(&chooser_config.processing);

    let options = resolve_options(&cli, &chooser_config)?;
    let report = run_pick(kind, options, paths, &chooser_config, &cli.out_dir)?;

    if cli.json {
        output::print_report_json(&report)?;
    } else {
        output::print_report(&report);
    }
    Ok(())
}

/// Command-line flags override the config file.
fn resolve_options(
    cli: &Cli,
    config: &ChooserConfig,
) -> Result<PickOptions, Box<dyn std::error::Error>> {
    let max = cli
        .max_pixel_dimension
        .unwrap_or(i64::from(config.defaults.max_pixel_dimension));
    let quality = cli.quality.unwrap_or(config.defaults.quality);
    Ok(PickOptions::new(max, quality)?)
}

/// Run one request against the file launcher and save what it delivers.
fn run_pick(
    kind: PickKind,
    options: PickOptions,
    paths: Vec<PathBuf>,
    config: &ChooserConfig,
    out_dir: &std::path::Path,
) -> Result<PickReport, Box<dyn std::error::Error>> {
    let launcher = FileLauncher::new(paths, config.picker.extensions.clone());
    let chooser = PictureChooser::new(launcher, RustCodec::new());

    let (tx, rx) = std::sync::mpsc::channel();
    chooser.pick(kind, options, move |outcome| {
        // The receiver outlives the chooser
        let _ = tx.send(outcome);
    })?;

    // A launch failure has already resolved the request
    if chooser.is_pending() {
        chooser.handle_platform_result(chooser.launcher().take_result());
    }

    let outcome = rx.try_recv()?;
    if outcome.is_cancelled() {
        info!("Request {kind} was cancelled");
    } else {
        info!("Request {kind} delivered");
    }
    Ok(output::report_outcome(kind, outcome, out_dir)?)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("picture-chooser").chain(args.iter().copied()))
    }

    #[test]
    fn quality_flag_outside_range_is_rejected() {
        assert!(parse(&["--quality", "0", "choose", "a.jpg"]).is_err());
        assert!(parse(&["--quality", "500", "choose", "a.jpg"]).is_err());
        assert!(parse(&["--quality", "1", "choose", "a.jpg"]).is_ok());
        assert!(parse(&["choose", "a.jpg", "--quality", "100"]).is_ok());
    }

    #[test]
    fn flags_override_config_defaults() {
        let config = ChooserConfig::default();
        let cli = parse(&["--quality", "70", "choose", "a.jpg"]).unwrap();
        let options = resolve_options(&cli, &config).unwrap();
        assert_eq!(options.quality().value(), 70);
        assert_eq!(options.max_pixel_dimension(), 1024);

        let cli = parse(&["--max-pixel-dimension", "640", "choose", "a.jpg"]).unwrap();
        let options = resolve_options(&cli, &config).unwrap();
        assert_eq!(options.quality().value(), 90);
        assert_eq!(options.max_pixel_dimension(), 640);
    }

    #[test]
    fn non_positive_max_dimension_flag_is_rejected() {
        let cli = parse(&["--max-pixel-dimension", "-1", "choose", "a.jpg"]).unwrap();
        assert!(resolve_options(&cli, &ChooserConfig::default()).is_err());
    }
}
