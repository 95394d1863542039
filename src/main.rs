//! # NOAA Full-Disk Wallpaper
//!
//! Fetches the newest GOES full-disk GeoColor image from NOAA's CDN, makes it
//! the desktop wallpaper, and deletes the images downloaded by earlier runs.
//! Meant to be started periodically by cron, launchd or a systemd timer.
//!
//! ## Architecture
//! - `locator.rs` - Scrapes the directory listing for the newest image
//! - `fetcher.rs` - Streams the image into the destination folder
//! - `wallpaper/` - Desktop backends behind the `WallpaperSetter` trait
//! - `cleaner.rs` - Removes every other file from the destination folder
//! - `pipeline.rs` - Chains the four steps, stopping at the first failure
//! - `config.rs` - Settings and their JSON file
//!
//! ## CLI Usage
//! - No arguments, `--run`, `-r`: Run the full update once
//! - `--locate`, `-l`: Print the newest image URL without downloading
//! - `--init-config`: Write a default config file
//! - `--print-config`: Show the effective configuration
//! - `--help`, `-h` / `--version`, `-v`

mod cleaner;
mod config;
mod error;
mod fetcher;
mod http;
mod locator;
mod logging;
mod pipeline;
mod wallpaper;

#[cfg(test)]
mod test_support;

use config::Config;
use pipeline::Outcome;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or(env!("CARGO_PKG_NAME"));

    match args.get(1).map(String::as_str) {
        None | Some("--run") | Some("-r") => run_async(run_update),
        Some("--locate") | Some("-l") => run_async(run_locate),
        Some("--init-config") => init_config(),
        Some("--print-config") => print_config(),
        Some("--help") | Some("-h") => print_help(program),
        Some("--version") | Some("-v") => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
        Some(other) => {
            eprintln!("Unknown argument: {other}");
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    }
}

fn print_help(program: &str) {
    println!("NOAA full-disk satellite wallpaper\n");
    println!("Usage: {program} [OPTION]\n");
    println!("Options:");
    println!("  (none), --run, -r  Download the newest image and set it as wallpaper");
    println!("  --locate, -l       Print the newest image URL and exit");
    println!("  --init-config      Write the default config file if none exists");
    println!("  --print-config     Print the effective configuration as JSON");
    println!("  --version, -v      Show version information");
    println!("  --help, -h         Show this help message");
    println!();
    match Config::config_path() {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (no config directory on this system)"),
    }
    println!("Log verbosity follows RUST_LOG (default: info).");
}

/// Builds a single-threaded runtime and drives `task` to completion.
///
/// Step failures are logged by the task and do not change the exit code;
/// only a runtime that cannot be created exits non-zero.
fn run_async<F, Fut>(task: F)
where
    F: FnOnce(Config) -> Fut,
    Fut: std::future::Future<Output = ()>,
{
    logging::init_logging();

    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {e}");
            std::process::exit(1);
        }
    };

    rt.block_on(task(Config::load()));
}

async fn run_update(config: Config) {
    let client = match http::create_client(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("{e}");
            return;
        }
    };

    let setter = match wallpaper::setter_for(config.desktop) {
        Ok(setter) => setter,
        Err(e) => {
            tracing::error!("{e}");
            return;
        }
    };

    match pipeline::run(&config, &client, setter).await {
        Ok(Outcome::NoImage) => {}
        Ok(Outcome::Applied { path, cleanup }) => {
            let removed = cleanup.as_ref().map_or(0, |r| r.removed.len());
            let failed = cleanup.as_ref().map_or(0, |r| r.failed.len());
            tracing::info!(
                "Wallpaper is {}; removed {removed} old file(s), {failed} could not be removed",
                path.display()
            );
        }
        Err(e) => tracing::error!("{e}"),
    }
}

async fn run_locate(config: Config) {
    let client = match http::create_client(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("{e}");
            return;
        }
    };

    match locator::locate_latest(&client, &config.page_url, &config.image_suffix).await {
        Ok(Some(url)) => println!("{url}"),
        Ok(None) => tracing::info!("No high-resolution images found."),
        Err(e) => tracing::error!("Error fetching latest image URL: {e}"),
    }
}

fn init_config() {
    let Some(path) = Config::config_path() else {
        eprintln!("Could not determine the config directory");
        std::process::exit(1);
    };

    if path.exists() {
        println!("Config already exists: {}", path.display());
        return;
    }

    if let Err(e) = Config::default().save_to(&path) {
        eprintln!("{e}");
        std::process::exit(1);
    }
    println!("Wrote default config to {}", path.display());
}

fn print_config() {
    logging::init_logging();

    match serde_json::to_string_pretty(&Config::load()) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Failed to serialize config: {e}");
            std::process::exit(1);
        }
    }
}
