//! Diagnostic logging to a file, away from the terminal the UI is drawn on
use anyhow::Context;
use directories::ProjectDirs;
use std::fs::{self, File};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter directives; `RUST_LOG` is
/// consulted when this is unset
const LOG_ENV: &str = "HABITGRID_LOG";

/// Environment variable overriding the location of the log file
const LOG_FILE_ENV: &str = "HABITGRID_LOG_FILE";

const LOG_FILE: &str = "habitgrid.log";

const DEFAULT_DIRECTIVES: &str = "habitgrid=info";

pub(crate) fn init_logging() -> anyhow::Result<()> {
    let path = log_path().context("could not determine where to write the log")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file =
        File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    let layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(false)
        .with_filter(filter(
            std::env::var(LOG_ENV).ok(),
            std::env::var("RUST_LOG").ok(),
        ));
    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .context("failed to install log subscriber")?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), log = %path.display(), "starting");
    Ok(())
}

fn log_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(LOG_FILE_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    let dirs = ProjectDirs::from("", "", env!("CARGO_PKG_NAME"))?;
    Some(dirs.data_local_dir().join(LOG_FILE))
}

// Unparseable directives fall back to the default rather than silencing the
// log
fn filter(own: Option<String>, rust_log: Option<String>) -> EnvFilter {
    own.or(rust_log)
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_default() {
        assert_eq!(filter(None, None).to_string(), "habitgrid=info");
    }

    #[test]
    fn test_filter_prefers_own_variable() {
        let f = filter(Some(String::from("habitgrid=trace")), Some(String::from("warn")));
        assert_eq!(f.to_string(), "habitgrid=trace");
    }

    #[test]
    fn test_filter_rust_log() {
        assert_eq!(filter(None, Some(String::from("debug"))).to_string(), "debug");
    }
}
