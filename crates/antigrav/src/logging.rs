//! Log setup. The terminal belongs to the UI, so logs go to a file.

use std::fs::{self, File, OpenOptions};
use std::path::Path;

use antigrav_config::LogSettings;
use color_eyre::eyre::WrapErr;
use env_logger::{Env, Target};

/// Route `log` output to the configured file.
///
/// Logging is optional: if no path can be determined or the file cannot be
/// opened, a warning goes to stderr and the app runs without a logger.
pub fn init(settings: &LogSettings) {
    let Some(path) = settings.file_path() else {
        return;
    };

    let file = match open_log_file(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("antigrav: logging disabled: {err:#}");
            return;
        }
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(settings.level.as_str()))
        .target(Target::Pipe(Box::new(file)))
        .init();
}

/// Open `path` for appending, creating it and its directory as needed.
fn open_log_file(path: &Path) -> color_eyre::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("creating log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .wrap_err_with(|| format!("opening log file {}", path.display()))
}
