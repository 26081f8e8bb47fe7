use std::path::PathBuf;

use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

const NOISY_TARGETS: [&str; 5] = ["reqwest", "hyper", "hyper_util", "html5ever", "selectors"];

/// Console log level for `-v`/`-q` counts (verbose minus quiet).
pub fn level_for_verbosity(verbosity: i16) -> LevelFilter {
    match verbosity {
        i16::MIN..=-1 => LevelFilter::Error,
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2.. => LevelFilter::Debug,
    }
}

/// Console logging to stderr, plus an optional log file with its own level.
pub fn setup_logging(
    console_level: LevelFilter,
    log_file: Option<PathBuf>,
    log_file_level: LevelFilter,
) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);

    let console = fern::Dispatch::new()
        .level(console_level)
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} {:<5} {}: {}",
                chrono::Local::now().format("%H:%M:%S"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .chain(std::io::stderr());

    let mut root = fern::Dispatch::new().chain(console);
    let mut max_level = console_level;

    if let Some(log_file) = log_file {
        let file = fern::log_file(&log_file)
            .wrap_err_with(|| format!("Failed to open log file: {}", log_file.display()))?;
        let file_dispatch = fern::Dispatch::new()
            .level(log_file_level)
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{}: {} - {} - {}:{} - {}",
                    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%z"),
                    record.target(),
                    record.level(),
                    record.file().unwrap_or("?"),
                    record.line().unwrap_or(0),
                    message
                ))
            })
            .chain(file);
        root = root.chain(file_dispatch);
        max_level = max_level.max(log_file_level);
    }

    root = root.level(max_level);
    for target in NOISY_TARGETS {
        root = root.level_for(target, max_level.min(LevelFilter::Warn));
    }

    root.apply().wrap_err("Failed to install logger")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for_verbosity(-3), LevelFilter::Error);
        assert_eq!(level_for_verbosity(-1), LevelFilter::Error);
        assert_eq!(level_for_verbosity(0), LevelFilter::Warn);
        assert_eq!(level_for_verbosity(1), LevelFilter::Info);
        assert_eq!(level_for_verbosity(2), LevelFilter::Debug);
        assert_eq!(level_for_verbosity(5), LevelFilter::Debug);
    }
}
