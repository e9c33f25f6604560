//! Terminal logging setup.

use color_eyre::eyre::{Result, WrapErr as _};
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Log levels from quietest to noisiest.
const LEVELS: [LevelFilter; 6] = [
    LevelFilter::Off,
    LevelFilter::Error,
    LevelFilter::Warn,
    LevelFilter::Info,
    LevelFilter::Debug,
    LevelFilter::Trace,
];

/// Raises `base` by one level per `-v` flag, saturating at [`LevelFilter::Trace`].
pub fn level_from_verbosity(base: LevelFilter, verbose: u8) -> LevelFilter {
    let base_idx = LEVELS.iter().position(|&level| level == base).unwrap_or(0);

    LEVELS
        .get(base_idx + usize::from(verbose))
        .copied()
        .unwrap_or(LevelFilter::Trace)
}

/// Installs a logger writing to standard error at `level`.
///
/// # Errors
///
/// This function may return errors if a logger has already been installed.
pub fn init(level: LevelFilter) -> Result<()> {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Debug)
        .build();

    TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto)
        .wrap_err("failed to install the terminal logger")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_verbosity() {
        assert_eq!(level_from_verbosity(LevelFilter::Warn, 0), LevelFilter::Warn);
        assert_eq!(level_from_verbosity(LevelFilter::Warn, 2), LevelFilter::Debug);
        assert_eq!(level_from_verbosity(LevelFilter::Info, 9), LevelFilter::Trace);
        assert_eq!(level_from_verbosity(LevelFilter::Off, 1), LevelFilter::Error);
    }
}
