use log::LevelFilter;
use std::env;

/// Installs the `env_logger` backend for the binaries.
///
/// Logs at `Info` by default and `Debug` when `verbose` is set; an explicit
/// `RUST_LOG` overrides both. Calling it twice is harmless.
pub fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter(None, level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false);

    if let Ok(spec) = env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }

    if builder.try_init().is_ok() {
        log::debug!("logger initialized at {level:?} level");
    }
}
