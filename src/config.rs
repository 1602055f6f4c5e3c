//! Config handling

use tracing::log::LevelFilter;

/// HTTP and TLS crates that log every request at info level.
const CHATTY_MODULES: [(&str, LevelFilter); 5] = [
    ("tracing", LevelFilter::Warn),
    ("reqwest", LevelFilter::Warn),
    ("rustls", LevelFilter::Info),
    ("hyper_util", LevelFilter::Info),
    ("h2", LevelFilter::Info),
];

/// Level for this crate's own messages.
pub fn log_level(debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Per-module overrides; debug mode shows everything.
pub fn module_levels(debug: bool) -> &'static [(&'static str, LevelFilter)] {
    if debug { &[] } else { &CHATTY_MODULES }
}

/// Sets up logging based on the debug flag
pub fn setup_logging(debug: bool) -> Result<(), Box<std::io::Error>> {
    let logger = module_levels(debug).iter().fold(
        simple_logger::SimpleLogger::new().with_level(log_level(debug)),
        |logger, (module, level)| logger.with_module_level(module, *level),
    );
    logger.init().map_err(|err| {
        eprintln!("Failed to initialize logger: {}", err);
        Box::new(std::io::Error::other(err))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_raises_level_and_unmutes_http_crates() {
        assert_eq!(log_level(true), LevelFilter::Debug);
        assert_eq!(log_level(false), LevelFilter::Info);
        assert!(module_levels(true).is_empty());
        assert!(
            module_levels(false)
                .iter()
                .any(|(module, level)| *module == "reqwest" && *level == LevelFilter::Warn)
        );
    }

    #[test]
    fn second_init_is_an_error_not_a_panic() {
        let _ = setup_logging(true);
        assert!(setup_logging(false).is_err());
    }
}
