use crate::error::LoggerError;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Maps repeated `-v` flags to a level: none shows warnings, then info, debug and trace.
#[must_use]
pub const fn verbosity_level(occurrences: u8) -> LevelFilter {
    match occurrences {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// `RUST_LOG` wins over `level` unless an explicit directive string is given.
pub(crate) fn build_env_filter(
    level: LevelFilter,
    directives: Option<&str>,
) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(level.into());
    directives.map_or_else(
        || Ok(builder.from_env_lossy()),
        |filter| {
            builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid env filter '{filter}': {e}").into(),
                context: None,
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_steps() {
        assert_eq!(verbosity_level(0), LevelFilter::WARN);
        assert_eq!(verbosity_level(1), LevelFilter::INFO);
        assert_eq!(verbosity_level(2), LevelFilter::DEBUG);
        assert_eq!(verbosity_level(7), LevelFilter::TRACE);
    }

    #[test]
    fn rejects_malformed_directives() {
        let err = build_env_filter(LevelFilter::INFO, Some("bitf=loud")).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
        assert!(build_env_filter(LevelFilter::INFO, Some("bitf_core=debug,info")).is_ok());
    }
}
