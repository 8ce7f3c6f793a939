use std::sync::Once;

use log::LevelFilter;

/// Logger configuration.
///
/// `env_filter` uses the `env_logger` directive syntax
/// (`"info"`, `"tessera_engine=debug,wgpu_core=warn"`). Without it `RUST_LOG`
/// is read, and without that `default_level` applies, with the wgpu backend
/// crates capped at `warn`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub default_level: LevelFilter,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

/// Backend crates that log per call at `info`.
const NOISY_CRATES: [&str; 3] = ["wgpu_core", "wgpu_hal", "naga"];

#[derive(Debug, PartialEq, Eq)]
enum Filters {
    Directives(String),
    Levels {
        default: LevelFilter,
        modules: Vec<(&'static str, LevelFilter)>,
    },
}

fn resolve_filters(config: &LoggingConfig, rust_log: Option<String>) -> Filters {
    match config.env_filter.clone().or(rust_log) {
        Some(directives) => Filters::Directives(directives),
        None => Filters::Levels {
            default: config.default_level,
            modules: NOISY_CRATES
                .iter()
                .map(|&name| (name, config.default_level.min(LevelFilter::Warn)))
                .collect(),
        },
    }
}

static INIT: Once = Once::new();

/// Installs `env_logger` as the global logger. Only the first call has an effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match resolve_filters(&config, std::env::var("RUST_LOG").ok()) {
            Filters::Directives(directives) => {
                builder.parse_filters(&directives);
            }
            Filters::Levels { default, modules } => {
                builder.filter_level(default);
                for (name, level) in modules {
                    builder.filter_module(name, level);
                }
            }
        }

        builder.write_style(config.write_style).init();
        log::debug!("logging initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins_over_rust_log() {
        let config = LoggingConfig {
            env_filter: Some("debug".into()),
            ..Default::default()
        };
        assert_eq!(
            resolve_filters(&config, Some("trace".into())),
            Filters::Directives("debug".into())
        );
    }

    #[test]
    fn rust_log_is_used_without_explicit_filter() {
        assert_eq!(
            resolve_filters(&LoggingConfig::default(), Some("warn".into())),
            Filters::Directives("warn".into())
        );
    }

    #[test]
    fn backend_crates_are_capped_but_never_raised() {
        let Filters::Levels { default, modules } =
            resolve_filters(&LoggingConfig::default(), None)
        else {
            panic!("expected level filters");
        };
        assert_eq!(default, LevelFilter::Info);
        assert!(modules.iter().all(|&(_, l)| l == LevelFilter::Warn));

        let quiet = LoggingConfig {
            default_level: LevelFilter::Error,
            ..Default::default()
        };
        let Filters::Levels { modules, .. } = resolve_filters(&quiet, None) else {
            panic!("expected level filters");
        };
        assert!(modules.iter().all(|&(_, l)| l == LevelFilter::Error));
    }
}
