use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the log filter (e.g. `JASPER_LOG=jasper=debug`).
pub const LOG_ENV_VAR: &str = "JASPER_LOG";

/// Install the jasper subscriber at its quiet default: errors only.
///
/// Log lines are JSON on stderr, leaving stdout to the assistant's replies in text mode.
/// `JASPER_LOG` overrides the level.
pub fn init() {
    init_with_default(default_level(false));
}

/// The level used when `JASPER_LOG` is unset: `DEBUG` under `--debug`, `ERROR` otherwise.
pub fn default_level(debug: bool) -> LevelFilter {
    if debug { LevelFilter::DEBUG } else { LevelFilter::ERROR }
}

/// Install the jasper subscriber with `level` as the fallback for `JASPER_LOG`.
///
/// Only the first call in a process installs anything.
pub fn init_with_default(level: LevelFilter) {
    let filter = EnvFilter::builder()
        .with_env_var(LOG_ENV_VAR)
        .with_default_directive(level.into())
        .from_env_lossy();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_span_list(true),
        )
        .try_init();
}
