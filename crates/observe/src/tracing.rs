use {
    crate::{
        config::{Config, Format},
        panic_hook,
    },
    std::{io::IsTerminal, sync::Once},
    time::macros::format_description,
    tracing_subscriber::{
        EnvFilter,
        Layer,
        fmt::{time::UtcTime, writer::MakeWriterExt as _},
        prelude::*,
        util::SubscriberInitExt,
    },
};

/// Installs the global tracing subscriber and routes panics through it.
/// Must be called at most once per process.
pub fn initialize(config: &Config) {
    set_tracing_subscriber(config);
    panic_hook::install();
}

/// Like [`initialize`], but later calls are ignored. For tests.
pub fn initialize_reentrant(env_filter: &str) {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| initialize(&Config::new(env_filter)));
}

fn set_tracing_subscriber(config: &Config) {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(
            std::io::stderr
                .with_max_level(config.stderr_threshold)
                .or_else(std::io::stdout),
        )
        .with_timer(UtcTime::new(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
        )));
    let layer = match config.format {
        Format::Json => layer.json().boxed(),
        Format::Text => layer.with_ansi(std::io::stdout().is_terminal()).boxed(),
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(EnvFilter::new(&config.env_filter)))
        .init();
}
