use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn filter_directives(verbose: bool) -> &'static str {
    if verbose {
        "scopus_report=debug,info"
    } else {
        "scopus_report=info"
    }
}

/// `RUST_LOG` wins over `verbose` when set.
pub fn init_logger(verbose: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(verbose)));
    let layer = fmt::layer().with_target(false).with_thread_ids(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.json().with_current_span(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact())
            .init();
    }
}
