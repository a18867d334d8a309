pub use tracing::{debug, error, info, trace, warn};

use crate::errors::LogError;

#[cfg(all(target_arch = "wasm32", feature = "dev-logging"))]
/// Setup the logging system for the application for WASM.
/// This function will install the panic hook and the [`tracing-web`] logging system,
/// writing to the browser console with performance marks for spans.
pub fn setup() -> Result<(), LogError> {
    use tracing_subscriber::fmt::format::{FmtSpan, Pretty};
    use tracing_subscriber::fmt::time::UtcTime;
    use tracing_subscriber::layer::SubscriberExt;

    use tracing_subscriber::util::SubscriberInitExt;

    console_error_panic_hook::set_once();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_timer(UtcTime::rfc_3339())
        .with_writer(tracing_web::MakeConsoleWriter)
        .with_span_events(FmtSpan::ACTIVE);
    let perf_layer = tracing_web::performance_layer().with_details_from_fields(Pretty::default());

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(perf_layer)
        .try_init()
        .map_err(|e| LogError::TracingSubscriber(Box::new(e)))?;

    Ok(())
}

#[cfg(all(target_arch = "wasm32", not(feature = "dev-logging")))]
/// Release builds only install the panic hook; tracing events are dropped.
pub fn setup() -> Result<(), LogError> {
    console_error_panic_hook::set_once();
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
/// Setup the logging system for the application.
/// This function will install the [`color_eyre`] error reporting system
/// and the [`tracing-subscriber`] logging system.
/// It will also set the `RUST_LIB_BACKTRACE` environment variable to `1`
/// and the `RUST_LOG` environment variable to `"palworld=debug,palworld_frontend=debug"`
/// if they are not already set.
/// If the color_eyre or tracing-subscriber installation fails,
/// an error will be returned.
pub fn setup() -> Result<(), LogError> {
    use tracing_subscriber::EnvFilter;

    // Get / set backtrace
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        unsafe { std::env::set_var("RUST_LIB_BACKTRACE", "1") }
    }
    // Install color_eyre
    color_eyre::install().map_err(|e| LogError::ColorEyre(e.to_string()))?;

    // Get/set the log level
    if std::env::var("RUST_LOG").is_err() {
        unsafe { std::env::set_var("RUST_LOG", "palworld=debug,palworld_frontend=debug") }
    }
    // Setup tracing and tracing-subscriber
    tracing_subscriber::fmt::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .map_err(LogError::TracingSubscriber)?;

    Ok(())
}
