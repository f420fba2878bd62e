use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber writing to stderr.
///
/// Stdout is reserved for command output, so every layer targets stderr.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "happyart_sync_load_total",
            Unit::Count,
            "Collection loads, labelled by resulting backend mode."
        );
        describe_counter!(
            "happyart_sync_fallback_total",
            Unit::Count,
            "Loads that fell back to the built-in dataset."
        );
        describe_counter!(
            "happyart_settings_fallback_total",
            Unit::Count,
            "Settings loads that fell back to the built-in values."
        );
        describe_counter!(
            "happyart_mutation_total",
            Unit::Count,
            "Content mutations, labelled by kind, action and outcome."
        );
        describe_counter!(
            "happyart_upload_total",
            Unit::Count,
            "Image uploads, labelled by outcome."
        );
    });
}
