//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Attach the diagnostic context to every emitted record
//! - Configure log level from config and environment
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - The context is read at format time, on the emitting thread
//! - `RUST_LOG` overrides the configured level

use std::fmt;

use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::{Format, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::mdc;
use crate::config::ObservabilityConfig;

/// Event formatter that prefixes each line with the current diagnostic context.
///
/// Output looks like `{id="3", request_id="9f2c..."} 2026-10-19T... DEBUG ...`.
/// Values are quoted and escaped so client-supplied text cannot break out of
/// the prefix or start a new line. Records emitted with an empty context are
/// passed through unchanged.
#[derive(Debug, Clone, Default)]
pub struct MdcFormat<F = Format> {
    inner: F,
}

impl<F> MdcFormat<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }
}

impl<S, N, F> FormatEvent<S, N> for MdcFormat<F>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
    F: FormatEvent<S, N>,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let context = mdc::snapshot();
        if !context.is_empty() {
            writer.write_str("{")?;
            for (i, (key, value)) in context.iter().enumerate() {
                if i > 0 {
                    writer.write_str(", ")?;
                }
                write!(writer, "{}={:?}", key, value)?;
            }
            writer.write_str("} ")?;
        }
        self.inner.format_event(ctx, writer, event)
    }
}

/// Install the global subscriber.
///
/// Fails if a global subscriber is already set.
pub fn init_logging(
    config: &ObservabilityConfig,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(config.ansi)
                .event_format(MdcFormat::new(Format::default())),
        )
        .try_init()
}

fn default_directives(level: &str) -> String {
    format!("{level},notes_service={level},tower_http=info")
}
