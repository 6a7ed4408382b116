//! Global `tracing` subscriber setup

use modeldesk_conf::ConsoleSettings;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

#[derive(Debug, Error)]
pub enum LoggingError {
	#[error("Invalid log filter `{directives}`: {source}")]
	Filter {
		directives: String,
		#[source]
		source: ParseError,
	},

	#[error("Failed to install subscriber: {0}")]
	Init(#[from] TryInitError),
}

/// Filter from `RUST_LOG` when it is set and parses, else from `fallback`
pub fn build_filter(fallback: &str, rust_log: Option<&str>) -> Result<EnvFilter, LoggingError> {
	if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty())
		&& let Ok(filter) = EnvFilter::try_new(directives)
	{
		return Ok(filter);
	}
	EnvFilter::try_new(fallback).map_err(|source| LoggingError::Filter {
		directives: fallback.to_string(),
		source,
	})
}

/// Installs a formatting subscriber filtered by `settings.log_filter`
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(settings: &ConsoleSettings) -> Result<(), LoggingError> {
	let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
	let filter = build_filter(&settings.log_filter, rust_log.as_deref())?;
	tracing_subscriber::registry()
		.with(filter)
		.with(tracing_subscriber::fmt::layer())
		.try_init()?;
	Ok(())
}
