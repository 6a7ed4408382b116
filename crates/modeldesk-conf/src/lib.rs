//! # modeldesk-conf
//!
//! Layered settings for the console: built-in defaults, an optional TOML
//! file, then `MODELDESK_`-prefixed environment variables.
//!
//! ## Example
//!
//! ```
//! use modeldesk_conf::{ConsoleSettings, EnvSource, SettingsBuilder};
//! use std::collections::HashMap;
//!
//! let env = HashMap::from([(
//! 	"MODELDESK_DEFAULT_PAGE_SIZE".to_string(),
//! 	"25".to_string(),
//! )]);
//! let settings: ConsoleSettings = SettingsBuilder::new()
//! 	.add_source(EnvSource::from_vars(env))
//! 	.build()
//! 	.unwrap();
//!
//! assert_eq!(settings.default_page_size, 25);
//! ```

pub mod settings;
pub mod sources;

pub use settings::{
	ConsoleSettings, DEFAULT_API_BASE_URL, DEFAULT_LOG_FILTER, ENV_PREFIX, SettingsBuilder,
	SettingsError,
};
pub use sources::{ConfigSource, DefaultSource, EnvSource, SourceError, TomlFileSource};
