//! # modeldesk
//!
//! A schema-driven admin console engine. The server declares each model as a
//! list of field schemas; modeldesk derives everything else from it: list
//! columns, filters, sorting, pagination, cell rendering, form layout,
//! validation and the minimal update payload.
//!
//! ## Feature Flags
//!
//! - `minimal` - Derivation engine and wire types only
//! - `client` - HTTP client for the console REST API
//! - `ui` - Stateful view containers (list, editor, session, upload)
//! - `conf` - Layered settings (defaults, TOML file, environment)
//! - `logging` - `tracing-subscriber` initialization
//! - `full` (default) - All of the above
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "full")]
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use modeldesk::prelude::*;
//!
//! let settings = ConsoleSettings::load(None)?;
//! modeldesk::init_logging(&settings)?;
//!
//! let ctx = modeldesk::build_context(&settings)?;
//! let list = ctx.model_list();
//! list.mount(SearchParams::parse("?name=user&page=2")).await?;
//! for row in list.rows() {
//! 	println!("{}", row.key);
//! }
//! # Ok(())
//! # }
//! ```

#[cfg(all(feature = "ui", feature = "conf"))]
mod app;
#[cfg(feature = "logging")]
pub mod logging;

pub use modeldesk_core as core;
pub use modeldesk_types as types;

#[cfg(feature = "client")]
pub use modeldesk_client as client;
#[cfg(feature = "conf")]
pub use modeldesk_conf as conf;
#[cfg(feature = "ui")]
pub use modeldesk_ui as ui;

#[cfg(all(feature = "ui", feature = "conf"))]
pub use app::{build_context, preferences_for};
#[cfg(feature = "logging")]
pub use logging::{LoggingError, init_logging};

pub use modeldesk_types::{ConsoleError, ConsoleResult, HttpError, ValidationErrors};

/// Commonly used types
pub mod prelude {
	pub use modeldesk_core::{
		CountState, FormMode, PageItem, Pagination, Permissions, SearchParams, ViewOptionStore,
	};
	pub use modeldesk_types::{
		Category, ConsoleError, ConsoleResult, HttpError, Item, ItemRef, Schema, SchemaView, User,
	};

	#[cfg(feature = "client")]
	pub use modeldesk_client::{ConsoleApi, HttpApi, HttpApiConfig, UploadFile};
	#[cfg(feature = "conf")]
	pub use modeldesk_conf::{ConsoleSettings, SettingsBuilder};
	#[cfg(feature = "ui")]
	pub use modeldesk_ui::{
		AppContext, DisplayState, EditorState, ModelListState, NoticeLevel, SessionState, SubmitOutcome,
		UploadState,
	};
}
