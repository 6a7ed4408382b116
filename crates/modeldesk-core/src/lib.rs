//! # modeldesk-core
//!
//! The pure derivation engine of the modeldesk console. Given the schema
//! view the server declares for a model, it derives every render descriptor
//! a view layer needs, without touching the network:
//!
//! - [`schema`]: sort fields, filter conditions, visible columns, display keys
//! - [`view_options`]: remembered per-model preferences and their storage
//! - [`query`]: URL/preference query derivation, sort toggling, count caching
//! - [`pagination`]: page windows
//! - [`cell`]: table cell rendering
//! - [`form`]: form layout, validation, dirty tracking and submit planning
//! - [`gate`]: role/group authorization
//! - [`action`]: the per-action `Idle → InFlight → Idle | Failed` machine

pub mod action;
pub mod cell;
pub mod form;
pub mod gate;
pub mod pagination;
pub mod query;
pub mod schema;
pub mod view_options;

pub use action::{ActionGuard, ActionState, ActionTicket};
pub use cell::{CellView, RenderedCell, StyleHint, render_cell};
pub use form::{FormLayout, FormMode, FormState, FormValidator, SubmitPlan, prepare_submit};
pub use gate::{Permissions, allow};
pub use pagination::{PageItem, Pagination};
pub use query::{CountCache, CountState, QueryState, SearchParams, SortDirection, toggle_sort};
pub use view_options::{
	FilePreferences, MemoryPreferences, ModelViewOptions, PreferenceBackend, PreferenceError,
	ViewOptionStore,
};
