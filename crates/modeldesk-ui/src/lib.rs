//! # modeldesk-ui
//!
//! Stateful view containers for the modeldesk console.
//!
//! Each container keeps its observable state in `futures-signals`
//! [`Mutable`](futures_signals::signal::Mutable)s so any renderer can
//! subscribe to it, and drives the backend through the
//! [`ConsoleApi`](modeldesk_client::ConsoleApi) trait held by the
//! [`AppContext`].
//!
//! - [`ModelListState`]: list page of one model (schema, query, rows, count)
//! - [`EditorState`]: view/edit/create page of one record
//! - [`SessionState`]: current user, captcha, login and profile
//! - [`UploadState`]: file upload page
//!
//! Async operations return futures; callers decide where they run. A
//! response that arrives after a newer request of the same container was
//! issued is dropped.

pub mod context;
pub mod notifications;
pub mod state;

pub use context::AppContext;
pub use notifications::{Notice, NoticeLevel, Notifications};
pub use state::editor::{EditorState, SubmitOutcome, list_route};
pub use state::list::{DisplayState, ListPhase, ModelListState, RenderedRow};
pub use state::session::SessionState;
pub use state::upload::{Rejection, UploadState};
