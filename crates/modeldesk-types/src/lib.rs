//! # modeldesk-types
//!
//! Shared type definitions for the modeldesk console.
//!
//! - [`models`]: the schema model served by `/models/schema` (fields,
//!   categories, filter conditions, access policies)
//! - [`session`]: user session, captcha and profile payloads
//! - [`requests`] / [`responses`]: request and response bodies of the REST API
//! - [`errors`]: the error taxonomy shared by every modeldesk crate

pub mod errors;
pub mod models;
pub mod requests;
pub mod responses;
pub mod session;

pub use errors::{ConsoleError, ConsoleResult, HttpError, ValidationErrors};
pub use models::{
	AccessPolicy, Category, Condition, ConditionCategory, Item, Schema, SchemaView, SelectOption,
	item_id,
};
pub use requests::{CreateRequest, ItemRef, ListParams, UpdateRequest};
pub use responses::{CreateResponse, ListResponse};
pub use session::{Captcha, LoginRequest, LoginToken, ProfileUpdate, RegisterRequest, User};
