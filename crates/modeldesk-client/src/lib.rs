//! # modeldesk-client
//!
//! The REST API boundary of the modeldesk console.
//!
//! [`ConsoleApi`] lists every backend operation the console uses;
//! [`HttpApi`] implements it with `reqwest`, keeping the session in a cookie
//! store and normalizing every failure into an
//! [`HttpError`](modeldesk_types::HttpError).
//!
//! ## Example
//!
//! ```no_run
//! use modeldesk_client::{ConsoleApi, HttpApi, HttpApiConfig};
//!
//! # async fn example() -> modeldesk_types::ConsoleResult<()> {
//! let api = HttpApi::new(HttpApiConfig::new("http://127.0.0.1:7001/api"))?;
//! let view = api.schema("user").await?;
//! println!("{} fields", view.schemas.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod digest;
pub mod http;
pub mod upload;

pub use api::{CAPTCHA_HEADER, ConsoleApi, paths};
pub use digest::{login_digest, password_digest};
pub use http::{DEFAULT_TIMEOUT, HttpApi, HttpApiConfig};
pub use upload::{MAX_UPLOAD_FILE_SIZE, MAX_UPLOAD_FILES, UploadFile};
