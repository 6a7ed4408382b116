//! `reqwest` implementation of [`ConsoleApi`]

use crate::api::{CAPTCHA_HEADER, ConsoleApi, paths};
use crate::upload::{UPLOAD_FIELD, UploadFile};
use async_trait::async_trait;
use modeldesk_types::{
	Captcha, ConsoleError, ConsoleResult, CreateRequest, CreateResponse, HttpError, Item, ItemRef, ListParams,
	ListResponse, LoginRequest, LoginToken, ProfileUpdate, RegisterRequest, SchemaView, UpdateRequest,
	User,
};
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client configuration
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct HttpApiConfig {
	/// API base URL (e.g., "http://127.0.0.1:7001/api")
	pub base_url: String,

	/// Per-request timeout (default: 30 seconds)
	pub timeout: Duration,
}

impl HttpApiConfig {
	/// Create a new configuration
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into(),
			timeout: DEFAULT_TIMEOUT,
		}
	}

	/// Set the request timeout
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}
}

/// Error body returned by the server
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
	#[serde(default)]
	message: Option<String>,
	#[serde(default)]
	category: Option<String>,
	#[serde(default)]
	code: Option<String>,
	#[serde(default)]
	exception: bool,
}

fn transport_error(err: reqwest::Error) -> HttpError {
	let message = if err.is_timeout() {
		"Request timed out".to_string()
	} else if err.is_decode() {
		format!("Failed to parse response: {}", err)
	} else {
		format!("Request failed: {}", err)
	};
	let mut error = HttpError::exception(message);
	if let Some(status) = err.status() {
		error.status = status.as_u16();
	}
	error
}

/// Console API over HTTP
///
/// The session cookie set by `/users/login` is kept in the client's cookie
/// store and sent with every later request.
#[derive(Debug, Clone)]
pub struct HttpApi {
	config: HttpApiConfig,
	client: reqwest::Client,
}

impl HttpApi {
	/// Create a new client
	///
	/// Fails when `base_url` is not an absolute URL.
	pub fn new(config: HttpApiConfig) -> ConsoleResult<Self> {
		url::Url::parse(&config.base_url).map_err(|e| {
			ConsoleError::InvalidInput(format!("invalid API base URL `{}`: {}", config.base_url, e))
		})?;
		let client = reqwest::Client::builder()
			.timeout(config.timeout)
			.cookie_store(true)
			.build()
			.map_err(|e| HttpError::exception(format!("Failed to create client: {}", e)))?;

		Ok(Self { config, client })
	}

	pub fn config(&self) -> &HttpApiConfig {
		&self.config
	}

	fn build_url(&self, path: &str) -> String {
		format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
	}

	fn request(&self, method: Method, path: &str) -> RequestBuilder {
		let url = self.build_url(path);
		tracing::debug!(method = %method, url = %url, "console api request");
		self.client.request(method, url)
	}

	async fn execute(&self, request: RequestBuilder) -> ConsoleResult<Response> {
		let response = request.send().await.map_err(transport_error)?;
		let status = response.status();
		if status.is_success() {
			return Ok(response);
		}

		let text = response.text().await.unwrap_or_default();
		let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
		let message = body
			.message
			.filter(|m| !m.is_empty())
			.or_else(|| Some(text.trim().to_string()).filter(|t| !t.is_empty()))
			.unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
		tracing::debug!(status = status.as_u16(), message = %message, "console api error");

		Err(HttpError {
			status: status.as_u16(),
			message,
			category: body.category,
			code: body.code,
			exception: body.exception,
		}
		.into())
	}

	async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> ConsoleResult<T> {
		let response = self.execute(request).await?;
		response
			.json()
			.await
			.map_err(|e| transport_error(e).into())
	}

	async fn send(&self, request: RequestBuilder) -> ConsoleResult<()> {
		self.execute(request).await.map(|_| ())
	}
}

#[async_trait]
impl ConsoleApi for HttpApi {
	async fn schema(&self, model: &str) -> ConsoleResult<SchemaView> {
		self.fetch(self.request(Method::GET, paths::MODEL_SCHEMA).query(&[("name", model)]))
			.await
	}

	async fn list(&self, params: &ListParams) -> ConsoleResult<ListResponse> {
		self.fetch(self.request(Method::GET, paths::MODEL_LIST).query(params))
			.await
	}

	async fn detail(&self, item: &ItemRef) -> ConsoleResult<Item> {
		self.fetch(self.request(Method::GET, paths::MODEL_DETAIL).query(item))
			.await
	}

	async fn update(&self, request: &UpdateRequest) -> ConsoleResult<()> {
		self.send(self.request(Method::PATCH, paths::MODEL_UPDATE).json(request))
			.await
	}

	async fn create(&self, request: &CreateRequest) -> ConsoleResult<CreateResponse> {
		self.fetch(self.request(Method::POST, paths::MODEL_CREATE).json(request))
			.await
	}

	async fn delete(&self, item: &ItemRef) -> ConsoleResult<()> {
		self.send(self.request(Method::DELETE, paths::MODEL_DELETE).query(item))
			.await
	}

	async fn captcha(&self, theme: Option<&str>) -> ConsoleResult<Captcha> {
		let mut request = self.request(Method::GET, paths::COMMON_CAPTCHA);
		if let Some(theme) = theme {
			request = request.query(&[("theme", theme)]);
		}
		self.fetch(request).await
	}

	async fn me(&self) -> ConsoleResult<User> {
		self.fetch(self.request(Method::GET, paths::USER_ME)).await
	}

	async fn login_token(&self) -> ConsoleResult<LoginToken> {
		self.fetch(self.request(Method::GET, paths::USER_LOGIN_TOKEN))
			.await
	}

	async fn login(&self, request: &LoginRequest, captcha: &str) -> ConsoleResult<User> {
		self.fetch(
			self.request(Method::POST, paths::USER_LOGIN)
				.header(CAPTCHA_HEADER, captcha)
				.json(request),
		)
		.await
	}

	async fn logout(&self) -> ConsoleResult<()> {
		self.send(self.request(Method::DELETE, paths::USER_LOGOUT))
			.await
	}

	async fn refresh(&self) -> ConsoleResult<()> {
		self.send(self.request(Method::PATCH, paths::USER_REFRESH))
			.await
	}

	async fn update_profile(&self, update: &ProfileUpdate) -> ConsoleResult<()> {
		self.send(self.request(Method::PATCH, paths::USER_PROFILE).json(update))
			.await
	}

	async fn register(&self, request: &RegisterRequest) -> ConsoleResult<()> {
		self.send(self.request(Method::POST, paths::USER_REGISTER).json(request))
			.await
	}

	async fn upload(&self, group: &str, files: Vec<UploadFile>) -> ConsoleResult<()> {
		let mut form = reqwest::multipart::Form::new();
		for file in files {
			let mut part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.name);
			if let Some(content_type) = &file.content_type {
				part = part.mime_str(content_type).map_err(transport_error)?;
			}
			form = form.part(UPLOAD_FIELD, part);
		}
		self.send(
			self.request(Method::POST, paths::FILE_UPLOAD)
				.query(&[("group", group)])
				.multipart(form),
		)
		.await
	}
}
