//! The console REST API as a trait

use crate::upload::UploadFile;
use async_trait::async_trait;
use modeldesk_types::{
	Captcha, ConsoleResult, CreateRequest, CreateResponse, Item, ItemRef, ListParams, ListResponse,
	LoginRequest, LoginToken, ProfileUpdate, RegisterRequest, SchemaView, UpdateRequest, User,
};

/// Endpoint paths, relative to the API base URL
pub mod paths {
	pub const USER_ME: &str = "/users/me";
	pub const USER_REGISTER: &str = "/users/register";
	pub const USER_LOGIN: &str = "/users/login";
	pub const USER_LOGIN_TOKEN: &str = "/users/login/token";
	pub const USER_LOGOUT: &str = "/users/logout";
	pub const USER_REFRESH: &str = "/users/refresh";
	pub const USER_PROFILE: &str = "/users/profile";

	pub const COMMON_CAPTCHA: &str = "/commons/captcha";

	pub const MODEL_SCHEMA: &str = "/models/schema";
	pub const MODEL_LIST: &str = "/models/list";
	pub const MODEL_DETAIL: &str = "/models/detail";
	pub const MODEL_UPDATE: &str = "/models/update";
	pub const MODEL_CREATE: &str = "/models/create";
	pub const MODEL_DELETE: &str = "/models/delete";

	pub const FILE_UPLOAD: &str = "/files/upload";
}

/// Header carrying the captcha answer of a login
pub const CAPTCHA_HEADER: &str = "X-Captcha";

/// Operations of the console backend
///
/// Implemented over HTTP by [`HttpApi`](crate::HttpApi); state containers
/// only depend on this trait so tests can substitute a fake.
#[async_trait]
pub trait ConsoleApi: Send + Sync {
	/// `GET /models/schema?name=`
	async fn schema(&self, model: &str) -> ConsoleResult<SchemaView>;

	/// `GET /models/list`
	async fn list(&self, params: &ListParams) -> ConsoleResult<ListResponse>;

	/// `GET /models/detail?id=&model=`
	async fn detail(&self, item: &ItemRef) -> ConsoleResult<Item>;

	/// `PATCH /models/update`
	async fn update(&self, request: &UpdateRequest) -> ConsoleResult<()>;

	/// `POST /models/create`
	async fn create(&self, request: &CreateRequest) -> ConsoleResult<CreateResponse>;

	/// `DELETE /models/delete?id=&model=`
	async fn delete(&self, item: &ItemRef) -> ConsoleResult<()>;

	/// `GET /commons/captcha?theme=`
	async fn captcha(&self, theme: Option<&str>) -> ConsoleResult<Captcha>;

	/// `GET /users/me`
	async fn me(&self) -> ConsoleResult<User>;

	/// `GET /users/login/token`
	async fn login_token(&self) -> ConsoleResult<LoginToken>;

	/// `POST /users/login` with the captcha answer header
	async fn login(&self, request: &LoginRequest, captcha: &str) -> ConsoleResult<User>;

	/// `DELETE /users/logout`
	async fn logout(&self) -> ConsoleResult<()>;

	/// `PATCH /users/refresh`
	async fn refresh(&self) -> ConsoleResult<()>;

	/// `PATCH /users/profile`
	async fn update_profile(&self, update: &ProfileUpdate) -> ConsoleResult<()>;

	/// `POST /users/register`
	async fn register(&self, request: &RegisterRequest) -> ConsoleResult<()>;

	/// `POST /files/upload?group=` as multipart `files[]`
	async fn upload(&self, group: &str, files: Vec<UploadFile>) -> ConsoleResult<()>;
}
