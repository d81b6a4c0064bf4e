//! Reqwest transport shared by the poster, the messages client, and changelog fetching.
//!
//! [`ReqwestHttpClient`] keeps shared HTTP behavior in one place and [`send`] classifies
//! every response the same way: transport failures become [`TransportError`], non-success
//! statuses become [`ApiError`] carrying the raw body, and success hands the body back as text.

// std
use std::{ops::Deref, time::Duration};
// crates.io
use reqwest::{RequestBuilder, header::AUTHORIZATION, redirect::Policy};
// self
use crate::{
	_prelude::*,
	error::{ApiError, ConfigError, TransportError},
	ext::RequestSignerExt,
	oauth1::RequestSigner,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Signed requests must not follow redirects: the signature covers the requested URL, so a
/// redirected request would reach the new host with a header that no longer matches.
/// Configure any custom [`ReqwestClient`] passed to [`ReqwestHttpClient::with_client`] the
/// same way.
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Builds the default client: no redirects, 30 second timeout.
	pub fn new() -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.redirect(Policy::none())
			.timeout(DEFAULT_TIMEOUT)
			.user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
			.build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl RequestSignerExt<RequestBuilder, Error> for RequestSigner {
	fn attach_authorization(
		&self,
		request: RequestBuilder,
		method: &str,
		url: &Url,
	) -> Result<RequestBuilder> {
		crate::config::check_signable(url)?;

		Ok(request.header(AUTHORIZATION, self.authorize(method, url.as_str())))
	}
}

/// Sends `request` and returns the body of a successful response.
pub async fn send(service: &'static str, request: RequestBuilder) -> Result<String> {
	let response = request.send().await.map_err(|e| TransportError::network(service, e))?;
	let status = response.status();
	let body = response.text().await.map_err(|e| TransportError::network(service, e))?;

	if !status.is_success() {
		return Err(ApiError { service, status: status.as_u16(), body }.into());
	}

	Ok(body)
}
