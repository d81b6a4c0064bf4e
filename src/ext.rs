//! Request signing contract that lets callers attach OAuth 1.0a headers to arbitrary HTTP
//! clients.
//!
//! The crate implements it for `reqwest::RequestBuilder` (see [`crate::http`]); other client
//! builders only need [`crate::oauth1::RequestSigner::authorize`].

// self
use crate::_prelude::*;

/// Describes how to attach an OAuth 1.0a `Authorization` header to an outbound request without
/// constraining the HTTP client type.
pub trait RequestSignerExt<Request, Error>
where
	Self: Send + Sync,
{
	/// Consumes the provided request and injects an `Authorization` header signed for `method`
	/// and `url`.
	///
	/// `url` must be the request target without a query string.
	fn attach_authorization(
		&self,
		request: Request,
		method: &str,
		url: &Url,
	) -> Result<Request, Error>;
}
