//! Crate-level error types shared by the signer, the poster, and the drafting collaborators.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; raised before any network call.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Remote service answered with a non-success status.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// Remote service answered successfully but the payload could not be understood.
	#[error(transparent)]
	Response(#[from] ResponseError),

	/// Repository could not be described or a release tag could not be resolved.
	#[cfg(feature = "git")]
	#[error(transparent)]
	Git(#[from] git2::Error),

	/// Local file could not be read or written.
	#[error("I/O error on {}.", path.display())]
	Io {
		/// File the operation targeted.
		path: PathBuf,
		/// Underlying I/O failure.
		#[source]
		source: std::io::Error,
	},
}
impl Error {
	/// Wraps an I/O failure with the path it happened on.
	pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::Io { path: path.into(), source }
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Required secret or environment value is absent or empty.
	#[error("Missing required secret `{key}`.")]
	MissingSecret {
		/// Lookup key (environment variable name for [`crate::config::EnvSecrets`]).
		key: String,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Endpoint or source URL cannot be parsed.
	#[error("URL `{url}` is invalid.")]
	InvalidUrl {
		/// Offending input.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Signed endpoints must not carry a query string; it would be signed twice or not at all.
	#[error("Endpoint `{url}` must not carry a query string.")]
	QueryInEndpoint {
		/// Offending endpoint.
		url: String,
	},
	/// Signed endpoints must not carry a fragment; it is dropped on the wire but not when signing.
	#[error("Endpoint `{url}` must not carry a fragment.")]
	FragmentInEndpoint {
		/// Offending endpoint.
		url: String,
	},
	/// HTML template lacks the marker that receives rendered content.
	#[error("Template is missing the `{marker}` marker.")]
	MissingPlaceholder {
		/// Marker that was expected.
		marker: &'static str,
	},
	/// `package.json` is not a JSON object.
	#[error("Package manifest is malformed.")]
	InvalidManifest {
		/// Underlying parsing failure.
		#[source]
		source: serde_json::Error,
	},
	/// Changelog sources file could not be parsed.
	#[error("Changelog sources are malformed.")]
	InvalidSources {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	/// Builds a [`ConfigError::MissingSecret`] for the provided key.
	pub fn missing_secret(key: impl Into<String>) -> Self {
		Self::MissingSecret { key: key.into() }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {service}.")]
	Network {
		/// Remote service label (`x`, `anthropic`, `changelog`).
		service: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		service: &'static str,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { service, source: Box::new(src) }
	}
}

/// Non-success HTTP answer from a remote service; the body is kept for manual diagnosis.
#[derive(Debug, ThisError)]
#[error("{service} API error ({status}): {body}")]
pub struct ApiError {
	/// Remote service label.
	pub service: &'static str,
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: String,
}

/// Successful answers whose payload does not match the expected shape.
#[derive(Debug, ThisError)]
pub enum ResponseError {
	/// Payload is not the JSON document the caller expected.
	#[error("{service} returned malformed JSON.")]
	Malformed {
		/// Remote service label.
		service: &'static str,
		/// Raw payload, kept for manual inspection.
		raw: String,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl ResponseError {
	/// Returns the raw payload that failed to parse.
	pub fn raw(&self) -> &str {
		match self {
			Self::Malformed { raw, .. } => raw,
		}
	}

	/// Replaces the kept payload, e.g. with the full reply a parsed fragment was cut from.
	pub fn with_raw(self, full: &str) -> Self {
		match self {
			Self::Malformed { service, source, .. } =>
				Self::Malformed { service, raw: full.to_owned(), source },
		}
	}
}

/// Deserializes `raw` as JSON, keeping the raw payload and the failing path on error.
pub(crate) fn parse_json<T>(service: &'static str, raw: &str) -> Result<T, ResponseError>
where
	T: serde::de::DeserializeOwned,
{
	let mut de = serde_json::Deserializer::from_str(raw);

	serde_path_to_error::deserialize(&mut de).map_err(|source| ResponseError::Malformed {
		service,
		raw: raw.to_owned(),
		source,
	})
}
