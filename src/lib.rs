//! OAuth 1.0a request signing for the X API, plus the changelog, drafting, posting, timeline,
//! and release versioning helpers that publish a build-in-public journey site.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod changelog;
pub mod config;
pub mod draft;
pub mod error;
pub mod ext;
#[cfg(feature = "reqwest")] pub mod http;
#[cfg(feature = "reqwest")] pub mod llm;
pub mod oauth1;
pub mod obs;
#[cfg(feature = "reqwest")] pub mod poster;
#[cfg(feature = "reqwest")] pub mod publish;
pub mod timeline;
pub mod versions;

mod _prelude {
	pub use std::{
		collections::HashMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		path::{Path, PathBuf},
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(feature = "cli")] use {clap as _, color_eyre as _, tokio as _, tracing_subscriber as _};
#[cfg(test)] use {httpmock as _, proptest as _, tokio as _};
