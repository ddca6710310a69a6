//! Page transports: how endpoints turn a URL into page text.
//!
//! Endpoints only see the [`Fetch`] trait. [`HttpTransport`] talks to the
//! live site; [`LocalTransport`] serves previously saved pages from disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use percent_encoding::percent_decode_str;
use reqwest::blocking::Client;
use understat_core::AppConfig;

use crate::error::FetchError;

/// Blocking source of page text.
pub trait Fetch {
    /// Returns the body of the page at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the page cannot be obtained. Callers treat
    /// the error as opaque and pass it on unchanged.
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

impl<T: Fetch + ?Sized> Fetch for &T {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url)
    }
}

impl<T: Fetch + ?Sized> Fetch for Arc<T> {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url)
    }
}

impl<T: Fetch + ?Sized> Fetch for Box<T> {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url)
    }
}

/// HTTP transport backed by a blocking `reqwest` client.
///
/// Does not retry: a non-2xx status or a timeout is returned to the caller.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with the given request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest` client
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// # Errors
    ///
    /// See [`HttpTransport::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        Self::new(config.request_timeout_secs, &config.user_agent)
    }
}

impl Fetch for HttpTransport {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!(url, "fetching page");
        let response = self.client.get(url).send()?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.text()?)
    }
}

/// Serves saved pages from a directory instead of the network.
///
/// A URL below `base_url` maps to `<root>/<path>.html`, with path segments
/// percent-decoded: `https://understat.com/team/Aston%20Villa/2019` is read
/// from `<root>/team/Aston Villa/2019.html`.
#[derive(Debug, Clone)]
pub struct LocalTransport {
    base_url: String,
    root: PathBuf,
}

impl LocalTransport {
    pub fn new(base_url: &str, root: impl Into<PathBuf>) -> Self {
        Self {
            base_url: format!("{}/", base_url.trim_end_matches('/')),
            root: root.into(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `url` to the file that holds its saved page.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::OutsideBase`] if `url` is not below the base
    /// URL or tries to escape the root directory.
    pub fn page_path(&self, url: &str) -> Result<PathBuf, FetchError> {
        let outside = || FetchError::OutsideBase {
            url: url.to_owned(),
            base_url: self.base_url.clone(),
        };

        let relative = url
            .strip_prefix(&self.base_url)
            .ok_or_else(outside)?
            .trim_matches('/');
        if relative.is_empty() {
            return Err(outside());
        }

        let mut segments = Vec::new();
        for segment in relative.split('/') {
            let decoded = percent_decode_str(segment).decode_utf8_lossy();
            if decoded.is_empty() || decoded == "." || decoded == ".." || decoded.contains('/') {
                return Err(outside());
            }
            segments.push(decoded.into_owned());
        }

        let mut path = self.root.clone();
        if let Some((last, parents)) = segments.split_last() {
            path.extend(parents);
            path.push(format!("{last}.html"));
        }
        Ok(path)
    }
}

impl Fetch for LocalTransport {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let path = self.page_path(url)?;
        tracing::debug!(url, path = %path.display(), "reading saved page");
        std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                FetchError::NotFound {
                    url: url.to_owned(),
                }
            } else {
                FetchError::Io { path, source }
            }
        })
    }
}
