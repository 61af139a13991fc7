//! Venue deletion
//!
//! Handles a "delete venue" activation: read the venue id from the event
//! target, send `DELETE /venues/{id}` to the site origin, and on success
//! replace the current navigation entry with the origin root.
//!
//! # Example
//!
//! ```no_run
//! use venue_tools::venue::{DeleteAction, DeleteConfig, DeleteEvent, HttpTransport, Location, Navigator};
//! use reqwest::Url;
//!
//! struct Log;
//! impl Navigator for Log {
//!     fn replace(&mut self, url: &Url) {
//!         println!("-> {}", url);
//!     }
//! }
//!
//! # async fn run() -> venue_tools::Result<()> {
//! let action = DeleteAction::new(
//!     Location::parse("http://localhost:5000")?,
//!     DeleteConfig::default(),
//!     HttpTransport::new(None)?,
//! );
//! action.handle(&DeleteEvent::for_venue("42"), &mut Log).await?;
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Dataset key holding the venue identifier (`data-id` in markup)
pub const ID_KEY: &str = "id";

/// Path prefix venues are deleted under
pub const DEFAULT_RESOURCE_PATH: &str = "/venues";

/// The element an activation event was dispatched to, reduced to its dataset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventTarget {
    dataset: BTreeMap<String, String>,
}

impl EventTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `data-*` attribute (key without the `data-` prefix)
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.dataset.insert(key.into(), value.into());
        self
    }

    pub fn data(&self, key: &str) -> Option<&str> {
        self.dataset.get(key).map(String::as_str)
    }
}

/// A click or activation on a "delete venue" control
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteEvent {
    pub target: EventTarget,
}

impl DeleteEvent {
    pub fn new(target: EventTarget) -> Self {
        Self { target }
    }

    /// Event on an element carrying `data-id="{id}"`
    pub fn for_venue(id: impl Into<String>) -> Self {
        Self::new(EventTarget::new().with_data(ID_KEY, id))
    }

    /// The venue identifier, or `MissingIdentifier` if absent or blank
    pub fn venue_id(&self) -> Result<&str> {
        match self.target.data(ID_KEY).map(str::trim) {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(Error::MissingIdentifier),
        }
    }
}

/// Scheme used for the post-delete navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedirectScheme {
    /// Use whatever scheme the page was loaded over
    #[default]
    MatchPage,
    /// Always navigate to `http://`, even from an https page
    ForceHttp,
}

/// The page origin requests and navigations are resolved against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    scheme: String,
    /// Host name plus `:port` when the port is not the scheme default
    host: String,
}

impl Location {
    /// Parse an origin such as `http://localhost:5000`
    ///
    /// Any path, query or fragment on the input is ignored.
    pub fn parse(origin: &str) -> Result<Self> {
        let url = Url::parse(origin)
            .map_err(|e| Error::InvalidOrigin(format!("{}: {}", origin, e)))?;
        Self::from_url(&url)
    }

    pub fn from_url(url: &Url) -> Result<Self> {
        let host = url
            .host_str()
            .ok_or_else(|| Error::InvalidOrigin(format!("{} has no host", url)))?;
        let host = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        Ok(Self { scheme: url.scheme().to_string(), host })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// URL of a single resource: `{origin}{prefix}/{id}`
    ///
    /// The id is pushed as one path segment, so reserved characters in it are
    /// percent-encoded rather than interpreted.
    pub fn resource_url(&self, prefix: &str, id: &str) -> Result<Url> {
        let mut url = self.url_with_scheme(&self.scheme)?;
        url.path_segments_mut()
            .map_err(|_| Error::InvalidOrigin(format!("{} cannot carry a path", self)))?
            .clear()
            .extend(prefix.split('/').filter(|segment| !segment.is_empty()))
            .push(id);
        Ok(url)
    }

    /// Root of the origin, `{scheme}://{host}/`
    pub fn root(&self, redirect: RedirectScheme) -> Result<Url> {
        match redirect {
            RedirectScheme::MatchPage => self.url_with_scheme(&self.scheme),
            RedirectScheme::ForceHttp => self.url_with_scheme("http"),
        }
    }

    fn url_with_scheme(&self, scheme: &str) -> Result<Url> {
        let raw = format!("{}://{}/", scheme, self.host);
        Url::parse(&raw).map_err(|e| Error::InvalidOrigin(format!("{}: {}", raw, e)))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)
    }
}

/// Options for a delete action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfig {
    /// Path prefix the venue id is appended to
    pub resource_path: String,
    /// Scheme for the post-delete navigation
    pub redirect_scheme: RedirectScheme,
    /// Longest wait for a response; `None` leaves it to the transport
    pub timeout: Option<Duration>,
}

impl Default for DeleteConfig {
    fn default() -> Self {
        Self {
            resource_path: DEFAULT_RESOURCE_PATH.to_string(),
            redirect_scheme: RedirectScheme::default(),
            timeout: None,
        }
    }
}

/// Sends the DELETE request
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue `DELETE url` with no body and return the response status code.
    /// A request that never produces a response is `RequestFailed`.
    async fn delete(&self, url: &Url) -> Result<u16>;
}

/// Replaces the current navigation entry
pub trait Navigator {
    fn replace(&mut self, url: &Url);
}

/// `Transport` backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self { client: builder.build()? })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn delete(&self, url: &Url) -> Result<u16> {
        let res = self
            .client
            .delete(url.clone())
            .send()
            .await
            .map_err(|e| Error::RequestFailed { url: url.to_string(), reason: describe(&e) })?;
        Ok(res.status().as_u16())
    }
}

/// reqwest's top-level message plus every underlying cause
fn describe(err: &reqwest::Error) -> String {
    let mut reason = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        reason.push_str(": ");
        reason.push_str(&cause.to_string());
        source = cause.source();
    }
    reason
}

/// Deletes venues against one origin
#[derive(Debug, Clone)]
pub struct DeleteAction<T> {
    location: Location,
    config: DeleteConfig,
    transport: T,
}

impl<T: Transport> DeleteAction<T> {
    pub fn new(location: Location, config: DeleteConfig, transport: T) -> Self {
        Self { location, config, transport }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn config(&self) -> &DeleteConfig {
        &self.config
    }

    /// Delete the venue named by `event` and navigate to the origin root
    ///
    /// Returns the navigation target. On any error no navigation happens;
    /// a missing identifier also means no request is sent.
    pub async fn handle<N: Navigator + ?Sized>(&self, event: &DeleteEvent, navigator: &mut N) -> Result<Url> {
        let id = event.venue_id()?;
        let url = self.location.resource_url(&self.config.resource_path, id)?;

        debug!(%url, "deleting venue {}", id);
        let request = self.transport.delete(&url);
        let response = match self.config.timeout {
            Some(limit) => timeout(limit, request).await.unwrap_or_else(|_| {
                Err(Error::RequestFailed {
                    url: url.to_string(),
                    reason: format!("no response within {:?}", limit),
                })
            }),
            None => request.await,
        };
        let status = match response {
            Ok(status) => status,
            Err(err) => {
                warn!(%url, "venue deletion failed: {}", err);
                return Err(err);
            }
        };

        if !(200..300).contains(&status) {
            warn!(%url, status, "venue deletion rejected by server");
            return Err(Error::RequestFailed {
                url: url.to_string(),
                reason: format!("server responded with status {}", status),
            });
        }

        let target = self.location.root(self.config.redirect_scheme)?;
        debug!(%target, "venue {} deleted, navigating to site root", id);
        navigator.replace(&target);
        Ok(target)
    }
}
