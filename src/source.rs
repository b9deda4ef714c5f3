//! The post source: a remote repository whose files are listed and fetched
//! asynchronously. [`Repository`] is the seam, [`GitHub`] the implementation
//! backed by the GitHub contents API, and [`fetch_all`] the fan-out/join that
//! turns a listing into [`RawDocument`]s.

use crate::blog::RawDocument;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::future::try_join_all;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use std::fmt;
use tracing::{debug, info};
use url::Url;

/// An entry in a repository listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub path: String,
}

/// A fetched file. `content` has already been decoded from `encoding`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedEntry {
    pub name: String,
    pub path: String,
    pub content: String,
    pub encoding: Option<String>,
}

/// A remote file tree posts can be fetched from.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Lists the entries under `path`, in the repository's order. A path
    /// without entries yields an empty list.
    async fn list_entries(&self, path: &str) -> Result<Vec<Entry>>;

    /// Fetches a single file.
    async fn fetch_entry(&self, path: &str) -> Result<FetchedEntry>;
}

/// Lists `path` and fetches every entry concurrently. The documents come back
/// in listing order; any failed fetch fails the batch.
pub async fn fetch_all<R>(repository: &R, path: &str) -> Result<Vec<RawDocument>>
where
    R: Repository + ?Sized,
{
    let entries = repository.list_entries(path).await?;
    info!(count = entries.len(), path, "fetching posts");

    let fetched = try_join_all(
        entries
            .iter()
            .map(|entry| repository.fetch_entry(&entry.path)),
    )
    .await?;

    Ok(fetched
        .into_iter()
        .map(|entry| RawDocument::new(entry.name, entry.content))
        .collect())
}

/// A [`Repository`] backed by the GitHub contents API.
pub struct GitHub {
    client: reqwest::Client,
    api_url: Url,

    /// `owner/name` of the repository.
    repository: String,

    /// Optional access token; authenticated requests get a higher rate limit.
    token: Option<String>,
}

impl GitHub {
    pub const API_URL: &'static str = "https://api.github.com/";

    pub fn new(repository: &str, token: Option<&str>) -> Result<GitHub> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("bitesize/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Client)?;
        Ok(GitHub {
            client,
            // should never fail
            api_url: Url::parse(Self::API_URL).unwrap(),
            repository: repository.to_owned(),
            token: token.map(str::to_owned),
        })
    }

    /// Points the client at another API root, e.g., a GitHub Enterprise
    /// server. `api_url` should end in a trailing slash.
    pub fn with_api_url(mut self, api_url: Url) -> GitHub {
        self.api_url = api_url;
        self
    }

    /// Each segment of `path` is percent-encoded, so names containing `#` or
    /// `?` stay part of the path.
    fn contents_url(&self, path: &str) -> std::result::Result<Url, String> {
        let mut url = self
            .api_url
            .join(&format!("repos/{}/contents/", self.repository))
            .map_err(|e| e.to_string())?;
        let path = path.trim_matches('/');
        if !path.is_empty() {
            url.path_segments_mut()
                .map_err(|_| format!("`{}` can't be a base URL", self.api_url))?
                .pop_if_empty()
                .extend(path.split('/'));
        }
        Ok(url)
    }

    async fn get<T>(&self, path: &str) -> std::result::Result<T, String>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = self.contents_url(path)?;
        debug!(%url, "GET");
        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github.v3+json");
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("token {}", token));
        }
        request
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| e.to_string())?
            .json::<T>()
            .await
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl Repository for GitHub {
    async fn list_entries(&self, path: &str) -> Result<Vec<Entry>> {
        let listing: Option<Vec<ContentsItem>> =
            self.get(path).await.map_err(|message| Error::List {
                path: path.to_owned(),
                message,
            })?;
        Ok(files(listing.unwrap_or_default()))
    }

    async fn fetch_entry(&self, path: &str) -> Result<FetchedEntry> {
        let file: ContentsFile = self.get(path).await.map_err(|message| Error::Fetch {
            path: path.to_owned(),
            message,
        })?;
        file.decode().map_err(|message| Error::Fetch {
            path: path.to_owned(),
            message,
        })
    }
}

/// An item of a directory listing from the contents API.
#[derive(Debug, Deserialize)]
struct ContentsItem {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Keeps the files of a listing; directories and submodules can't be fetched
/// as posts.
fn files(items: Vec<ContentsItem>) -> Vec<Entry> {
    items
        .into_iter()
        .filter(|item| item.kind == "file")
        .map(|item| Entry {
            name: item.name,
            path: item.path,
        })
        .collect()
}

/// A single file from the contents API.
#[derive(Debug, Deserialize)]
struct ContentsFile {
    name: String,
    path: String,
    #[serde(default)]
    content: String,
    encoding: Option<String>,
}

impl ContentsFile {
    fn decode(self) -> std::result::Result<FetchedEntry, String> {
        let content = match self.encoding.as_deref() {
            Some("base64") => {
                // the API wraps base64 content at 60 columns
                let packed: String = self
                    .content
                    .chars()
                    .filter(|c| !c.is_ascii_whitespace())
                    .collect();
                let bytes = STANDARD
                    .decode(packed)
                    .map_err(|e| format!("decoding base64 content: {}", e))?;
                String::from_utf8(bytes).map_err(|e| format!("content is not UTF-8: {}", e))?
            }
            _ => self.content,
        };
        Ok(FetchedEntry {
            name: self.name,
            path: self.path,
            content,
            encoding: self.encoding,
        })
    }
}

/// The result of a repository operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error talking to the post source.
#[derive(Debug)]
pub enum Error {
    /// Returned when the HTTP client can't be built.
    Client(reqwest::Error),

    /// Returned when a listing fails.
    List { path: String, message: String },

    /// Returned when fetching (or decoding) a single file fails.
    Fetch { path: String, message: String },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Client(err) => write!(f, "Building HTTP client: {}", err),
            Error::List { message, .. } => {
                write!(f, "Can not retrieve posts: {}", message)
            }
            Error::Fetch { path, message } => {
                write!(f, "Can not retrieve post `{}`: {}", path, message)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Client(err) => Some(err),
            Error::List { .. } | Error::Fetch { .. } => None,
        }
    }
}
