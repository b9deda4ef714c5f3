//! Exports the [`build_blog`] function which stitches together the high-level
//! steps of a run: compiling the post [`Options`] from the [`Config`],
//! fetching every post document from the repository ([`crate::source`]), and
//! parsing the documents into a [`Blog`] ([`crate::blog`]).

use crate::blog::Blog;
use crate::config::Config;
use crate::post::{Error as ParseError, Options};
use crate::rewrite::Error as RewriteError;
use crate::source::{fetch_all, Error as SourceError, GitHub, Repository};
use std::fmt;
use tracing::info;

/// Builds the blog described by `config` from GitHub.
pub async fn build_blog(config: &Config) -> Result<Blog> {
    let github = GitHub::new(&config.repository, config.access_token.as_deref())?;
    build_blog_from(&github, config).await
}

/// Builds the blog described by `config` from any [`Repository`].
pub async fn build_blog_from<R>(repository: &R, config: &Config) -> Result<Blog>
where
    R: Repository + ?Sized,
{
    // Compile the rewrite before touching the network so a bad pattern fails
    // fast.
    let options: Options = config.options()?;

    let documents = fetch_all(repository, &config.post_path).await?;
    let blog = Blog::new(&documents, &options)?;
    info!(
        fetched = documents.len(),
        published = blog.len(),
        repository = %config.repository,
        "built blog"
    );
    Ok(blog)
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a blog. Errors can come from the configured
/// rewrite, the post source, or parsing.
#[derive(Debug)]
pub enum Error {
    /// Returned when the configured image prefix isn't a valid pattern.
    Rewrite(RewriteError),

    /// Returned when listing or fetching posts fails.
    Source(SourceError),

    /// Returned when a post can't be parsed.
    Parse(ParseError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Rewrite(err) => err.fmt(f),
            Error::Source(err) => err.fmt(f),
            Error::Parse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Rewrite(err) => Some(err),
            Error::Source(err) => Some(err),
            Error::Parse(err) => Some(err),
        }
    }
}

impl From<RewriteError> for Error {
    /// Converts [`RewriteError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: RewriteError) -> Error {
        Error::Rewrite(err)
    }
}

impl From<SourceError> for Error {
    /// Converts [`SourceError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: SourceError) -> Error {
        Error::Source(err)
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::source::{Entry, FetchedEntry};
    use async_trait::async_trait;

    /// Serves the files under `testdata/posts`.
    struct TestData;

    const POSTS: &[(&str, &str)] = &[
        (
            "2014-03-01-a-blog-post.md",
            include_str!("../testdata/posts/2014-03-01-a-blog-post.md"),
        ),
        (
            "2014-03-02-no-date.md",
            include_str!("../testdata/posts/2014-03-02-no-date.md"),
        ),
        (
            "2013-04-09-second-post.markdown",
            include_str!("../testdata/posts/2013-04-09-second-post.markdown"),
        ),
    ];

    #[async_trait]
    impl Repository for TestData {
        async fn list_entries(&self, path: &str) -> crate::source::Result<Vec<Entry>> {
            Ok(POSTS
                .iter()
                .map(|(name, _)| Entry {
                    name: name.to_string(),
                    path: format!("{}/{}", path, name),
                })
                .collect())
        }

        async fn fetch_entry(&self, path: &str) -> crate::source::Result<FetchedEntry> {
            let (name, content) = POSTS
                .iter()
                .find(|(name, _)| path.ends_with(name))
                .ok_or_else(|| SourceError::Fetch {
                    path: path.to_owned(),
                    message: "Not Found".to_owned(),
                })?;
            Ok(FetchedEntry {
                name: name.to_string(),
                path: path.to_owned(),
                content: content.to_string(),
                encoding: None,
            })
        }
    }

    fn config() -> Config {
        Config {
            repository: "octocat/blog".to_owned(),
            post_path: "_posts".to_owned(),
            access_token: None,
            image_prefix: Some("/images/".to_owned()),
            image_new_prefix: Some("https://cdn.example.com/".to_owned()),
        }
    }

    #[tokio::test]
    async fn test_build_blog_from() -> Result<()> {
        let blog = build_blog_from(&TestData, &config()).await?;
        let titles: Vec<&str> = blog.posts().iter().map(|p| p.title()).collect();
        assert_eq!(titles, ["A Blog Post", "Second Post"]);
        assert_eq!(blog.posts()[1].body(), "![status](https://cdn.example.com/status.png)");
        assert_eq!(blog.posts()[1].tags(), ["git"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_bad_pattern_fails_before_fetching() {
        let config = Config {
            image_prefix: Some("(".to_owned()),
            ..config()
        };
        assert!(matches!(
            build_blog_from(&TestData, &config).await,
            Err(Error::Rewrite(_))
        ));
    }
}
