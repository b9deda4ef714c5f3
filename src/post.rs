//! Defines the [`Post`] type and the logic for building one from a post
//! document. A [`Post`] is fully resolved when it's constructed: missing
//! frontmatter fields are replaced by defaults, the route is derived from the
//! file name, and the body has been rewritten and trimmed.

use crate::frontmatter::{self, Frontmatter};
use crate::markdown;
use crate::rewrite::{self, Rewrite};
use crate::route;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_yaml::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// The title given to posts whose frontmatter doesn't have one.
pub const NO_TITLE: &str = "No Title";

/// Formats with a UTC offset, e.g. Jekyll's `2013-04-09 21:36:05 -0700`.
const OFFSET_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f %z", "%Y-%m-%d %H:%M %z"];

/// Formats tried, in order, for frontmatter dates without an offset.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Settings shared by every post in a [`crate::blog::Blog`].
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Applied to each post body before it's trimmed.
    pub rewrite: Option<Rewrite>,
}

impl Options {
    /// Builds options that swap `image_prefix` for `image_new_prefix` in post
    /// bodies. Either being absent disables the rewrite.
    pub fn with_image_prefix(
        image_prefix: Option<&str>,
        image_new_prefix: Option<&str>,
    ) -> rewrite::Result<Options> {
        Ok(Options {
            rewrite: Rewrite::new(image_prefix, image_new_prefix)?,
        })
    }

    fn rewrite<'a>(&self, body: &'a str) -> Cow<'a, str> {
        match &self.rewrite {
            Some(rewrite) => rewrite.apply(body),
            None => Cow::Borrowed(body),
        }
    }
}

/// The source a [`Post`] is built from.
#[derive(Debug, Clone)]
pub enum Document<'a> {
    /// Unsplit document text; the frontmatter is split off and decoded.
    Raw(&'a str),

    /// A document whose frontmatter has already been decoded.
    Parsed {
        header: Frontmatter,
        body: &'a str,
    },
}

/// A single blog post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    file_name: String,
    title: String,
    date: Option<NaiveDateTime>,
    categories: Vec<String>,
    tags: Vec<String>,
    body: String,
    route: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    extra: BTreeMap<String, Value>,
}

impl Post {
    /// Builds a [`Post`]. `file_name` may be empty, in which case the post
    /// gets [`route::DEFAULT_ROUTE`]. Without a `document`, every field other
    /// than `file_name` and `route` takes its default.
    pub fn new(
        file_name: &str,
        document: Option<Document<'_>>,
        options: &Options,
    ) -> Result<Post> {
        let (frontmatter, body) = match document {
            None => (Frontmatter::default(), String::new()),
            Some(Document::Raw(text)) => {
                let split = frontmatter::split(text);
                let frontmatter = frontmatter::decode(split.header)
                    .map_err(|err| Error::from_frontmatter(file_name, err))?;
                (frontmatter, options.rewrite(split.body).trim().to_owned())
            }
            Some(Document::Parsed { header, body }) => {
                (header, options.rewrite(body).trim().to_owned())
            }
        };

        let Frontmatter {
            title,
            date,
            categories,
            tags,
            extra,
        } = frontmatter;

        Ok(Post {
            file_name: file_name.to_owned(),
            title: title
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| NO_TITLE.to_owned()),
            date: date.as_deref().and_then(parse_date),
            categories: categories.unwrap_or_default(),
            tags: tags.unwrap_or_default(),
            body,
            route: route::derive(file_name),
            extra,
        })
    }

    /// Parses a post from its file name and raw document text.
    pub fn parse(file_name: &str, input: &str, options: &Options) -> Result<Post> {
        Post::new(file_name, Some(Document::Raw(input)), options)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The publish date. Posts without one are left out of a
    /// [`crate::blog::Blog`].
    pub fn date(&self) -> Option<NaiveDateTime> {
        self.date
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    /// Frontmatter keys other than `title`, `date`, `categories` and `tags`.
    pub fn extra(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }

    /// Reports whether the body should be rendered as markdown, judging by
    /// the file name.
    pub fn is_markdown(&self) -> bool {
        markdown::is_markdown(&self.file_name)
    }

    /// The body as HTML if the post is markdown, otherwise the body as-is.
    pub fn html(&self) -> Cow<'_, str> {
        if self.is_markdown() {
            let mut html = String::new();
            markdown::to_html(&mut html, &self.body);
            Cow::Owned(html)
        } else {
            Cow::Borrowed(&self.body)
        }
    }
}

/// Parses a frontmatter date. Dates with an offset (RFC 3339 or
/// [`OFFSET_DATE_TIME_FORMATS`]) are converted to UTC; the other accepted
/// forms carry no offset. Returns [`None`] for anything unparsable.
pub fn parse_date(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    let with_offset = DateTime::parse_from_rfc3339(input).ok().or_else(|| {
        OFFSET_DATE_TIME_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(input, format).ok())
    });
    if let Some(date_time) = with_offset {
        return Some(date_time.naive_utc());
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Represents the result of a [`Post`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a [`Post`].
#[derive(Debug)]
pub enum Error {
    /// Returned when the frontmatter isn't valid YAML.
    DecodeHeader {
        file_name: String,
        err: serde_yaml::Error,
    },

    /// Returned when the frontmatter decodes to something other than a
    /// key-value mapping (typically prose above a stray fence).
    InvalidInputKind { file_name: String },
}

impl Error {
    fn from_frontmatter(file_name: &str, err: frontmatter::Error) -> Error {
        let file_name = file_name.to_owned();
        match err {
            frontmatter::Error::DeserializeYaml(err) => Error::DecodeHeader { file_name, err },
            frontmatter::Error::NotAMapping => Error::InvalidInputKind { file_name },
        }
    }

    /// The file name of the offending post.
    pub fn file_name(&self) -> &str {
        match self {
            Error::DecodeHeader { file_name, .. } => file_name,
            Error::InvalidInputKind { file_name } => file_name,
        }
    }
}

struct DisplayName<'a>(&'a str);

impl fmt::Display for DisplayName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            "" => write!(f, "<unnamed post>"),
            name => write!(f, "`{}`", name),
        }
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::DecodeHeader { file_name, err } => write!(
                f,
                "Decoding frontmatter of {}: {}",
                DisplayName(file_name),
                err
            ),
            Error::InvalidInputKind { file_name } => write!(
                f,
                "Parsing {}: Missing structured header object; expected a \
                 decoded document, not raw text",
                DisplayName(file_name)
            ),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::DecodeHeader { err, .. } => Some(err),
            Error::InvalidInputKind { .. } => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveTime;

    fn date_time(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDateTime::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            NaiveTime::from_hms_opt(h, min, 0).unwrap(),
        )
    }

    #[test]
    fn test_defaults() -> Result<()> {
        let post = Post::new("", None, &Options::default())?;
        assert_eq!(post.file_name(), "");
        assert_eq!(post.title(), NO_TITLE);
        assert_eq!(post.date(), None);
        assert!(post.categories().is_empty());
        assert!(post.tags().is_empty());
        assert_eq!(post.body(), "");
        assert_eq!(post.route(), route::DEFAULT_ROUTE);
        Ok(())
    }

    #[test]
    fn test_route_without_body() -> Result<()> {
        let post = Post::new(
            "2013-04-09-one-letter-repository-status-for-git-mercurial-subversion.markdown",
            None,
            &Options::default(),
        )?;
        assert_eq!(
            post.route(),
            "/2013/04/09/one-letter-repository-status-for-git-mercurial-subversion/"
        );
        Ok(())
    }

    #[test]
    fn test_full_header() -> Result<()> {
        let input = "---\n\
                     title: A Blog Post\n\
                     date: 2014-03-01 10:00\n\
                     categories: [Programming]\n\
                     tags: [testing, JavaScript]\n\
                     ---\n\
                     CONTENT\nHERE\n";
        let post = Post::parse("2014-03-01-a-blog-post.md", input, &Options::default())?;
        assert_eq!(post.title(), "A Blog Post");
        assert_eq!(post.date(), Some(date_time(2014, 3, 1, 10, 0)));
        assert_eq!(post.categories(), ["Programming"]);
        assert_eq!(post.tags(), ["testing", "JavaScript"]);
        assert_eq!(post.body(), "CONTENT\nHERE");
        assert_eq!(post.route(), "/2014/03/01/a-blog-post/");
        Ok(())
    }

    #[test]
    fn test_missing_and_empty_fields_take_defaults() -> Result<()> {
        let post = Post::parse(
            "post.md",
            "---\ntitle: ''\ncategories: []\n---\nbody",
            &Options::default(),
        )?;
        assert_eq!(post.title(), NO_TITLE);
        assert_eq!(post.date(), None);
        assert!(post.categories().is_empty());
        assert!(post.tags().is_empty());
        Ok(())
    }

    #[test]
    fn test_unparsable_date_is_absent() -> Result<()> {
        let post = Post::parse("x.md", "---\ndate: someday\n---\n", &Options::default())?;
        assert_eq!(post.date(), None);
        Ok(())
    }

    #[test]
    fn test_pre_decoded_document() -> Result<()> {
        let header = Frontmatter {
            title: Some("Decoded".to_owned()),
            date: Some("2014-03-01".to_owned()),
            ..Frontmatter::default()
        };
        let post = Post::new(
            "a.md",
            Some(Document::Parsed {
                header,
                body: "\n  body  \n",
            }),
            &Options::default(),
        )?;
        assert_eq!(post.title(), "Decoded");
        assert_eq!(post.date(), Some(date_time(2014, 3, 1, 0, 0)));
        assert_eq!(post.body(), "body");
        Ok(())
    }

    #[test]
    fn test_rewrite_applied_to_body() -> Result<()> {
        let options = Options::with_image_prefix(Some("/img/"), Some("https://cdn.example.com/img/"))
            .expect("valid pattern");
        let post = Post::parse("x.md", "---\ntitle: x\n---\n![a](/img/a.png)\n", &options)?;
        assert_eq!(post.body(), "![a](https://cdn.example.com/img/a.png)");
        Ok(())
    }

    #[test]
    fn test_unknown_keys_preserved() -> Result<()> {
        let post = Post::parse("x.md", "---\nlayout: post\n---\n", &Options::default())?;
        assert_eq!(
            post.extra().get("layout"),
            Some(&Value::String("post".to_owned()))
        );
        Ok(())
    }

    #[test]
    fn test_malformed_header() {
        match Post::parse("bad.md", "---\ntitle: [oops\n---\nbody", &Options::default()) {
            Err(err @ Error::DecodeHeader { .. }) => {
                assert_eq!(err.file_name(), "bad.md");
                assert!(err.to_string().starts_with("Decoding frontmatter of `bad.md`"));
            }
            other => panic!("expected a decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_prose_header() {
        assert!(matches!(
            Post::parse("prose.md", "Some prose\n---\nbody", &Options::default()),
            Err(Error::InvalidInputKind { .. })
        ));
    }

    #[test]
    fn test_html() -> Result<()> {
        let markdown = Post::parse("a.md", "---\n---\n*hi*", &Options::default())?;
        assert_eq!(markdown.html(), "<p><em>hi</em></p>\n");
        let plain = Post::parse("a.txt", "---\n---\n*hi*", &Options::default())?;
        assert_eq!(plain.html(), "*hi*");
        Ok(())
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2014-03-01 10:00"), Some(date_time(2014, 3, 1, 10, 0)));
        assert_eq!(parse_date("2013-04-09 21:36:05").map(|d| d.time()), NaiveTime::from_hms_opt(21, 36, 5));
        assert_eq!(parse_date("2014-03-01T10:00"), Some(date_time(2014, 3, 1, 10, 0)));
        assert_eq!(parse_date("2014-03-01T12:00:00+02:00"), Some(date_time(2014, 3, 1, 10, 0)));
        assert_eq!(parse_date("2014-03-01"), Some(date_time(2014, 3, 1, 0, 0)));
        assert_eq!(
            parse_date("2013-04-09 21:36:05 -0700"),
            NaiveDate::from_ymd_opt(2013, 4, 10).and_then(|d| d.and_hms_opt(4, 36, 5))
        );
        assert_eq!(parse_date("2013-04-09 21:36 +0100"), Some(date_time(2013, 4, 9, 20, 36)));
        assert_eq!(parse_date("2014-13-01"), None);
        assert_eq!(parse_date(""), None);
    }
}
