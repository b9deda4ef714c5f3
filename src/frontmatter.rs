//! Splits raw post documents into their YAML frontmatter and markdown body,
//! and decodes the frontmatter into a [`Frontmatter`] value.
//!
//! A post document typically looks like this:
//!
//! ```md
//! ---
//! title: Hello, world!
//! date: 2014-03-01 10:00
//! tags: [greet]
//! ---
//! # Hello
//!
//! World
//! ```

use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fmt;

/// The fence separating the frontmatter from the body.
pub const FENCE: &str = "---";

/// A document split into its (trimmed) frontmatter and body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Split<'a> {
    pub header: &'a str,
    pub body: &'a str,
}

/// Splits `input` on [`FENCE`]. The leading fence is optional: a document
/// with a single fence is read as `header---body`. Anything after a third
/// fence is dropped, so bodies can't contain the fence themselves.
pub fn split(input: &str) -> Split<'_> {
    let segments: Vec<&str> = input.split(FENCE).take(3).collect();
    let (header, body) = match segments.as_slice() {
        [] => ("", ""),
        [body] => ("", *body),
        [header, body] => (*header, *body),
        [_, header, body, ..] => (*header, *body),
    };
    Split {
        header: header.trim(),
        body: body.trim(),
    }
}

/// The decoded frontmatter of a post. Every recognized field is optional;
/// [`crate::post::Post`] decides on the defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Frontmatter {
    /// The title of the post.
    #[serde(default, deserialize_with = "scalar")]
    pub title: Option<String>,

    /// The unparsed publish date of the post (e.g., `2014-03-01 10:00`).
    #[serde(default, deserialize_with = "scalar")]
    pub date: Option<String>,

    /// The categories of the post. A single string is read as a one-element
    /// list.
    #[serde(default, deserialize_with = "list")]
    pub categories: Option<Vec<String>>,

    /// The tags of the post, read the same way as `categories`.
    #[serde(default, deserialize_with = "list")]
    pub tags: Option<Vec<String>>,

    /// Keys we don't interpret.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Decodes frontmatter text. Empty (or whitespace-only) text decodes to the
/// default [`Frontmatter`], as does a YAML document that is just `null`.
pub fn decode(header: &str) -> Result<Frontmatter> {
    let header = header.trim();
    if header.is_empty() {
        return Ok(Frontmatter::default());
    }

    match serde_yaml::from_str::<Value>(header)? {
        Value::Null => Ok(Frontmatter::default()),
        value @ Value::Mapping(_) => Ok(serde_yaml::from_value(value)?),
        _ => Err(Error::NotAMapping),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn scalar<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => scalar_to_string(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom("expected a scalar value")),
    }
}

fn list<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Sequence(items) => items
            .iter()
            .map(|item| {
                scalar_to_string(item)
                    .ok_or_else(|| D::Error::custom("expected a list of scalar values"))
            })
            .collect::<std::result::Result<Vec<String>, D::Error>>()
            .map(Some),
        value => scalar_to_string(&value)
            .map(|s| Some(vec![s]))
            .ok_or_else(|| D::Error::custom("expected a scalar or a list of scalars")),
    }
}

/// The result of decoding frontmatter.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error decoding frontmatter.
#[derive(Debug)]
pub enum Error {
    /// Returned when the frontmatter isn't valid YAML (or has the wrong shape
    /// for one of the recognized fields).
    DeserializeYaml(serde_yaml::Error),

    /// Returned when the frontmatter is valid YAML but not a mapping, e.g.,
    /// plain text above the fence.
    NotAMapping,
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::NotAMapping => write!(f, "frontmatter is not a key-value mapping"),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::DeserializeYaml(err) => Some(err),
            Error::NotAMapping => None,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}
