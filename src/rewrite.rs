//! Search-and-replace over post bodies. Useful for turning relative image
//! prefixes into absolute URLs on some server.

use regex::{NoExpand, Regex};
use std::borrow::Cow;
use std::fmt;

/// A compiled rewrite rule: every match of `pattern` is replaced with
/// `replacement`, which is inserted literally (`$1` is not expanded).
#[derive(Debug, Clone)]
pub struct Rewrite {
    pattern: Regex,
    replacement: String,
}

impl Rewrite {
    /// Compiles a rewrite rule. Returns `Ok(None)` unless both `search` and
    /// `replace` are present and non-empty.
    pub fn new(search: Option<&str>, replace: Option<&str>) -> Result<Option<Rewrite>> {
        match (search, replace) {
            (Some(search), Some(replace)) if !search.is_empty() && !replace.is_empty() => {
                Ok(Some(Rewrite {
                    pattern: Regex::new(search).map_err(|err| Error {
                        pattern: search.to_owned(),
                        err,
                    })?,
                    replacement: replace.to_owned(),
                }))
            }
            _ => Ok(None),
        }
    }

    /// Applies the rule to `content`.
    pub fn apply<'a>(&self, content: &'a str) -> Cow<'a, str> {
        self.pattern
            .replace_all(content, NoExpand(&self.replacement))
    }
}

/// Replaces every match of `search` in `content` with `replace`, returning
/// `content` unchanged if either is missing or empty.
pub fn search_and_replace<'a>(
    content: &'a str,
    search: Option<&str>,
    replace: Option<&str>,
) -> Result<Cow<'a, str>> {
    Ok(match Rewrite::new(search, replace)? {
        Some(rewrite) => rewrite.apply(content),
        None => Cow::Borrowed(content),
    })
}

/// The result of compiling a rewrite rule.
pub type Result<T> = std::result::Result<T, Error>;

/// Returned when the search text isn't a valid pattern.
#[derive(Debug)]
pub struct Error {
    pattern: String,
    err: regex::Error,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid search pattern `{}`: {}", self.pattern, self.err)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.err)
    }
}
