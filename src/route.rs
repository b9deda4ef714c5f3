//! Derives a post's URL route from its file name. Post files are named
//! `YYYY-MM-DD-<slug>.<ext>`, and the route for such a file is
//! `/YYYY/MM/DD/<slug>/`.

use once_cell::sync::Lazy;
use regex::Regex;

/// The route for posts whose file name doesn't follow the naming convention.
pub const DEFAULT_ROUTE: &str = "/2013/01/01/no-title/";

static DATED_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})-(.+)$").unwrap());

/// Returns the route for `file_name`, or [`None`] if the name (less its
/// extension) doesn't start with a `YYYY-MM-DD-` prefix followed by a slug.
/// Only the shape is checked; `2013-13-45-foo` is a valid name.
pub fn from_file_name(file_name: &str) -> Option<String> {
    let stem = file_name.split('.').next().unwrap_or_default();
    DATED_NAME.captures(stem).map(|caps| {
        format!("/{}/{}/{}/{}/", &caps[1], &caps[2], &caps[3], &caps[4])
    })
}

/// Like [`from_file_name`], falling back to [`DEFAULT_ROUTE`].
pub fn derive(file_name: &str) -> String {
    from_file_name(file_name).unwrap_or_else(|| DEFAULT_ROUTE.to_owned())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_dated_file_name() {
        assert_eq!(
            derive("2013-04-09-one-letter-repository-status-for-git-mercurial-subversion.markdown"),
            "/2013/04/09/one-letter-repository-status-for-git-mercurial-subversion/"
        );
        assert_eq!(derive("2014-03-01-hello"), "/2014/03/01/hello/");
    }

    #[test]
    fn test_extension_starts_at_first_dot() {
        assert_eq!(derive("2014-03-01-v1.2-released.md"), "/2014/03/01/v1/");
    }

    #[test]
    fn test_structural_only() {
        assert_eq!(derive("2013-13-45-odd.md"), "/2013/13/45/odd/");
    }

    #[test]
    fn test_fallback() {
        for name in &[
            "",
            "about.md",
            "13-04-09-short-year.md",
            "2013-04-09.md",
            "2013-04-09-.md",
            "draft-2013-04-09-foo.md",
            ".2013-04-09-hidden",
            "\u{662}\u{660}\u{661}\u{663}-\u{660}\u{664}-\u{660}\u{669}-foo.md",
        ] {
            assert_eq!(derive(name), DEFAULT_ROUTE, "file name {:?}", name);
        }
    }
}
