//! Turns a [`Blog`] into printable text. Nothing here writes anywhere; the
//! binary decides where the output goes.

use crate::blog::Blog;
use crate::post::Post;
use std::fmt;

/// Output formats for [`render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Metadata followed by the body as written.
    Text,

    /// Metadata followed by the body, rendered to HTML for markdown posts.
    Html,

    /// The whole blog as pretty-printed JSON.
    Json,
}

/// Renders `blog` in the requested `format`.
pub fn render(blog: &Blog, format: Format) -> serde_json::Result<String> {
    match format {
        Format::Text => Ok(Listing { blog, html: false }.to_string()),
        Format::Html => Ok(Listing { blog, html: true }.to_string()),
        Format::Json => serde_json::to_string_pretty(blog),
    }
}

struct Listing<'a> {
    blog: &'a Blog,
    html: bool,
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, post) in self.blog.posts().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write_post(f, post, self.html)?;
        }
        Ok(())
    }
}

fn write_post(f: &mut fmt::Formatter, post: &Post, html: bool) -> fmt::Result {
    writeln!(f, "== {}", post.file_name())?;
    writeln!(f, "title:      {}", post.title())?;
    if let Some(date) = post.date() {
        writeln!(f, "date:       {}", date.format("%Y-%m-%d %H:%M"))?;
    }
    writeln!(f, "categories: {}", post.categories().join(", "))?;
    writeln!(f, "tags:       {}", post.tags().join(", "))?;
    writeln!(f, "route:      {}", post.route())?;
    writeln!(f)?;
    if html {
        write!(f, "{}", post.html())?;
    } else {
        writeln!(f, "{}", post.body())?;
    }
    Ok(())
}
