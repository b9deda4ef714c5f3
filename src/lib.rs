//! The library code for `bitesize`, which turns a directory of blog posts in
//! a GitHub repository into an ordered collection of normalized posts. The
//! architecture can be generally broken down into two distinct steps:
//!
//! 1. Fetching the post documents from the repository ([`crate::source`])
//! 2. Parsing the documents into a [`crate::blog::Blog`] ([`crate::post`])
//!
//! The second step is where the rules live. Each document is split into YAML
//! frontmatter and a markdown body ([`crate::frontmatter`]), the frontmatter
//! is decoded and defaulted, the body is optionally rewritten
//! ([`crate::rewrite`]), and the post's URL route is derived from its
//! `YYYY-MM-DD-slug` file name ([`crate::route`]). Posts without a publish
//! date are left out of the blog.
//!
//! [`crate::build`] stitches the two steps together and [`crate::render`]
//! turns the result into printable text.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod blog;
pub mod build;
pub mod config;
pub mod frontmatter;
pub mod markdown;
pub mod post;
pub mod render;
pub mod rewrite;
pub mod route;
pub mod source;
mod util;
