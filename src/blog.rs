//! Defines [`Blog`], the ordered collection of publishable [`Post`]s.

use crate::post::{Options, Post, Result};
use serde::Serialize;
use tracing::debug;

/// A named document fetched from the post source, not yet parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub name: String,
    pub content: String,
}

impl RawDocument {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> RawDocument {
        RawDocument {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// The posts of a blog, in the order their documents were given. Posts
/// without a publish date are not publishable and are left out.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Blog {
    posts: Vec<Post>,
}

impl Blog {
    /// Parses every document into a [`Post`] and keeps the dated ones. A
    /// document that fails to parse fails the whole blog.
    pub fn new(documents: &[RawDocument], options: &Options) -> Result<Blog> {
        let mut posts = Vec::with_capacity(documents.len());
        for document in documents {
            let post = Post::parse(&document.name, &document.content, options)?;
            if post.date().is_some() {
                posts.push(post);
            } else {
                debug!(file_name = %document.name, "skipping post without a date");
            }
        }
        Ok(Blog { posts })
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn into_posts(self) -> Vec<Post> {
        self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
