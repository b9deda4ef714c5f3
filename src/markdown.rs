use pulldown_cmark::{html, Options, Parser};

/// File name suffixes for posts written in markdown.
pub const MARKDOWN_EXTENSIONS: &[&str] = &[".md", ".markdown"];

/// Reports whether `file_name` looks like a markdown file.
pub fn is_markdown(file_name: &str) -> bool {
    let file_name = file_name.to_ascii_lowercase();
    MARKDOWN_EXTENSIONS
        .iter()
        .any(|extension| file_name.ends_with(extension))
}

/// Converts markdown to HTML, appending the result to `w`.
pub fn to_html(w: &mut String, markdown: &str) {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    html::push_html(w, Parser::new_ext(markdown, options));
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_is_markdown() {
        assert!(is_markdown("2013-04-09-foo.markdown"));
        assert!(is_markdown("README.MD"));
        assert!(!is_markdown("notes.txt"));
        assert!(!is_markdown(""));
    }

    #[test]
    fn test_to_html() {
        let mut html = String::new();
        to_html(&mut html, "# Title\n\nSome *text*.");
        assert_eq!(html, "<h1>Title</h1>\n<p>Some <em>text</em>.</p>\n");
    }
}
