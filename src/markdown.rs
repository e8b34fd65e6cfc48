//! Markdown-to-HTML conversion. A single [`Markdown`] converter is
//! constructed per run and shared across every document; it holds nothing
//! but the parser options, so it is freely reusable.

use pulldown_cmark::{html, Options, Parser};

/// Converts markdown source into HTML.
pub struct Markdown {
    options: Options,
}

impl Markdown {
    pub fn new() -> Markdown {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);
        Markdown { options }
    }

    /// Renders `source` to an HTML string.
    pub fn to_html(&self, source: &str) -> String {
        let mut out = String::new();
        html::push_html(&mut out, Parser::new_ext(source, self.options));
        out
    }
}

impl Default for Markdown {
    fn default() -> Markdown {
        Markdown::new()
    }
}
