//! Responsible for templating and writing HTML pages to disk from parsed
//! [`Post`]s: one page per document plus the site index.

use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

use gtmpl::Value;

use crate::post::{Post, Record};
use crate::templates::{TemplateStore, INDEX_TEMPLATE};

/// Renders parsed posts through their named templates and writes the
/// results to disk. All collaborators are borrowed and read-only; the
/// writer itself holds no state across documents.
pub struct Writer<'a> {
    /// The preloaded template store. Documents resolve their `Template`
    /// header field against it; the index resolves
    /// [`INDEX_TEMPLATE`].
    pub templates: &'a TemplateStore,

    /// The directory in which per-document HTML files are written.
    pub posts_directory: &'a Path,

    /// The output path of the site index.
    pub index_path: &'a Path,

    /// The site title handed to the index template.
    pub site_title: &'a str,
}

impl Writer<'_> {
    /// Renders a single [`Post`] through the template named in its header
    /// and writes it to `{posts_directory}/{file_name}`, overwriting any
    /// existing file. Returns the [`Record`] for the written document.
    pub fn write_post(&self, source_path: &Path, post: &Post) -> Result<Record> {
        let template = self.templates.get(&post.header.template)?;
        let output_path = self.posts_directory.join(&post.file_name);
        template.execute(
            &mut File::create(&output_path)?,
            &gtmpl::Context::from(post.to_value()).unwrap(),
        )?;
        Ok(Record {
            source_path: source_path.to_owned(),
            output_path,
            file_name: post.file_name.clone(),
            title: post.header.title.clone(),
            date_published: post.header.date_published,
            is_draft: post.header.is_draft,
        })
    }

    /// Renders the site index from a list of [`Record`]s, already sorted by
    /// the assembler. The index context holds the record list under `posts`
    /// and the site title under `Title`.
    pub fn write_index(&self, records: &[Record]) -> Result<()> {
        use std::collections::HashMap;
        let template = self.templates.get(INDEX_TEMPLATE)?;
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert(
            "posts".to_owned(),
            Value::Array(records.iter().map(Value::from).collect()),
        );
        m.insert(
            "Title".to_owned(),
            Value::String(self.site_title.to_owned()),
        );
        template.execute(
            &mut File::create(self.index_path)?,
            &gtmpl::Context::from(Value::Object(m)).unwrap(),
        )?;
        Ok(())
    }
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// Returned when a named template cannot be resolved.
    Resolve(crate::templates::Error),

    /// An error during templating.
    Template(String),

    /// An error writing the output files.
    Io(io::Error),
}

impl From<crate::templates::Error> for Error {
    /// Converts a template-resolution error into an [`Error`]. This allows
    /// us to use the `?` operator for template lookups.
    fn from(err: crate::templates::Error) -> Error {
        Error::Resolve(err)
    }
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`].
    /// This allows us to use the `?` operator for fallible template
    /// operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Resolve(err) => err.fmt(f),
            Error::Template(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Resolve(err) => Some(err),
            Error::Template(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}
