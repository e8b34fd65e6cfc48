//! Defines the [`Post`] and [`Record`] types and the logic for parsing a
//! post from a source file. See [`Post::to_value`] and
//! [`Record`]'s `Value` conversion for how posts and records are exposed to
//! templates.

use std::fmt;
use std::fs::File;
use std::io::prelude::*;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use gtmpl::Value;

use crate::header::{self, Header};
use crate::markdown::Markdown;

/// The format with which `DatePublished` values are rendered into template
/// contexts.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The reserved context key holding a post's rendered body.
pub const BODY_KEY: &str = "PostMarkup";

/// A fully parsed source document: the typed header plus the body already
/// rendered to HTML.
pub struct Post {
    /// The output file name: the source file's stem with an `.html`
    /// extension.
    pub file_name: String,

    pub header: Header,

    /// The body, rendered to HTML.
    pub body: String,
}

impl Post {
    /// Reads and parses the document at `path`. Any error is annotated with
    /// the document path so the operator knows which file to fix.
    pub fn from_file(path: &Path, markdown: &Markdown) -> Result<Post> {
        match Self::read(path, markdown) {
            Ok(post) => Ok(post),
            Err(e) => Err(Error::Annotated(
                format!("parsing post `{}`", path.display()),
                Box::new(e),
            )),
        }
    }

    fn read(path: &Path, markdown: &Markdown) -> Result<Post> {
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| Error::InvalidFileName(path.to_owned()))?;

        let mut contents = String::new();
        File::open(path)?.read_to_string(&mut contents)?;
        Self::from_str(&format!("{}.html", stem), &contents, markdown)
    }

    /// Parses a single [`Post`] from its output `file_name` and the raw
    /// document text. The document must carry the full five-line header;
    /// everything after it is the markdown body. For example:
    ///
    /// ```md
    /// Title: Hello, world!
    /// Template: post.html
    /// MetaDescription: A greeting
    /// DatePublished: 2021-04-16
    /// IsDraft: 0
    ///
    /// # Hello
    ///
    /// World
    /// ```
    pub fn from_str(file_name: &str, input: &str, markdown: &Markdown) -> Result<Post> {
        let (lines, body) = header::split(input)?;
        let header = header::parse(&lines)?;
        Ok(Post {
            file_name: file_name.to_owned(),
            header,
            body: markdown.to_html(body),
        })
    }

    /// Converts a [`Post`] into a [`Value`] for templating. The result is a
    /// [`Value::Object`] with the five header fields under their schema
    /// names plus the rendered body under [`BODY_KEY`].
    pub fn to_value(&self) -> Value {
        use std::collections::HashMap;
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert(
            header::TITLE.to_owned(),
            Value::String(self.header.title.clone()),
        );
        m.insert(
            header::TEMPLATE.to_owned(),
            Value::String(self.header.template.clone()),
        );
        m.insert(
            header::META_DESCRIPTION.to_owned(),
            Value::String(self.header.meta_description.clone()),
        );
        m.insert(
            header::DATE_PUBLISHED.to_owned(),
            Value::String(self.header.date_published.format(DATE_FORMAT).to_string()),
        );
        m.insert(header::IS_DRAFT.to_owned(), Value::from(self.header.is_draft));
        m.insert(BODY_KEY.to_owned(), Value::String(self.body.clone()));
        Value::Object(m)
    }
}

/// One render record per successfully written document. Records are
/// accumulated by the assembler, sorted by publish date, and consumed by
/// the index and feed steps; they are never persisted.
#[derive(Clone, Debug)]
pub struct Record {
    pub source_path: PathBuf,
    pub output_path: PathBuf,

    /// The output file name, kept alongside `output_path` so the
    /// site-relative URL needs no path surgery.
    pub file_name: String,

    pub title: String,
    pub date_published: NaiveDateTime,
    pub is_draft: i64,
}

impl Record {
    /// The site-relative URL for the rendered document.
    pub fn href(&self) -> String {
        format!("posts/{}", self.file_name)
    }
}

impl From<&Record> for Value {
    /// Converts [`Record`]s into [`Value`]s for the index template.
    fn from(record: &Record) -> Value {
        use std::collections::HashMap;
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("Url".to_owned(), Value::String(record.href()));
        m.insert(
            header::TITLE.to_owned(),
            Value::String(record.title.clone()),
        );
        m.insert(
            header::DATE_PUBLISHED.to_owned(),
            Value::String(record.date_published.format(DATE_FORMAT).to_string()),
        );
        m.insert(header::IS_DRAFT.to_owned(), Value::from(record.is_draft));
        Value::Object(m)
    }
}

/// Represents the result of a [`Post`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a [`Post`] object.
#[derive(Debug)]
pub enum Error {
    /// Returned when the document header violates the schema.
    Header(header::Error),

    /// Returned when a source file name has no UTF-8 stem.
    InvalidFileName(PathBuf),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Header(err) => err.fmt(f),
            Error::InvalidFileName(path) => {
                write!(f, "invalid file name: {:?}", path)
            }
            Error::Io(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Header(err) => Some(err),
            Error::InvalidFileName(_) => None,
            Error::Io(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<header::Error> for Error {
    /// Converts a [`header::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for header parsing functions.
    fn from(err: header::Error) -> Error {
        Error::Header(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
