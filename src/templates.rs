//! Template loading and resolution. Every regular file in the template
//! directory is parsed once at startup into a [`TemplateStore`]; the store
//! is read-only afterwards and lookups are by file name. Documents name
//! their template in the `Template` header field, and the index is rendered
//! with the fixed [`INDEX_TEMPLATE`] name.

use gtmpl::Template;
use std::collections::HashMap;
use std::fmt;
use std::fs::{read_dir, File};
use std::io;
use std::io::prelude::*;
use std::path::{Path, PathBuf};

/// The file name of the template used for the site index.
pub const INDEX_TEMPLATE: &str = "index.html";

/// An immutable set of parsed templates keyed by file name.
pub struct TemplateStore {
    templates: HashMap<String, Template>,
}

impl TemplateStore {
    /// Loads and parses every regular file in `dir`. Subdirectories are
    /// ignored; template names carry no path separators.
    pub fn load(dir: &Path) -> Result<TemplateStore> {
        let mut templates = HashMap::new();
        for result in read_dir(dir).map_err(|err| Error::Open {
            path: dir.to_owned(),
            err,
        })? {
            let entry = result?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let mut contents = String::new();
            File::open(entry.path())
                .map_err(|err| Error::Open {
                    path: entry.path(),
                    err,
                })?
                .read_to_string(&mut contents)?;

            let mut template = Template::default();
            template.parse(&contents).map_err(|err| Error::Parse {
                name: name.clone(),
                err: err.to_string(),
            })?;
            templates.insert(name, template);
        }
        Ok(TemplateStore { templates })
    }

    /// Resolves a template by file name. A name absent from the template
    /// directory is a fatal error.
    pub fn get(&self, name: &str) -> Result<&Template> {
        self.templates
            .get(name)
            .ok_or_else(|| Error::NotFound(name.to_owned()))
    }
}

/// Represents the result of a template-store operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading or resolving templates.
#[derive(Debug)]
pub enum Error {
    /// Returned when a requested template name is not present in the
    /// template directory.
    NotFound(String),

    /// Returned for errors parsing a template file.
    Parse { name: String, err: String },

    /// Returned for I/O problems opening the template directory or one of
    /// its files.
    Open { path: PathBuf, err: io::Error },

    /// Returned for other I/O errors.
    Io(io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NotFound(name) => {
                write!(f, "template `{}` does not exist in the template directory", name)
            }
            Error::Parse { name, err } => write!(f, "parsing template `{}`: {}", name, err),
            Error::Open { path, err } => {
                write!(f, "opening template path `{}`: {}", path.display(), err)
            }
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::NotFound(_) => None,
            Error::Parse { .. } => None,
            Error::Open { path: _, err } => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    /// Converts a [`io::Error`] into an [`Error`]. It allows us to use the
    /// `?` operator for fallible I/O functions.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}
