//! Defines the fixed document header schema and its parser. Every source
//! document begins with exactly [`HEADER_LINES`] lines of the form
//! `Key: value`; the five keys are `Title`, `Template`, `MetaDescription`,
//! `DatePublished`, and `IsDraft`, all required, no others allowed.

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

/// The number of header lines at the top of every source document.
pub const HEADER_LINES: usize = 5;

pub const TITLE: &str = "Title";
pub const TEMPLATE: &str = "Template";
pub const META_DESCRIPTION: &str = "MetaDescription";
pub const DATE_PUBLISHED: &str = "DatePublished";
pub const IS_DRAFT: &str = "IsDraft";

/// The schema's field names in declaration order. Missing-field errors
/// report names in this order.
pub const FIELDS: [&str; HEADER_LINES] =
    [TITLE, TEMPLATE, META_DESCRIPTION, DATE_PUBLISHED, IS_DRAFT];

/// The typed result of parsing a document header.
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    pub title: String,

    /// The file name of the template to render the document with. Resolved
    /// against the template directory by
    /// [`crate::templates::TemplateStore`].
    pub template: String,

    pub meta_description: String,

    pub date_published: NaiveDateTime,

    /// Parsed but never used to filter; 0/1 convention implied, not
    /// enforced.
    pub is_draft: i64,
}

/// Splits a document into its [`HEADER_LINES`] header lines and the
/// remaining body text. Returns [`Error::Truncated`] when the document has
/// fewer than [`HEADER_LINES`] lines.
pub fn split(input: &str) -> Result<(Vec<&str>, &str)> {
    let mut lines = Vec::with_capacity(HEADER_LINES);
    let mut offset = 0;
    for _ in 0..HEADER_LINES {
        match input[offset..].find('\n') {
            Some(i) => {
                lines.push(input[offset..offset + i].trim_end_matches('\r'));
                offset += i + 1;
            }
            None => {
                // A final header line without a trailing newline still
                // counts; an exhausted input does not.
                if input[offset..].is_empty() {
                    return Err(Error::Truncated { found: lines.len() });
                }
                lines.push(&input[offset..]);
                offset = input.len();
            }
        }
    }
    Ok((lines, &input[offset..]))
}

/// Parses [`HEADER_LINES`] header lines into a typed [`Header`].
///
/// Each line is split on its first colon; key and value are both trimmed.
/// Violations are checked in order: a line without a colon, then an unknown
/// key, then a value that fails its field's conversion, and finally (after
/// all lines are consumed) any missing fields. Duplicate keys overwrite, so
/// a duplicated key surfaces as a missing-field error for the field it
/// displaced.
pub fn parse(lines: &[&str]) -> Result<Header> {
    let mut title = None;
    let mut template = None;
    let mut meta_description = None;
    let mut date_published = None;
    let mut is_draft = None;

    for line in lines {
        let (key, value) = match line.find(':') {
            Some(i) => (line[..i].trim(), line[i + 1..].trim()),
            None => return Err(Error::MalformedLine((*line).to_owned())),
        };
        match key {
            TITLE => title = Some(value.to_owned()),
            TEMPLATE => template = Some(value.to_owned()),
            META_DESCRIPTION => meta_description = Some(value.to_owned()),
            DATE_PUBLISHED => {
                date_published = Some(parse_date(value).ok_or_else(|| Error::Value {
                    field: DATE_PUBLISHED,
                    value: value.to_owned(),
                })?)
            }
            IS_DRAFT => {
                is_draft = Some(value.parse::<i64>().map_err(|_| Error::Value {
                    field: IS_DRAFT,
                    value: value.to_owned(),
                })?)
            }
            _ => return Err(Error::UnknownField(key.to_owned())),
        }
    }

    match (title, template, meta_description, date_published, is_draft) {
        (
            Some(title),
            Some(template),
            Some(meta_description),
            Some(date_published),
            Some(is_draft),
        ) => Ok(Header {
            title,
            template,
            meta_description,
            date_published,
            is_draft,
        }),
        (title, template, meta_description, date_published, is_draft) => {
            let mut missing = Vec::new();
            if title.is_none() {
                missing.push(TITLE);
            }
            if template.is_none() {
                missing.push(TEMPLATE);
            }
            if meta_description.is_none() {
                missing.push(META_DESCRIPTION);
            }
            if date_published.is_none() {
                missing.push(DATE_PUBLISHED);
            }
            if is_draft.is_none() {
                missing.push(IS_DRAFT);
            }
            Err(Error::Missing(missing))
        }
    }
}

/// Parses a `DatePublished` value against the accepted formats. Values
/// without a time component resolve to midnight.
fn parse_date(value: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: [&str; 3] =
        ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];
    const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d %B %Y", "%B %d, %Y"];

    for format in &DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(datetime);
        }
    }
    for format in &DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date.and_hms(0, 0, 0));
        }
    }
    None
}

/// Represents the result of a header-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a violation of the header schema. Every variant is fatal to
/// the run; the document path is attached by the caller (see
/// [`crate::post::Error::Annotated`]).
#[derive(Debug)]
pub enum Error {
    /// Returned when a header line has no `:` separator.
    MalformedLine(String),

    /// Returned when a header key is not part of the schema.
    UnknownField(String),

    /// Returned when a value fails its field's conversion.
    Value { field: &'static str, value: String },

    /// Returned when one or more schema fields are absent after all header
    /// lines are consumed.
    Missing(Vec<&'static str>),

    /// Returned when the document has fewer than [`HEADER_LINES`] lines.
    Truncated { found: usize },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MalformedLine(line) => {
                write!(f, "header line is missing a `:` separator: `{}`", line)
            }
            Error::UnknownField(key) => write!(f, "invalid header field: {}", key),
            Error::Value { field, value } => {
                write!(f, "unable to parse {} from `{}`", field, value)
            }
            Error::Missing(fields) => {
                write!(f, "missing header fields: {}", fields.join(", "))
            }
            Error::Truncated { found } => write!(
                f,
                "document has only {} of {} header lines",
                found, HEADER_LINES
            ),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}
