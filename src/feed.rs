//! Support for creating an Atom feed from the run's render records.

use crate::config::Author;
use crate::post::Record;
use atom_syndication::{Entry, Error as AtomError, Feed, Link, Person};
use chrono::{FixedOffset, NaiveDate, TimeZone};
use std::fmt;
use std::io::Write;
use url::Url;

/// Bundled configuration for creating a feed.
pub struct FeedConfig {
    pub title: String,
    pub site_root: Url,
    pub author: Option<Author>,
}

/// Creates a feed from some configuration ([`FeedConfig`]) and the run's
/// [`Record`]s and writes the result to a [`std::io::Write`]. This function
/// takes ownership of the provided [`FeedConfig`]. The records are expected
/// in the index's order (publish date descending).
pub fn write_feed<W: Write>(config: FeedConfig, records: &[Record], w: W) -> Result<()> {
    feed(config, records)?.write_to(w)?;
    Ok(())
}

fn feed(config: FeedConfig, records: &[Record]) -> Result<Feed> {
    use std::collections::BTreeMap;

    // The newest record date rather than the wall clock keeps repeated runs
    // over unchanged sources byte-identical.
    let updated = records
        .iter()
        .map(|record| record.date_published)
        .max()
        .unwrap_or_else(|| NaiveDate::from_ymd(1970, 1, 1).and_hms(0, 0, 0));

    Ok(Feed {
        entries: feed_entries(&config, records)?,
        title: config.title.into(),
        id: config.site_root.to_string(),
        updated: FixedOffset::east(0).from_utc_datetime(&updated),
        authors: author_to_people(config.author),
        categories: Vec::new(),
        contributors: Vec::new(),
        generator: None,
        icon: None,
        logo: None,
        rights: None,
        subtitle: None,
        base: None,
        lang: None,
        extensions: BTreeMap::new(),
        namespaces: BTreeMap::new(),
        links: vec![Link {
            href: config.site_root.to_string(),
            rel: "alternate".to_string(),
            title: None,
            hreflang: None,
            mime_type: None,
            length: None,
        }],
    })
}

fn feed_entries(config: &FeedConfig, records: &[Record]) -> Result<Vec<Entry>> {
    use std::collections::BTreeMap;
    let mut entries: Vec<Entry> = Vec::with_capacity(records.len());

    for record in records {
        let url = config.site_root.join(&record.href())?;
        let date = FixedOffset::east(0).from_utc_datetime(&record.date_published);

        entries.push(Entry {
            id: url.to_string(),
            title: record.title.clone().into(),
            updated: date,
            authors: author_to_people(config.author.clone()),
            links: vec![Link {
                href: url.to_string(),
                rel: "alternate".to_owned(),
                title: None,
                mime_type: None,
                hreflang: None,
                length: None,
            }],
            rights: None,
            summary: None,
            categories: Vec::new(),
            contributors: Vec::new(),
            published: Some(date),
            source: None,
            content: None,
            extensions: BTreeMap::new(),
        })
    }
    Ok(entries)
}

fn author_to_people(author: Option<Author>) -> Vec<Person> {
    match author {
        Some(author) => vec![Person {
            name: author.name,
            email: author.email,
            uri: None,
        }],
        None => Vec::new(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants include I/O, Atom, and
/// URL-joining issues.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when there is an Atom-related error.
    Atom(AtomError),

    /// Returned when a record URL can't be joined onto the site root.
    Url(url::ParseError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Atom(err) => err.fmt(f),
            Error::Url(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Atom(err) => Some(err),
            Error::Url(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<AtomError> for Error {
    /// Converts [`AtomError`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: AtomError) -> Error {
        Error::Atom(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts [`url::ParseError`]s into [`Error`]. This allows us to use
    /// the `?` operator when joining record URLs.
    fn from(err: url::ParseError) -> Error {
        Error::Url(err)
    }
}
