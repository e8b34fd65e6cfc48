//! Exports the [`build_site`] function which stitches together the
//! high-level steps of one run: clearing the output directory, parsing and
//! rendering every source document ([`crate::post`], [`crate::write`]),
//! rendering the date-sorted index, and generating the Atom feed
//! ([`crate::feed`]).

use std::fmt;
use std::fs::{read_dir, File};
use std::path::{Path, PathBuf};

use log::info;

use crate::config::Config;
use crate::feed::{self, Error as FeedError, FeedConfig};
use crate::markdown::Markdown;
use crate::post::{Error as ParseError, Post};
use crate::templates::{Error as TemplateError, TemplateStore};
use crate::write::{Error as WriteError, Writer};

const MARKDOWN_EXTENSION: &str = ".md";

/// Builds the site from a [`Config`] object: one linear pass, no partial
/// recovery. Source documents are visited in filesystem-enumeration order;
/// only the index order (publish date descending, stable ties) is a
/// contract. If a document fails partway through the loop, files already
/// written stay on disk.
pub fn build_site(config: &Config) -> Result<()> {
    let templates = TemplateStore::load(&config.templates_directory)?;
    let markdown = Markdown::new();
    let writer = Writer {
        templates: &templates,
        posts_directory: &config.posts_directory,
        index_path: &config.index_path,
        site_title: &config.site_title,
    };

    // Empty the output directory: regular files only, non-recursive. Last
    // run always wins.
    reset_directory(&config.posts_directory)?;

    let mut records = Vec::new();
    for result in read_dir(&config.source_directory)? {
        let entry = result?;
        let os_file_name = entry.file_name();
        let file_name = os_file_name.to_string_lossy();
        if !file_name.ends_with(MARKDOWN_EXTENSION) {
            continue;
        }
        let path = entry.path();
        let post = Post::from_file(&path, &markdown)?;
        let record = writer.write_post(&path, &post)?;
        info!("Rendered {}.", record.output_path.display());
        records.push(record);
    }

    // Most recent first; sort_by is stable, so equal dates keep their
    // enumeration order.
    records.sort_by(|a, b| b.date_published.cmp(&a.date_published));
    writer.write_index(&records)?;
    info!("Rendered {}.", config.index_path.display());

    feed::write_feed(
        FeedConfig {
            title: config.site_title.clone(),
            site_root: config.site_root.clone(),
            author: config.author.clone(),
        },
        &records,
        File::create(&config.feed_path)?,
    )?;
    info!("Rendered {}.", config.feed_path.display());

    Ok(())
}

/// Deletes every regular file directly inside `dir`, creating the directory
/// first if it does not exist. Subdirectories and their contents are left
/// alone.
fn reset_directory(dir: &Path) -> Result<()> {
    let clean_err = |err| Error::Clean {
        path: dir.to_owned(),
        err,
    };

    if !dir.is_dir() {
        return std::fs::create_dir_all(dir).map_err(clean_err);
    }
    for result in read_dir(dir).map_err(clean_err)? {
        let entry = result.map_err(clean_err)?;
        if entry.file_type().map_err(clean_err)?.is_file() {
            std::fs::remove_file(entry.path()).map_err(clean_err)?;
        }
    }
    Ok(())
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during parsing,
/// writing, loading templates, cleaning the output directory, generating
/// the feed, and other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors parsing a source document.
    Parse(ParseError),

    /// Returned for errors rendering or writing output pages.
    Write(WriteError),

    /// Returned for errors loading the template directory.
    Template(TemplateError),

    /// Returned for errors writing the feed.
    Feed(FeedError),

    /// Returned for I/O problems while cleaning the output directory.
    Clean { path: PathBuf, err: std::io::Error },

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Template(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
            Error::Clean { path, err } => {
                write!(f, "Cleaning directory '{}': {}", path.display(), err)
            }
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Template(err) => Some(err),
            Error::Feed(err) => Some(err),
            Error::Clean { path: _, err } => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<TemplateError> for Error {
    /// Converts [`TemplateError`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: TemplateError) -> Error {
        Error::Template(err)
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const POST_TEMPLATE: &str = "<html><head><title>{{.Title}}</title>\
<meta name=\"description\" content=\"{{.MetaDescription}}\"></head>\
<body>{{.PostMarkup}}</body></html>";

    const INDEX_TEMPLATE: &str = "<h1>{{.Title}}</h1><ul>\
{{range .posts}}<li><a href=\"{{.Url}}\">{{.Title}}</a> {{.DatePublished}}</li>{{end}}\
</ul>";

    fn document(title: &str, date: &str, draft: i64) -> String {
        format!(
            "Title: {}\nTemplate: post.html\nMetaDescription: about {}\n\
             DatePublished: {}\nIsDraft: {}\n\nBody of {}.\n",
            title, title, date, draft, title
        )
    }

    /// Lays out a minimal project: quern.yaml, src/, templates/.
    fn project() -> (TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("quern.yaml"),
            "site_title: example weblog\nsite_root: https://example.org/\n",
        )
        .unwrap();
        fs::create_dir(root.join("src")).unwrap();
        fs::create_dir(root.join("templates")).unwrap();
        fs::write(root.join("templates").join("post.html"), POST_TEMPLATE).unwrap();
        fs::write(root.join("templates").join("index.html"), INDEX_TEMPLATE).unwrap();
        let config = Config::from_project_file(&root.join("quern.yaml")).unwrap();
        (dir, config)
    }

    #[test]
    fn test_build_site_end_to_end() -> Result<()> {
        let (dir, config) = project();
        let src = dir.path().join("src");
        fs::write(src.join("a.md"), document("Post A", "2024-01-01", 0)).unwrap();
        fs::write(src.join("b.md"), document("Post B", "2024-06-01", 0)).unwrap();
        fs::write(src.join("c.md"), document("Post C", "2023-12-01", 0)).unwrap();

        build_site(&config)?;

        let posts = dir.path().join("posts");
        for name in &["a.html", "b.html", "c.html"] {
            assert!(posts.join(name).is_file(), "missing {}", name);
        }
        let a = fs::read_to_string(posts.join("a.html")).unwrap();
        assert!(a.contains("<title>Post A</title>"), "rendered: {}", a);
        assert!(a.contains("<p>Body of Post A.</p>"), "rendered: {}", a);

        // The index lists posts by publish date, most recent first.
        let index = fs::read_to_string(dir.path().join("index.html")).unwrap();
        let b_at = index.find("Post B").expect("index should mention Post B");
        let a_at = index.find("Post A").expect("index should mention Post A");
        let c_at = index.find("Post C").expect("index should mention Post C");
        assert!(b_at < a_at && a_at < c_at, "index: {}", index);
        assert!(index.contains("href=\"posts/b.html\""), "index: {}", index);
        assert!(index.contains("<h1>example weblog</h1>"), "index: {}", index);

        let feed = fs::read_to_string(dir.path().join("feed.atom")).unwrap();
        assert!(feed.contains("https://example.org/posts/b.html"), "feed: {}", feed);
        Ok(())
    }

    #[test]
    fn test_build_site_is_idempotent() -> Result<()> {
        let (dir, config) = project();
        let src = dir.path().join("src");
        fs::write(src.join("a.md"), document("Post A", "2024-01-01", 0)).unwrap();
        fs::write(src.join("b.md"), document("Post B", "2024-06-01", 1)).unwrap();

        build_site(&config)?;
        let first_index = fs::read_to_string(dir.path().join("index.html")).unwrap();
        let first_post = fs::read_to_string(dir.path().join("posts").join("a.html")).unwrap();
        let first_feed = fs::read_to_string(dir.path().join("feed.atom")).unwrap();

        build_site(&config)?;
        assert_eq!(
            first_index,
            fs::read_to_string(dir.path().join("index.html")).unwrap()
        );
        assert_eq!(
            first_post,
            fs::read_to_string(dir.path().join("posts").join("a.html")).unwrap()
        );
        assert_eq!(
            first_feed,
            fs::read_to_string(dir.path().join("feed.atom")).unwrap()
        );
        Ok(())
    }

    #[test]
    fn test_build_site_resets_output_directory() -> Result<()> {
        let (dir, config) = project();
        let posts = dir.path().join("posts");
        fs::create_dir(&posts).unwrap();
        fs::write(posts.join("stale.html"), "left over from a prior run").unwrap();
        fs::write(
            dir.path().join("src").join("fresh.md"),
            document("Fresh", "2024-01-01", 0),
        )
        .unwrap();

        build_site(&config)?;

        let names: Vec<String> = fs::read_dir(&posts)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![String::from("fresh.html")]);
        Ok(())
    }

    #[test]
    fn test_build_site_ignores_non_markdown_sources() -> Result<()> {
        let (dir, config) = project();
        let src = dir.path().join("src");
        fs::write(src.join("a.md"), document("Post A", "2024-01-01", 0)).unwrap();
        fs::write(src.join("notes.txt"), "not a post").unwrap();

        build_site(&config)?;

        assert!(dir.path().join("posts").join("a.html").is_file());
        assert!(!dir.path().join("posts").join("notes.html").exists());
        Ok(())
    }

    #[test]
    fn test_build_site_missing_template_aborts() {
        let (dir, config) = project();
        let src = dir.path().join("src");
        let mut doc = document("Post A", "2024-01-01", 0);
        doc = doc.replace("Template: post.html", "Template: nonexistent.html");
        fs::write(src.join("a.md"), doc).unwrap();

        match build_site(&config) {
            Err(err) => {
                let message = err.to_string();
                assert!(message.contains("nonexistent.html"), "message: {}", message);
            }
            Ok(()) => panic!("expected missing-template error"),
        }
        assert!(!dir.path().join("posts").join("a.html").exists());
    }

    #[test]
    fn test_build_site_header_error_names_file_and_field() {
        let (dir, config) = project();
        fs::write(
            dir.path().join("src").join("bad.md"),
            "Title: Bad\nTemplate: post.html\nMetaDescription: x\n\
             DatePublished: not a date\nIsDraft: 0\n\nBody.\n",
        )
        .unwrap();

        match build_site(&config) {
            Err(err) => {
                let message = err.to_string();
                assert!(message.contains("bad.md"), "message: {}", message);
                assert!(message.contains("DatePublished"), "message: {}", message);
            }
            Ok(()) => panic!("expected header error"),
        }
    }

    #[test]
    fn test_build_site_draft_flag_is_carried_not_filtered() -> Result<()> {
        let (dir, config) = project();
        fs::write(
            dir.path().join("src").join("draft.md"),
            document("Draft post", "2024-01-01", 1),
        )
        .unwrap();

        build_site(&config)?;

        // Drafts render and appear in the index like any other document.
        assert!(dir.path().join("posts").join("draft.html").is_file());
        let index = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(index.contains("Draft post"), "index: {}", index);
        Ok(())
    }
}
