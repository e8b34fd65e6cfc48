//! Project configuration. A project is the nearest ancestor directory
//! containing a `quern.yaml` file; everything else about the filesystem
//! layout is fixed relative to that root: `src/` for markdown sources,
//! `posts/` for rendered output (cleared each run), `templates/` for
//! externally authored templates, and `index.html`/`feed.atom` at the root.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

/// The project file name searched for upwards from the starting directory.
pub const PROJECT_FILE: &str = "quern.yaml";

#[derive(Deserialize)]
struct Project {
    site_title: String,
    site_root: Url,

    #[serde(default)]
    author: Option<Author>,
}

/// The optional site author, carried into the Atom feed.
#[derive(Clone, Deserialize)]
pub struct Author {
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,
}

/// Resolved configuration for one run. Constructed once and passed by
/// reference down the call chain; nothing reads it from global state.
pub struct Config {
    pub root_directory: PathBuf,
    pub source_directory: PathBuf,
    pub posts_directory: PathBuf,
    pub templates_directory: PathBuf,
    pub index_path: PathBuf,
    pub feed_path: PathBuf,
    pub site_title: String,
    pub site_root: Url,
    pub author: Option<Author>,
}

impl Config {
    /// Searches `dir` and its ancestors for [`PROJECT_FILE`] and loads the
    /// first one found.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let dir = dir
            .canonicalize()
            .map_err(|e| anyhow!("Resolving directory `{}`: {}", dir.display(), e))?;
        let mut current: &Path = &dir;
        loop {
            let path = current.join(PROJECT_FILE);
            if path.exists() {
                return match Config::from_project_file(&path) {
                    Ok(config) => Ok(config),
                    Err(e) => Err(anyhow!("Loading configuration: {:?}", e)),
                };
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => {
                    return Err(anyhow!(
                        "Could not find `{}` in `{}` or any parent directory",
                        PROJECT_FILE,
                        dir.display()
                    ))
                }
            }
        }
    }

    /// Loads a configuration from an explicit project file path. The
    /// project root is the file's parent directory.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let project: Project = serde_yaml::from_reader(open(path, "project")?)?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(root) => Ok(Config {
                source_directory: root.join("src"),
                posts_directory: root.join("posts"),
                templates_directory: root.join("templates"),
                index_path: root.join("index.html"),
                feed_path: root.join("feed.atom"),
                root_directory: root.to_owned(),
                site_title: project.site_title,
                site_root: project.site_root,
                author: project.author,
            }),
        }
    }
}

fn open(path: &Path, kind: &str) -> Result<File> {
    match File::open(path) {
        Err(e) => Err(anyhow!("Opening {} file `{}`: {}", kind, path.display(), e)),
        Ok(file) => Ok(file),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    const PROJECT: &str = "site_title: example weblog\nsite_root: https://example.org/\n";

    #[test]
    fn test_from_project_file() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PROJECT_FILE);
        fs::write(&path, PROJECT).unwrap();

        let config = Config::from_project_file(&path)?;
        assert_eq!(config.site_title, "example weblog");
        assert_eq!(config.site_root.as_str(), "https://example.org/");
        assert_eq!(config.source_directory, dir.path().join("src"));
        assert_eq!(config.posts_directory, dir.path().join("posts"));
        assert_eq!(config.templates_directory, dir.path().join("templates"));
        assert_eq!(config.index_path, dir.path().join("index.html"));
        assert!(config.author.is_none());
        Ok(())
    }

    #[test]
    fn test_from_directory_searches_upward() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PROJECT_FILE), PROJECT).unwrap();
        let nested = dir.path().join("src");
        fs::create_dir(&nested).unwrap();

        let config = Config::from_directory(&nested)?;
        assert_eq!(config.site_title, "example weblog");
        Ok(())
    }

    #[test]
    fn test_from_directory_missing_project_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::from_directory(dir.path()).is_err());
    }

    #[test]
    fn test_author_with_optional_email() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PROJECT_FILE);
        fs::write(
            &path,
            "site_title: t\nsite_root: https://example.org/\nauthor:\n  name: A. Author\n",
        )
        .unwrap();

        let config = Config::from_project_file(&path)?;
        let author = config.author.expect("author should be present");
        assert_eq!(author.name, "A. Author");
        assert!(author.email.is_none());
        Ok(())
    }
}
