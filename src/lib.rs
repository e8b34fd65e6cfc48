//! The library code for the `quern` static weblog generator. The pipeline is
//! a single pass with three distinct steps:
//!
//! 1. Parsing posts from source files on disk ([`crate::header`] and
//!    [`crate::post`])
//! 2. Rendering each post through its named template ([`crate::markdown`],
//!    [`crate::templates`], and [`crate::write`])
//! 3. Assembling the site index and feed from the accumulated render records
//!    ([`crate::build`] and [`crate::feed`])
//!
//! Every source document carries a fixed five-line `Key: value` header
//! (`Title`, `Template`, `MetaDescription`, `DatePublished`, `IsDraft`)
//! followed by a markdown body. The assembler clears the output directory,
//! renders each document, sorts the records by publish date (most recent
//! first), and renders the index template with the sorted list. Any
//! validation failure aborts the whole run; there is no per-document
//! recovery. The driver binary owns exit-code mapping, so no library code
//! terminates the process.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod feed;
pub mod header;
pub mod markdown;
pub mod post;
pub mod templates;
pub mod write;
