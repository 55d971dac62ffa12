//! The crate-wide [`Error`] type and [`Result`] alias.
//!
//! The taxonomy is deliberately small:
//!
//! * I/O failures carry the path they happened on and always propagate to the
//!   original caller.
//! * A request path that resolves to nothing (or to a post file that cannot
//!   be fetched) surfaces as [`Error::NotFound`] naming the request path.
//! * Template compilation failures are fatal at setup time, never per
//!   request.
//!
//! Malformed front matter is *not* represented here: the parser recovers
//! locally by treating the file as an opaque, field-less document (see
//! [`crate::post`]).

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The result of a fallible engine operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a routing, indexing, or parsing operation.
#[derive(Debug, Error)]
pub enum Error {
    /// Returned when a stat, read, or directory listing fails. The path is
    /// the file or directory the operation was issued against.
    #[error("reading `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Returned when a request path matches no template, or matches the post
    /// template but the derived file does not parse.
    #[error("content for `{0}` not found")]
    NotFound(String),

    /// Returned when a URL template references a placeholder with no
    /// registered semantic class. Fatal at setup time.
    #[error("unknown placeholder `{{{0}}}` in URL template")]
    UnknownPlaceholder(String),

    /// Returned when a compiled template produces an invalid pattern. This
    /// indicates a malformed semantic class, so it is also fatal at setup
    /// time.
    #[error("compiling URL template pattern")]
    Pattern(#[from] regex::Error),

    /// Returned when a registered body transform fails.
    #[error("transforming `{format}` body: {message}")]
    Transform { format: String, message: String },

    /// Returned when the external generic content handler fails.
    #[error("generic content handler: {0}")]
    Handler(String),
}

impl Error {
    /// Wraps an [`io::Error`] together with the path it occurred on. This
    /// keeps `map_err` call sites terse.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Error {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
