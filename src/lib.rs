//! The library code for the `byline` blog content engine: a routing and
//! indexing core for a collection of date-named, front-matter-tagged post
//! files. The architecture can be broken down into a handful of layers,
//! leaves first:
//!
//! 1. Compiling URL templates into matchers and generators
//!    ([`crate::template`])
//! 2. Parsing individual post files ([`crate::post`])
//! 3. Lazily indexing the posts directory, with tag and date aggregates
//!    ([`crate::index`])
//! 4. Resolving request paths to posts, archive listings, or the external
//!    generic handler ([`crate::router`]), and enumerating every canonical
//!    output path ([`crate::paths`])
//!
//! Of these, the router is the most involved: every request path is matched
//! against the post template and the five archive templates (whole archive,
//! year, year/month, year/month/day, and tag), archive listings are filtered
//! to published posts in reverse-chronological order, and the result is
//! merged with the generic handler's shared content.
//!
//! The engine does not render output or serve HTTP. Rendering, asset
//! copying, and non-blog pages belong to the injected collaborators: the
//! [`crate::handler::GenericHandler`], the per-format
//! [`crate::transform::TransformRegistry`], and the [`crate::vfs::Vfs`]
//! filesystem.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod config;
pub mod error;
pub mod handler;
pub mod index;
pub mod paths;
pub mod post;
pub mod router;
pub mod template;
pub mod transform;
pub mod value;
pub mod vfs;

pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::handler::{GenericHandler, Negotiated};
pub use crate::router::Router;
