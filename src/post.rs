//! Defines the [`Post`], [`Parsed`], and [`Parser`] types, plus the logic
//! for parsing a single post file: split the front matter from the body,
//! decode the header, and derive the publish date and permalink from the
//! file name's slug values.
//!
//! A file whose header is missing or undecodable is not an error: it
//! degrades to an opaque, field-less document carrying the entire trimmed
//! source text as content. Only I/O failures propagate.

use crate::error::Result;
use crate::template::{FileNamePattern, UrlTemplate};
use crate::transform::TransformRegistry;
use crate::value::{Header, Value};
use crate::vfs::Vfs;
use chrono::{DateTime, NaiveDate, Utc};
use std::path::{Path, PathBuf};

/// The 3-character token delimiting the front-matter header.
const FENCE: &str = "---";

/// One parsed document.
#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    /// The source file path; the unique key in the post index.
    pub file_path: PathBuf,

    /// The open front-matter map. Empty for opaque documents.
    pub header: Header,

    /// Derived from the file name's slug values, falling back to the file's
    /// creation time. `None` only for opaque documents.
    pub published_date: Option<NaiveDate>,

    /// Derived from the post URL template by positional substitution of the
    /// slug values. `None` for opaque documents and for files whose names
    /// carry no slugs.
    pub permalink: Option<String>,

    /// The file's modification time at parse time.
    pub last_modified: Option<DateTime<Utc>>,

    /// The body text: transformed output, or the raw trimmed body when no
    /// transform has run.
    pub content: String,
}

impl Post {
    fn opaque(file_path: PathBuf, content: String) -> Post {
        Post {
            file_path,
            header: Header::new(),
            published_date: None,
            permalink: None,
            last_modified: None,
            content,
        }
    }

    /// The post's tags (header `tags` field, defaulting to none).
    pub fn tags(&self) -> Vec<&str> {
        self.header.tags()
    }

    /// Whether the post is published (header `published` field, defaulting
    /// to `false`).
    pub fn published(&self) -> bool {
        self.header.published()
    }

    /// Flattens the post into a content map: the header fields plus the
    /// derived `published_date` and `permalink` fields and the body under
    /// `content`.
    pub fn to_header(&self) -> Header {
        let mut header = self.header.clone();
        if let Some(date) = self.published_date {
            header.insert("published_date", date);
        }
        if let Some(permalink) = &self.permalink {
            header.insert("permalink", permalink.clone());
        }
        header.insert("content", self.content.clone());
        header
    }

    pub fn to_value(&self) -> Value {
        Value::from(self.to_header())
    }
}

/// The outcome of parsing one file.
#[derive(Clone, Debug, PartialEq)]
pub enum Parsed {
    /// No decodable header: the whole trimmed source text, carried as
    /// opaque content. Opaque documents never contribute to the index
    /// aggregates.
    Opaque(Post),

    /// A post with a decoded header and derived fields. `content` is the
    /// raw trimmed body; any transform runs later so the index caches the
    /// header-level entry first.
    Full(Post),
}

/// Parses [`Post`] objects from files on an injected filesystem.
pub struct Parser<'a> {
    /// The filesystem to stat and read through.
    pub fs: &'a dyn Vfs,

    /// The post URL template; its literal skeleton generates permalinks.
    pub url_template: &'a UrlTemplate,

    /// The file-name matcher derived from `url_template`'s placeholders.
    pub file_name: &'a FileNamePattern,

    /// Per-format body transforms.
    pub transforms: &'a TransformRegistry,

    /// The configured body format (transform-registry key).
    pub body_format: &'a str,
}

impl Parser<'_> {
    /// Parses the file at `path` down to the header level. I/O errors
    /// propagate as-is; header decode failures degrade to [`Parsed::Opaque`].
    pub fn parse(&self, path: &Path) -> Result<Parsed> {
        let meta = self.fs.metadata(path)?;
        let data = self.fs.read_to_string(path)?;
        let trimmed = data.trim();

        let mut split = trimmed.splitn(3, FENCE);
        let _preamble = split.next();
        let header_text = match split.next() {
            Some(text) => text,
            // no fence at all
            None => return Ok(Parsed::Opaque(Post::opaque(path.to_owned(), trimmed.to_owned()))),
        };
        let body = split.next().unwrap_or("").trim();

        let header: Header = match serde_yaml::from_str(header_text) {
            Ok(header) => header,
            Err(_) => {
                return Ok(Parsed::Opaque(Post::opaque(path.to_owned(), trimmed.to_owned())))
            }
        };

        let slugs = self.file_name.extract(&path.to_string_lossy()).map(|values| {
            values.iter().map(|v| (*v).to_owned()).collect::<Vec<String>>()
        });

        Ok(Parsed::Full(Post {
            file_path: path.to_owned(),
            published_date: Some(
                slugs
                    .as_deref()
                    .and_then(|values| self.slug_date(values))
                    .unwrap_or_else(|| meta.created.date_naive()),
            ),
            permalink: slugs.as_deref().map(|values| {
                let values: Vec<&str> = values.iter().map(String::as_str).collect();
                self.url_template.expand(&values)
            }),
            last_modified: Some(meta.modified),
            content: body.to_owned(),
            header,
        }))
    }

    /// Applies the registered transform for the configured body format to
    /// the post's content. A post with no registered transform passes
    /// through untouched.
    pub fn transform(&self, post: &mut Post) -> Result<()> {
        if let Some(transform) = self.transforms.get(self.body_format) {
            post.content = transform.parse(&post.content)?;
        }
        Ok(())
    }

    /// The publish date named by the slug values, if the template supplies
    /// `year`, `month`, and `date` placeholders and the captured values name
    /// a real calendar date. Months are 1-based throughout.
    fn slug_date(&self, slugs: &[String]) -> Option<NaiveDate> {
        let slug = |name: &str| {
            self.url_template
                .group(name)
                .and_then(|group| slugs.get(group - 1))
        };
        let year = slug("year")?.parse::<i32>().ok()?;
        let month = slug("month")?.parse::<u32>().ok()?;
        let day = slug("date")?.parse::<u32>().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }
}
