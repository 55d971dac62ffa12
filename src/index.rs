//! The post index: the authoritative, lazily built collection of parsed
//! posts keyed by file path, plus the two derived aggregates (tag counts and
//! the year/month/day date tree).
//!
//! The index is built once per process on first access and reused until
//! restart; there is no invalidation API. The aggregates are populated
//! exactly once, during the full build, from every successfully parsed file
//! regardless of published status, so archive path enumeration reflects
//! drafts' dates too. Archive *listings* filter by published status at query
//! time (see [`crate::router`]).

use crate::error::Result;
use crate::post::{Parsed, Parser, Post};
use chrono::{DateTime, Datelike, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Year → month → set of days, all as zero-padded strings.
pub type DateTree = BTreeMap<String, BTreeMap<String, BTreeSet<String>>>;

/// The lazily built post collection and its aggregates. Mutating operations
/// take `&mut self`, so a reader can never observe partially populated
/// aggregates; hosts that share the index across threads serialize access
/// themselves.
#[derive(Default)]
pub struct PostIndex {
    posts: BTreeMap<PathBuf, Post>,
    tag_counts: BTreeMap<String, usize>,
    post_dates: DateTree,
    last_modified: Option<DateTime<Utc>>,
    built: bool,
}

impl PostIndex {
    pub fn new() -> PostIndex {
        PostIndex::default()
    }

    /// Returns the post collection and its maximum modification time,
    /// scanning the posts directory first if no build has happened yet.
    /// Re-requests after a successful build return the cache with no new
    /// I/O, even when the directory was empty.
    pub fn get_all(
        &mut self,
        parser: &Parser,
        dir: &Path,
    ) -> Result<(&BTreeMap<PathBuf, Post>, Option<DateTime<Utc>>)> {
        if !self.built {
            self.build(parser, dir)?;
        }
        Ok((&self.posts, self.last_modified))
    }

    /// Scans `dir` and parses every entry. Dotfiles are skipped. A single
    /// file's failure (I/O or undecodable header) downgrades to omission;
    /// only the directory listing itself failing aborts the build.
    fn build(&mut self, parser: &Parser, dir: &Path) -> Result<()> {
        for name in parser.fs.read_dir(dir)? {
            if name.starts_with('.') {
                continue;
            }
            let path = dir.join(&name);
            match parser.parse(&path) {
                Ok(Parsed::Full(post)) => self.admit(post),
                Ok(Parsed::Opaque(_)) => {
                    tracing::debug!(path = %path.display(), "skipping document without front matter");
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable post");
                }
            }
        }
        self.built = true;
        tracing::debug!(
            posts = self.posts.len(),
            tags = self.tag_counts.len(),
            "post index built"
        );
        Ok(())
    }

    /// Commits one parsed post and its aggregate contributions.
    fn admit(&mut self, post: Post) {
        if post.last_modified > self.last_modified {
            self.last_modified = post.last_modified;
        }
        for tag in post.tags() {
            // keys keep the tag's case as written
            *self.tag_counts.entry(tag.to_owned()).or_insert(0) += 1;
        }
        if let Some(date) = post.published_date {
            self.post_dates
                .entry(format!("{:04}", date.year()))
                .or_insert_with(BTreeMap::new)
                .entry(format!("{:02}", date.month()))
                .or_insert_with(BTreeSet::new)
                .insert(format!("{:02}", date.day()));
        }
        self.posts.insert(post.file_path.clone(), post);
    }

    /// Fetches one post by file path for the single-post route. A full
    /// post's header-level entry is cached before any body processing, so a
    /// transform failure cannot corrupt it. Aggregates are untouched; they
    /// belong to the full build alone.
    pub fn load_post(
        &mut self,
        parser: &Parser,
        path: &Path,
        transform_body: bool,
    ) -> Result<Post> {
        match parser.parse(path)? {
            Parsed::Opaque(post) => Ok(post),
            Parsed::Full(post) => {
                self.posts.insert(post.file_path.clone(), post.clone());
                let mut post = post;
                if transform_body {
                    parser.transform(&mut post)?;
                }
                Ok(post)
            }
        }
    }

    /// The posts known so far. Meaningful after [`PostIndex::get_all`].
    pub fn posts(&self) -> &BTreeMap<PathBuf, Post> {
        &self.posts
    }

    /// Tag → occurrence count, keys preserving case as written.
    pub fn tag_counts(&self) -> &BTreeMap<String, usize> {
        &self.tag_counts
    }

    /// The year/month/day date tree.
    pub fn post_dates(&self) -> &DateTree {
        &self.post_dates
    }

    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.last_modified
    }
}
