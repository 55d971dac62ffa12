//! The routing decision procedure. A request path is classified against the
//! compiled templates — one of the five archive shapes, the single-post
//! shape, or neither — and dispatched to the post index. Unrecognized paths
//! fall through to the injected generic content handler.
//!
//! Every page-shaped path carries a trailing `/index` marker (the host
//! serves pretty URLs by treating each path as a directory index).

use crate::config::{Config, SLUG_SEPARATOR};
use crate::error::{Error, Result};
use crate::handler::{GenericHandler, Negotiated};
use crate::index::PostIndex;
use crate::paths;
use crate::post::{Parser, Post};
use crate::template::{FileNamePattern, SemanticClasses, UrlTemplate};
use crate::transform::TransformRegistry;
use crate::value::{Header, Value};
use crate::vfs::Vfs;
use chrono::{DateTime, Datelike, Utc};
use regex::Regex;

/// The bare directory-index marker; never a section by itself.
const INDEX_MARKER: &str = "/index";

/// The five archive views.
#[derive(Clone, Copy, Debug, PartialEq)]
enum ArchiveKind {
    All,
    Year,
    YearMonth,
    YearMonthDate,
    Tag,
}

/// The compiled archive URL templates, kept for path generation as well as
/// matching.
pub struct ArchiveTemplates {
    pub all: UrlTemplate,
    pub year: UrlTemplate,
    pub year_month: UrlTemplate,
    pub year_month_date: UrlTemplate,
    pub tag: UrlTemplate,
}

impl ArchiveTemplates {
    fn compile(config: &Config, classes: &SemanticClasses) -> Result<ArchiveTemplates> {
        let urls = &config.archive_urls;
        Ok(ArchiveTemplates {
            all: UrlTemplate::compile(&urls.all, classes)?,
            year: UrlTemplate::compile(&urls.year, classes)?,
            year_month: UrlTemplate::compile(&urls.year_month, classes)?,
            year_month_date: UrlTemplate::compile(&urls.year_month_date, classes)?,
            tag: UrlTemplate::compile(&urls.tag, classes)?,
        })
    }

    fn get(&self, kind: ArchiveKind) -> &UrlTemplate {
        match kind {
            ArchiveKind::All => &self.all,
            ArchiveKind::Year => &self.year,
            ArchiveKind::YearMonth => &self.year_month,
            ArchiveKind::YearMonthDate => &self.year_month_date,
            ArchiveKind::Tag => &self.tag,
        }
    }

    fn kinds() -> [ArchiveKind; 5] {
        [
            ArchiveKind::All,
            ArchiveKind::Year,
            ArchiveKind::YearMonth,
            ArchiveKind::YearMonthDate,
            ArchiveKind::Tag,
        ]
    }
}

/// The filter values captured from a matched archive path.
struct ArchiveQuery {
    kind: ArchiveKind,
    tag: Option<String>,
    year: Option<String>,
    month: Option<String>,
    day: Option<String>,
}

/// Resolves request paths to posts, archive listings, or the generic
/// handler. Owns the post index and the compiled matchers; collaborators
/// (filesystem, transforms, generic handler) are injected at construction.
pub struct Router {
    config: Config,
    post_template: UrlTemplate,
    archives: ArchiveTemplates,
    file_name: FileNamePattern,
    post_page: Regex,
    post_section: Regex,
    archive_pages: Vec<(ArchiveKind, Regex)>,
    archive_sections: Vec<Regex>,
    transforms: TransformRegistry,
    fallback: Box<dyn GenericHandler>,
    fs: Box<dyn Vfs>,
    index: PostIndex,
}

impl Router {
    /// Compiles the configured templates and assembles the router. Template
    /// errors (unknown placeholders) surface here, at setup time.
    pub fn new(
        config: Config,
        transforms: TransformRegistry,
        fallback: Box<dyn GenericHandler>,
        fs: Box<dyn Vfs>,
    ) -> Result<Router> {
        let classes = SemanticClasses::default();
        let post_template = UrlTemplate::compile(&config.post_url, &classes)?;
        let archives = ArchiveTemplates::compile(&config, &classes)?;
        let file_name = FileNamePattern::for_template(&post_template, &classes, SLUG_SEPARATOR)?;

        let page = |template: &UrlTemplate| -> Result<Regex> {
            Ok(Regex::new(&format!("^{}{}$", template.pattern(), INDEX_MARKER))?)
        };
        // a section path may carry the index marker or not
        let section = |template: &UrlTemplate| -> Result<Regex> {
            Ok(Regex::new(&format!(
                "^{}(?:{})?$",
                template.pattern(),
                INDEX_MARKER
            ))?)
        };

        let mut archive_pages = Vec::new();
        let mut archive_sections = Vec::new();
        for kind in ArchiveTemplates::kinds().iter() {
            archive_pages.push((*kind, page(archives.get(*kind))?));
            archive_sections.push(section(archives.get(*kind))?);
        }

        Ok(Router {
            post_page: page(&post_template)?,
            post_section: section(&post_template)?,
            archive_pages,
            archive_sections,
            config,
            post_template,
            archives,
            file_name,
            transforms,
            fallback,
            fs,
            index: PostIndex::new(),
        })
    }

    /// Whether `basepath` is a directory-like section: true for the post
    /// shape and every archive shape (with or without the trailing index
    /// marker), false for the bare index marker, and otherwise whatever the
    /// generic handler says.
    pub fn is_section(&self, basepath: &str) -> bool {
        if basepath == INDEX_MARKER {
            return false;
        }
        if self.post_section.is_match(basepath)
            || self.archive_sections.iter().any(|r| r.is_match(basepath))
        {
            return true;
        }
        self.fallback.is_section(basepath)
    }

    /// The sections of the site; delegated verbatim.
    pub fn sections(&self) -> Vec<String> {
        self.fallback.sections()
    }

    /// Resolves `basepath` to negotiated content: an archive listing, a
    /// single post, or the generic handler's result. Blog results are merged
    /// with shared content, whose modification time supersedes the item's
    /// own when more recent.
    pub fn negotiate_content(&mut self, basepath: &str, content_type: &str) -> Result<Negotiated> {
        if let Some(query) = self.classify_archive(basepath) {
            let (content, last_modified) = self.archive_listing(&query)?;
            return self.with_shared(content, false, last_modified);
        }

        if let Some(slugs) = self.classify_post(basepath) {
            let file_name = format!(
                "{}.{}",
                slugs.join(SLUG_SEPARATOR),
                self.config.post_body_format
            );
            let path = self.config.posts_directory.join(file_name);
            let parser = Parser {
                fs: self.fs.as_ref(),
                url_template: &self.post_template,
                file_name: &self.file_name,
                transforms: &self.transforms,
                body_format: &self.config.post_body_format,
            };
            let post = match self.index.load_post(&parser, &path, true) {
                Ok(post) => post,
                Err(err) => {
                    tracing::debug!(path = %path.display(), error = %err, "post fetch failed");
                    return Err(Error::NotFound(basepath.to_owned()));
                }
            };
            let mut content = post.to_header();
            content.insert("is_post", true);
            let last_modified = post.last_modified;
            return self.with_shared(content, true, last_modified);
        }

        self.fallback.negotiate_content(basepath, content_type)
    }

    /// The exhaustive list of canonical output paths. Blog paths are only
    /// appended for the root basepath; any other basepath returns the
    /// generic handler's paths untouched.
    pub fn content_paths(&mut self, basepath: &str) -> Result<Vec<String>> {
        let default_paths = self.fallback.content_paths(basepath)?;
        if basepath != "/" {
            return Ok(default_paths);
        }
        let parser = Parser {
            fs: self.fs.as_ref(),
            url_template: &self.post_template,
            file_name: &self.file_name,
            transforms: &self.transforms,
            body_format: &self.config.post_body_format,
        };
        self.index.get_all(&parser, &self.config.posts_directory)?;
        Ok(paths::enumerate(&self.index, &self.archives, default_paths))
    }

    fn classify_post(&self, basepath: &str) -> Option<Vec<String>> {
        self.post_page.captures(basepath).map(|captures| {
            (1..captures.len())
                .filter_map(|i| captures.get(i))
                .map(|group| group.as_str().to_owned())
                .collect()
        })
    }

    fn classify_archive(&self, basepath: &str) -> Option<ArchiveQuery> {
        for (kind, regex) in &self.archive_pages {
            if let Some(captures) = regex.captures(basepath) {
                let template = self.archives.get(*kind);
                let capture = |name: &str| {
                    template
                        .group(name)
                        .and_then(|group| captures.get(group))
                        .map(|m| m.as_str().to_owned())
                };
                return Some(ArchiveQuery {
                    kind: *kind,
                    tag: capture("tag"),
                    year: capture("year"),
                    month: capture("month"),
                    day: capture("date"),
                });
            }
        }
        None
    }

    /// Builds the archive view for a matched query: published posts only,
    /// most recent first, narrowed by tag (exclusive) or by year, then
    /// month, then day. An empty intermediate result simply propagates.
    fn archive_listing(
        &mut self,
        query: &ArchiveQuery,
    ) -> Result<(Header, Option<DateTime<Utc>>)> {
        let parser = Parser {
            fs: self.fs.as_ref(),
            url_template: &self.post_template,
            file_name: &self.file_name,
            transforms: &self.transforms,
            body_format: &self.config.post_body_format,
        };
        let (all_posts, last_modified) =
            self.index.get_all(&parser, &self.config.posts_directory)?;

        let mut posts: Vec<&Post> = all_posts.values().filter(|p| p.published()).collect();
        posts.sort_by(|a, b| b.published_date.cmp(&a.published_date));

        if let Some(tag) = &query.tag {
            let wanted = tag.to_lowercase();
            posts.retain(|post| post.tags().iter().any(|t| t.to_lowercase() == wanted));
        } else if let Some(year) = &query.year {
            if let Ok(year) = year.parse::<i32>() {
                posts.retain(|post| post.published_date.map_or(false, |d| d.year() == year));
            }
            if !posts.is_empty() {
                if let Some(Ok(month)) = query.month.as_ref().map(|m| m.parse::<u32>()) {
                    posts.retain(|post| {
                        post.published_date.map_or(false, |d| d.month() == month)
                    });
                }
            }
            if !posts.is_empty() {
                if let Some(Ok(day)) = query.day.as_ref().map(|d| d.parse::<u32>()) {
                    posts.retain(|post| post.published_date.map_or(false, |d| d.day() == day));
                }
            }
        }

        let section = match query.kind {
            ArchiveKind::All => String::new(),
            ArchiveKind::Tag => query.tag.clone().unwrap_or_default(),
            _ => [&query.year, &query.month, &query.day]
                .iter()
                .filter_map(|part| part.as_deref())
                .collect::<Vec<&str>>()
                .join(" "),
        };

        let mut content = Header::new();
        content.insert(
            "posts",
            Value::Sequence(posts.iter().map(|p| p.to_value()).collect()),
        );
        content.insert("title", "Archive");
        content.insert("section", section);
        content.insert("is_post", false);
        Ok((content, last_modified))
    }

    /// Merges in the generic handler's shared content. A shared-content
    /// failure is ignored rather than failing the request; the more recent
    /// modification time wins.
    fn with_shared(
        &self,
        mut content: Header,
        is_post: bool,
        mut last_modified: Option<DateTime<Utc>>,
    ) -> Result<Negotiated> {
        match self.fallback.shared_content() {
            Ok((shared, shared_modified)) => {
                content.merge(shared);
                if shared_modified > last_modified {
                    last_modified = shared_modified;
                }
            }
            Err(err) => {
                tracing::debug!(error = %err, "ignoring shared content failure");
            }
        }
        Ok(Negotiated {
            content,
            is_post,
            last_modified,
        })
    }
}
