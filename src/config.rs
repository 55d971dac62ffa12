//! The engine's configuration surface. Every field is optional; the defaults
//! reproduce the conventional blog layout: posts in `posts/`, permalinks of
//! the form `/{year}/{month}/{date}/{title}`, markdown bodies, and the five
//! archive views.

use serde::Deserialize;
use std::path::PathBuf;

/// Separator between slug values in a post's on-disk file name (base name =
/// slug values joined by the separator, in placeholder declaration order,
/// plus the body-format extension).
pub const SLUG_SEPARATOR: &str = "-";

/// URL templates for the five archive views.
#[derive(Clone, Debug, Deserialize)]
pub struct ArchiveUrls {
    /// The whole-archive view.
    #[serde(default = "default_all")]
    pub all: String,

    #[serde(default = "default_year")]
    pub year: String,

    #[serde(default = "default_year_month")]
    pub year_month: String,

    #[serde(default = "default_year_month_date")]
    pub year_month_date: String,

    #[serde(default = "default_tag")]
    pub tag: String,
}

impl Default for ArchiveUrls {
    fn default() -> ArchiveUrls {
        ArchiveUrls {
            all: default_all(),
            year: default_year(),
            year_month: default_year_month(),
            year_month_date: default_year_month_date(),
            tag: default_tag(),
        }
    }
}

fn default_all() -> String {
    "/archive".to_owned()
}

fn default_year() -> String {
    "/{year}".to_owned()
}

fn default_year_month() -> String {
    "/{year}/{month}".to_owned()
}

fn default_year_month_date() -> String {
    "/{year}/{month}/{date}".to_owned()
}

fn default_tag() -> String {
    "/tag/{tag}".to_owned()
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// The directory holding post source files.
    #[serde(default = "default_posts_directory")]
    pub posts_directory: PathBuf,

    /// The URL template for single posts.
    #[serde(default = "default_post_url")]
    pub post_url: String,

    /// The body format, which doubles as the post files' extension and as
    /// the transform-registry key.
    #[serde(default = "default_post_body_format")]
    pub post_body_format: String,

    #[serde(default)]
    pub archive_urls: ArchiveUrls,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            posts_directory: default_posts_directory(),
            post_url: default_post_url(),
            post_body_format: default_post_body_format(),
            archive_urls: ArchiveUrls::default(),
        }
    }
}

fn default_posts_directory() -> PathBuf {
    PathBuf::from("posts")
}

fn default_post_url() -> String {
    "/{year}/{month}/{date}/{title}".to_owned()
}

fn default_post_body_format() -> String {
    "markdown".to_owned()
}

impl Config {
    /// Loads a configuration from YAML; absent fields keep their defaults.
    pub fn from_yaml(contents: &str) -> Result<Config, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }
}
