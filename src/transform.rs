//! The per-format body transform registry. A post's body is handed to the
//! transform registered for the configured body format; when no transform is
//! registered the body passes through raw, which is not an error.

use crate::error::Result;
use pulldown_cmark::{html, Options, Parser};
use std::collections::BTreeMap;

/// A body transform for one post format.
pub trait Transform {
    /// Transforms a raw post body into its output form.
    fn parse(&self, raw: &str) -> Result<String>;
}

/// Maps format names (e.g. `markdown`) to their [`Transform`].
pub struct TransformRegistry {
    transforms: BTreeMap<String, Box<dyn Transform>>,
}

impl Default for TransformRegistry {
    /// A registry with the built-in markdown transform.
    fn default() -> TransformRegistry {
        let mut registry = TransformRegistry::empty();
        registry.register("markdown", Box::new(MarkdownTransform));
        registry
    }
}

impl TransformRegistry {
    /// A registry with no transforms at all; every body passes through raw.
    pub fn empty() -> TransformRegistry {
        TransformRegistry {
            transforms: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, format: impl Into<String>, transform: Box<dyn Transform>) {
        self.transforms.insert(format.into(), transform);
    }

    pub fn get(&self, format: &str) -> Option<&dyn Transform> {
        self.transforms.get(format).map(|t| t.as_ref())
    }
}

/// The built-in markdown-to-HTML transform.
pub struct MarkdownTransform;

impl Transform for MarkdownTransform {
    fn parse(&self, raw: &str) -> Result<String> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);

        let mut out = String::new();
        html::push_html(&mut out, Parser::new_ext(raw, options));
        Ok(out)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_markdown_transform() -> Result<()> {
        let registry = TransformRegistry::default();
        let transform = registry.get("markdown").unwrap();
        assert_eq!(transform.parse("# Hello\n\nWorld")?, "<h1>Hello</h1>\n<p>World</p>\n");
        Ok(())
    }

    #[test]
    fn test_unregistered_format() {
        let registry = TransformRegistry::default();
        assert!(registry.get("textile").is_none());
        assert!(TransformRegistry::empty().get("markdown").is_none());
    }
}
