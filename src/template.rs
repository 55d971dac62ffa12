//! Compiles human-readable URL templates (e.g.
//! `/{year}/{month}/{date}/{title}`) into matchers and generators.
//!
//! A compiled [`UrlTemplate`] carries three things: a matching pattern with
//! one capture group per placeholder, the ordered placeholder list (capture
//! positions are assigned left to right, exactly once per occurrence), and
//! the literal skeleton used to generate concrete paths by positional
//! substitution. The placeholder list is produced here exactly once; the
//! derived [`FileNamePattern`] consumes it rather than re-deriving order from
//! the template text.

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::BTreeMap;

/// Maps placeholder names to the regular-expression class their values must
/// satisfy. The default set covers the blog placeholders: `year` is four
/// digits, `month` and `date` are two digits, `title` and `tag` are
/// one-or-more non-slash, non-whitespace characters.
pub struct SemanticClasses(BTreeMap<String, String>);

impl Default for SemanticClasses {
    fn default() -> SemanticClasses {
        let mut classes = BTreeMap::new();
        classes.insert("year".to_owned(), r"\d\d\d\d".to_owned());
        classes.insert("month".to_owned(), r"\d\d".to_owned());
        classes.insert("date".to_owned(), r"\d\d".to_owned());
        classes.insert("title".to_owned(), r"[^/\s]+".to_owned());
        classes.insert("tag".to_owned(), r"[^/\s]+".to_owned());
        SemanticClasses(classes)
    }
}

impl SemanticClasses {
    /// Registers (or overrides) the class for a placeholder name.
    pub fn insert(&mut self, name: impl Into<String>, class: impl Into<String>) {
        self.0.insert(name.into(), class.into());
    }

    fn class(&self, name: &str) -> Result<&str> {
        match self.0.get(name) {
            Some(class) => Ok(class),
            None => Err(Error::UnknownPlaceholder(name.to_owned())),
        }
    }
}

/// A compiled URL template.
pub struct UrlTemplate {
    source: String,
    pattern: String,
    placeholders: Vec<String>,
    // `placeholders.len() + 1` literal segments; placeholder `i` sits
    // between `literals[i]` and `literals[i + 1]`.
    literals: Vec<String>,
}

impl UrlTemplate {
    /// Compiles `template`, replacing each `{name}` with a parenthesized
    /// group from `classes` and escaping everything else literally. A
    /// placeholder with no registered class is a configuration error.
    pub fn compile(template: &str, classes: &SemanticClasses) -> Result<UrlTemplate> {
        let finder = Regex::new(r"\{[^{}]+\}")?;

        let mut pattern = String::new();
        let mut placeholders = Vec::new();
        let mut literals = Vec::new();
        let mut tail = 0;
        for found in finder.find_iter(template) {
            let name = &template[found.start() + 1..found.end() - 1];
            let literal = &template[tail..found.start()];
            pattern.push_str(&regex::escape(literal));
            pattern.push('(');
            pattern.push_str(classes.class(name)?);
            pattern.push(')');
            literals.push(literal.to_owned());
            placeholders.push(name.to_owned());
            tail = found.end();
        }
        pattern.push_str(&regex::escape(&template[tail..]));
        literals.push(template[tail..].to_owned());

        Ok(UrlTemplate {
            source: template.to_owned(),
            pattern,
            placeholders,
            literals,
        })
    }

    /// The template string this was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The anchorless matching pattern. Callers anchor it themselves (e.g.
    /// `^{pattern}$` or `^{pattern}/index$`).
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Placeholder names in encounter order. The capture group for
    /// `placeholders()[i]` is `i + 1`.
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// The 1-based capture position of the first occurrence of `name`.
    pub fn group(&self, name: &str) -> Option<usize> {
        self.placeholders.iter().position(|p| p == name).map(|i| i + 1)
    }

    /// Substitutes `values` into the template's literal skeleton. The
    /// substitution is purely positional, so repeated placeholder names in
    /// exotic templates behave predictably. Missing trailing values leave
    /// their slots empty.
    pub fn expand(&self, values: &[&str]) -> String {
        let mut out = String::new();
        for (i, literal) in self.literals.iter().enumerate() {
            out.push_str(literal);
            if let Some(value) = values.get(i) {
                out.push_str(value);
            }
        }
        out
    }
}

/// The matcher for the on-disk file name of a post. Derived from the post
/// URL template's placeholder list in declaration order, joined by a fixed
/// separator; field identity is discarded (matching is positional-only,
/// aligned with the URL template's mapping order).
pub struct FileNamePattern {
    regex: Regex,
}

impl FileNamePattern {
    /// Builds the matcher for `template`'s placeholders. The leading
    /// directory prefix is optional so the matcher accepts both a full path
    /// and a bare base name.
    pub fn for_template(
        template: &UrlTemplate,
        classes: &SemanticClasses,
        separator: &str,
    ) -> Result<FileNamePattern> {
        let mut pattern = String::from("^(?:.*/)?");
        for (i, name) in template.placeholders().iter().enumerate() {
            if i > 0 {
                pattern.push_str(&regex::escape(separator));
            }
            pattern.push('(');
            pattern.push_str(classes.class(name)?);
            pattern.push(')');
        }
        pattern.push_str(r"\.\S+$");
        Ok(FileNamePattern {
            regex: Regex::new(&pattern)?,
        })
    }

    /// Extracts the slug values from a file path or base name, aligned with
    /// the post template's placeholder order. Returns `None` when the name
    /// does not match.
    pub fn extract<'a>(&self, path: &'a str) -> Option<Vec<&'a str>> {
        self.regex.captures(path).map(|captures| {
            (1..captures.len())
                .filter_map(|i| captures.get(i))
                .map(|group| group.as_str())
                .collect()
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_compile_post_template() -> Result<()> {
        let template =
            UrlTemplate::compile("/{year}/{month}/{date}/{title}", &SemanticClasses::default())?;
        assert_eq!(
            template.pattern(),
            r"/(\d\d\d\d)/(\d\d)/(\d\d)/([^/\s]+)"
        );
        assert_eq!(template.placeholders(), ["year", "month", "date", "title"]);
        assert_eq!(template.group("year"), Some(1));
        assert_eq!(template.group("title"), Some(4));
        assert_eq!(template.group("tag"), None);
        Ok(())
    }

    #[test]
    fn test_match_recovers_expanded_values() -> Result<()> {
        // compiling then matching a path built by substitution recovers
        // exactly the substituted values, in declaration order
        let template =
            UrlTemplate::compile("/{year}/{month}/{date}/{title}", &SemanticClasses::default())?;
        let values = ["2012", "02", "01", "hello-world"];
        let path = template.expand(&values);
        assert_eq!(path, "/2012/02/01/hello-world");

        let anchored = Regex::new(&format!("^{}$", template.pattern()))?;
        let captures = anchored.captures(&path).unwrap();
        let recovered: Vec<&str> = (1..captures.len())
            .map(|i| captures.get(i).unwrap().as_str())
            .collect();
        assert_eq!(recovered, values);
        Ok(())
    }

    #[test]
    fn test_literal_segments_are_escaped() -> Result<()> {
        let template = UrlTemplate::compile("/tag/{tag}", &SemanticClasses::default())?;
        assert_eq!(template.pattern(), r"/tag/([^/\s]+)");

        let anchored = Regex::new(&format!("^{}$", template.pattern()))?;
        assert!(anchored.is_match("/tag/rust"));
        assert!(!anchored.is_match("/2012/rust"));

        // a metacharacter in a literal segment matches only itself
        let dotted = UrlTemplate::compile("/a.b/{tag}", &SemanticClasses::default())?;
        let anchored = Regex::new(&format!("^{}$", dotted.pattern()))?;
        assert!(anchored.is_match("/a.b/x"));
        assert!(!anchored.is_match("/aXb/x"));
        Ok(())
    }

    #[test]
    fn test_repeated_placeholders_expand_positionally() -> Result<()> {
        let template = UrlTemplate::compile("/{year}/{year}", &SemanticClasses::default())?;
        assert_eq!(template.placeholders(), ["year", "year"]);
        assert_eq!(template.expand(&["2011", "2012"]), "/2011/2012");
        Ok(())
    }

    #[test]
    fn test_unknown_placeholder_is_fatal() {
        match UrlTemplate::compile("/{season}", &SemanticClasses::default()) {
            Err(Error::UnknownPlaceholder(name)) => assert_eq!(name, "season"),
            other => panic!("wanted UnknownPlaceholder, got {:?}", other.map(|t| t.pattern().to_owned())),
        }
    }

    #[test]
    fn test_file_name_extraction() -> Result<()> {
        let classes = SemanticClasses::default();
        let template = UrlTemplate::compile("/{year}/{month}/{date}/{title}", &classes)?;
        let pattern = FileNamePattern::for_template(&template, &classes, "-")?;

        assert_eq!(
            pattern.extract("posts/2012-02-01-hello-world.markdown"),
            Some(vec!["2012", "02", "01", "hello-world"]),
        );
        // the directory prefix is optional
        assert_eq!(
            pattern.extract("2012-02-01-hello-world.markdown"),
            Some(vec!["2012", "02", "01", "hello-world"]),
        );
        assert_eq!(pattern.extract("posts/about.markdown"), None);
        Ok(())
    }
}
