//! The external generic content handler: the collaborator that owns every
//! path the blog engine does not classify as blog-related. It is an injected
//! capability supplied at router construction, so tests can substitute a
//! stub without any global state.

use crate::error::Result;
use crate::value::Header;
use chrono::{DateTime, Utc};

/// The outcome of content negotiation: the merged content map, whether the
/// path was a single post, and the modification time governing cache
/// freshness.
#[derive(Clone, Debug, PartialEq)]
pub struct Negotiated {
    pub content: Header,
    pub is_post: bool,
    pub last_modified: Option<DateTime<Utc>>,
}

/// The generic (non-blog) content handler. Paths the router cannot classify
/// are delegated here verbatim.
pub trait GenericHandler {
    /// Whether the handler treats `basepath` as a directory-like section.
    fn is_section(&self, basepath: &str) -> bool;

    /// The sections the handler knows about.
    fn sections(&self) -> Vec<String>;

    /// The canonical output paths for the handler's own (non-blog) content.
    fn content_paths(&self, basepath: &str) -> Result<Vec<String>>;

    /// Content shared by every page, plus its modification time.
    fn shared_content(&self) -> Result<(Header, Option<DateTime<Utc>>)>;

    /// Negotiates content for a path the blog engine does not handle.
    fn negotiate_content(&self, basepath: &str, content_type: &str) -> Result<Negotiated>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;

    /// A canned [`GenericHandler`] that records delegations.
    #[derive(Default)]
    pub struct StubHandler {
        pub sections: Vec<String>,
        pub paths: Vec<String>,
        pub shared: Header,
        pub shared_modified: Option<DateTime<Utc>>,
        pub delegations: RefCell<Vec<String>>,
    }

    impl GenericHandler for StubHandler {
        fn is_section(&self, basepath: &str) -> bool {
            self.sections.iter().any(|s| s == basepath)
        }

        fn sections(&self) -> Vec<String> {
            self.sections.clone()
        }

        fn content_paths(&self, _basepath: &str) -> Result<Vec<String>> {
            Ok(self.paths.clone())
        }

        fn shared_content(&self) -> Result<(Header, Option<DateTime<Utc>>)> {
            Ok((self.shared.clone(), self.shared_modified))
        }

        fn negotiate_content(&self, basepath: &str, _content_type: &str) -> Result<Negotiated> {
            self.delegations.borrow_mut().push(basepath.to_owned());
            let mut content = Header::new();
            content.insert("delegated", true);
            Ok(Negotiated {
                content,
                is_post: false,
                last_modified: None,
            })
        }
    }

    // lets a test hold onto the stub it hands the router
    impl GenericHandler for std::rc::Rc<StubHandler> {
        fn is_section(&self, basepath: &str) -> bool {
            (**self).is_section(basepath)
        }

        fn sections(&self) -> Vec<String> {
            (**self).sections()
        }

        fn content_paths(&self, basepath: &str) -> Result<Vec<String>> {
            (**self).content_paths(basepath)
        }

        fn shared_content(&self) -> Result<(Header, Option<DateTime<Utc>>)> {
            (**self).shared_content()
        }

        fn negotiate_content(&self, basepath: &str, content_type: &str) -> Result<Negotiated> {
            (**self).negotiate_content(basepath, content_type)
        }
    }
}
