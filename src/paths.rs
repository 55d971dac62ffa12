//! Enumerates the exhaustive list of canonical output paths implied by the
//! post index: every permalink, every non-empty date archive, every tag
//! archive, and whatever the generic handler contributed for non-blog
//! content. Paths are deduplicated by exact string, so a `year/month` prefix
//! reachable through two different days is emitted only once.

use crate::index::PostIndex;
use crate::router::ArchiveTemplates;
use std::collections::HashSet;

/// Unions the generic handler's `default_paths` with the blog paths derived
/// from the index. Date and tag paths follow the aggregates' iteration
/// order; no further sort is imposed. Tag archive paths lower-case the tag
/// (the tag counts themselves keep case as written).
pub fn enumerate(
    index: &PostIndex,
    archives: &ArchiveTemplates,
    default_paths: Vec<String>,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut paths = Vec::new();
    let mut push = |path: String| {
        if seen.insert(path.clone()) {
            paths.push(path);
        }
    };

    for path in default_paths {
        push(path);
    }

    for post in index.posts().values() {
        if let Some(permalink) = &post.permalink {
            push(permalink.clone());
        }
    }

    push(archives.all.expand(&[]));
    for (year, months) in index.post_dates() {
        for (month, days) in months {
            for day in days {
                push(
                    archives
                        .year_month_date
                        .expand(&[year.as_str(), month.as_str(), day.as_str()]),
                );
                push(archives.year_month.expand(&[year.as_str(), month.as_str()]));
                push(archives.year.expand(&[year.as_str()]));
            }
        }
    }

    for tag in index.tag_counts().keys() {
        let tag = tag.to_lowercase();
        push(archives.tag.expand(&[tag.as_str()]));
    }

    paths
}

#[cfg(test)]
mod test {
    use crate::config::Config;
    use crate::error::Result;
    use crate::handler::testing::StubHandler;
    use crate::router::Router;
    use crate::transform::TransformRegistry;
    use crate::vfs::testing::MemFs;
    use std::rc::Rc;

    fn post_file(tags: &[&str]) -> String {
        format!("---\npublished: true\ntags: [{}]\n---\nbody\n", tags.join(", "))
    }

    fn router(fs: MemFs, stub: Rc<StubHandler>) -> Router {
        Router::new(
            Config::default(),
            TransformRegistry::default(),
            Box::new(stub),
            Box::new(fs),
        )
        .unwrap()
    }

    #[test]
    fn test_shared_prefixes_are_emitted_once() -> Result<()> {
        // two days in the same month: /2012 and /2012/11 must not repeat
        let mut fs = MemFs::new();
        fs.add("posts/2012-11-19-one.markdown", post_file(&["Rust"]));
        fs.add("posts/2012-11-20-two.markdown", post_file(&["rust"]));
        let mut router = router(fs, Rc::new(StubHandler::default()));

        let paths = router.content_paths("/")?;
        for wanted in [
            "/2012",
            "/2012/11",
            "/2012/11/19",
            "/2012/11/20",
            "/archive",
            "/2012/11/19/one",
            "/2012/11/20/two",
            "/tag/rust",
        ]
        .iter()
        {
            assert_eq!(
                paths.iter().filter(|p| p.as_str() == *wanted).count(),
                1,
                "wanted exactly one `{}` in {:?}",
                wanted,
                paths,
            );
        }
        Ok(())
    }

    #[test]
    fn test_includes_generic_handler_paths() -> Result<()> {
        let stub = Rc::new(StubHandler {
            paths: vec!["/about".to_owned(), "/contact".to_owned()],
            ..StubHandler::default()
        });
        let mut fs = MemFs::new();
        fs.add("posts/2012-02-01-post.markdown", post_file(&[]));
        let mut router = router(fs, Rc::clone(&stub));

        let paths = router.content_paths("/")?;
        assert_eq!(&paths[..2], &["/about".to_owned(), "/contact".to_owned()]);
        assert!(paths.contains(&"/2012/02/01/post".to_owned()));
        Ok(())
    }

    #[test]
    fn test_non_root_basepath_is_delegated_untouched() -> Result<()> {
        let stub = Rc::new(StubHandler {
            paths: vec!["/about/history".to_owned()],
            ..StubHandler::default()
        });
        let mut fs = MemFs::new();
        fs.add("posts/2012-02-01-post.markdown", post_file(&[]));
        let mut router = router(fs, Rc::clone(&stub));

        let paths = router.content_paths("/about")?;
        assert_eq!(paths, ["/about/history".to_owned()]);
        Ok(())
    }
}
