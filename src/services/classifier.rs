use crate::models::{CatalogStatus, DEFAULT_STATUS_LINK, DetailPageResult};
use regex::Regex;

/// Decides from the markup of a catalog detail page whether the mod's
/// plugins need cleaning, and which plugins the page lists.
///
/// # Patterns
///
/// - `status_pattern`: the anchor pointing at the cleaning documentation;
///   its text starts with `Y`/`y` (dirty) or `N`/`n` (clean).
///   Example match: `<a href="/tips/cleaning-with-tes3cmd/">Yes</a>`
/// - `plugin_pattern`: a run of non-`>` characters ending in the literal,
///   case-sensitive suffix `.esp`. Example match: `Foo.esp` in `<li>Foo.esp</li>`
///
/// Only the first status marker on a page counts. A page without one is
/// treated as clean and yields no plugins.
#[derive(Debug, Clone)]
pub struct PageClassifier {
    status_pattern: Regex,
    plugin_pattern: Regex,
}

impl PageClassifier {
    /// Classifier for the default status link href
    pub fn new() -> Self {
        Self::with_status_link(DEFAULT_STATUS_LINK)
    }

    /// Classifier looking for the verdict on a link to `href`
    pub fn with_status_link(href: &str) -> Self {
        let status = format!(r#"<a href="{}">([yYnN][^<]*)</a>"#, regex::escape(href));
        Self {
            status_pattern: Regex::new(&status).expect("Invalid status regex"),
            plugin_pattern: Regex::new(r"[^>]+\.esp").expect("Invalid plugin regex"),
        }
    }

    /// Read the verdict from the first status marker on the page
    pub fn status(&self, body: &str) -> CatalogStatus {
        let Some(verdict) = self
            .status_pattern
            .captures(body)
            .and_then(|caps| caps.get(1))
        else {
            return CatalogStatus::Unknown;
        };

        match verdict.as_str().chars().next() {
            Some('y' | 'Y') => CatalogStatus::Dirty,
            Some('n' | 'N') => CatalogStatus::Clean,
            _ => CatalogStatus::Unknown,
        }
    }

    /// Classify a detail page body.
    ///
    /// Plugin names are only extracted from dirty pages, in page order and
    /// with duplicates kept.
    pub fn classify(&self, body: &str) -> DetailPageResult {
        match self.status(body) {
            CatalogStatus::Dirty => DetailPageResult::dirty(
                self.plugin_pattern
                    .find_iter(body)
                    .map(|m| m.as_str().to_string())
                    .collect(),
            ),
            status => DetailPageResult::not_dirty(status),
        }
    }
}

impl Default for PageClassifier {
    fn default() -> Self {
        Self::new()
    }
}
