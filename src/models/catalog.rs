use reqwest::Url;
use std::collections::HashSet;
use thiserror::Error;

/// Cleanliness of a plugin as published on its catalog detail page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogStatus {
    Clean,
    Dirty,
    /// No status marker was found on the page
    Unknown,
}

/// Classification of a single catalog detail page
///
/// Built and consumed within one scan worker; `plugins` is only populated
/// when the page is marked dirty. Duplicates are kept in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPageResult {
    pub status: CatalogStatus,
    pub plugins: Vec<String>,
}

impl DetailPageResult {
    /// A page that contributes nothing to the dirty set
    pub fn not_dirty(status: CatalogStatus) -> Self {
        Self {
            status,
            plugins: Vec::new(),
        }
    }

    pub fn dirty(plugins: Vec<String>) -> Self {
        Self {
            status: CatalogStatus::Dirty,
            plugins,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.status == CatalogStatus::Dirty
    }
}

/// Set of plugin filenames the catalog marks as needing a cleaning pass.
///
/// Merging is plain set union, so the final set does not depend on the
/// order in which scan workers finish.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtyModSet {
    plugins: HashSet<String>,
}

impl DirtyModSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union a page result into the set. Pages that are not dirty are ignored.
    pub fn merge(&mut self, result: DetailPageResult) {
        if result.is_dirty() {
            self.plugins.extend(result.plugins);
        }
    }

    pub fn contains(&self, plugin: &str) -> bool {
        self.plugins.contains(plugin)
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.plugins.iter().map(String::as_str)
    }

    /// Sorted copy of the set, for stable logging
    pub fn sorted(&self) -> Vec<&str> {
        let mut plugins: Vec<&str> = self.iter().collect();
        plugins.sort_unstable();
        plugins
    }
}

impl<S: Into<String>> FromIterator<S> for DirtyModSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            plugins: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl Extend<DetailPageResult> for DirtyModSet {
    fn extend<I: IntoIterator<Item = DetailPageResult>>(&mut self, iter: I) {
        for result in iter {
            self.merge(result);
        }
    }
}

/// Errors from interpreting the catalog index URL
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogUrlError {
    #[error("Invalid mod list URL {url}: {reason}")]
    Invalid { url: String, reason: String },

    #[error("Unsupported URL scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),

    #[error("Mod list URL {0} has no host")]
    MissingHost(String),
}

/// Location of the catalog index page.
///
/// `host` is the full network location, including an explicit port when the
/// URL carries one, since every detail page is fetched from the same place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRoot {
    pub scheme: String,
    pub host: String,
    pub path: String,
}

impl CatalogRoot {
    /// Split a mod list URL such as `https://modding-openmw.com/lists/total-overhaul/`
    pub fn parse(url: &str) -> Result<Self, CatalogUrlError> {
        let parsed = Url::parse(url).map_err(|e| CatalogUrlError::Invalid {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let scheme = parsed.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(CatalogUrlError::UnsupportedScheme(scheme.to_string()));
        }

        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| CatalogUrlError::MissingHost(url.to_string()))?;

        let host = match parsed.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let path = match parsed.path() {
            "" => "/".to_string(),
            p => p.to_string(),
        };

        Ok(Self {
            scheme: scheme.to_string(),
            host,
            path,
        })
    }
}
