use camino::Utf8PathBuf;
use indexmap::{IndexMap, IndexSet};

/// Installed plugins keyed by their on-disk filename.
///
/// A filename can live in several data directories at once; every copy is a
/// separate install and is cleaned on its own. Keys are case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalModIndex {
    plugins: IndexMap<String, IndexSet<Utf8PathBuf>>,
}

impl LocalModIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a plugin file. Returns false if this exact path was already known.
    pub fn insert(&mut self, filename: impl Into<String>, path: impl Into<Utf8PathBuf>) -> bool {
        self.plugins
            .entry(filename.into())
            .or_default()
            .insert(path.into())
    }

    /// All paths sharing `filename`, if any are installed
    pub fn paths(&self, filename: &str) -> Option<&IndexSet<Utf8PathBuf>> {
        self.plugins.get(filename)
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.plugins.contains_key(filename)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexSet<Utf8PathBuf>)> {
        self.plugins.iter().map(|(name, paths)| (name.as_str(), paths))
    }

    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.plugins.keys().map(String::as_str)
    }

    /// Number of distinct filenames
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Number of plugin files across all filenames
    pub fn file_count(&self) -> usize {
        self.plugins.values().map(IndexSet::len).sum()
    }
}
