//! Local plugin discovery from an OpenMW installation.
//!
//! The `data=` entries of `openmw.cfg` list the directories OpenMW loads
//! content from. Every `.esp` file under them is indexed by its filename:
//!
//! ```ignore
//! use omw_cleaner::services::openmw::{build_local_index, load_data_dirs};
//!
//! let data_dirs = load_data_dirs(Utf8Path::new("/home/me/.config/openmw/openmw.cfg"))?;
//! let index = build_local_index(&data_dirs);
//! ```

use crate::models::LocalModIndex;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use walkdir::WalkDir;

/// Extract the data directories from the text of an `openmw.cfg`.
///
/// Blank lines, `#` comments and lines without `=` are skipped. Quoted
/// values have their quotes removed and OpenMW's `&` escapes resolved.
pub fn parse_data_dirs(cfg_text: &str) -> Vec<Utf8PathBuf> {
    cfg_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .filter(|(key, _)| key.trim() == "data")
        .map(|(_, value)| Utf8PathBuf::from(unquote(value.trim())))
        .collect()
}

/// Strip surrounding double quotes, resolving `&&` and `&"` inside them
fn unquote(value: &str) -> String {
    let Some(inner) = value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return value.to_string();
    };

    let mut unescaped = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '&' {
            match chars.next() {
                Some(escaped) => unescaped.push(escaped),
                None => unescaped.push('&'),
            }
        } else {
            unescaped.push(c);
        }
    }
    unescaped
}

/// Read `openmw.cfg` and return its data directories in file order.
pub fn load_data_dirs(cfg_path: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    let text = fs::read_to_string(cfg_path)
        .with_context(|| format!("Failed to read OpenMW config: {}", cfg_path))?;

    let data_dirs = parse_data_dirs(&text);
    tracing::info!("Found {} data directories in {}", data_dirs.len(), cfg_path);
    Ok(data_dirs)
}

fn is_plugin_file(name: &str) -> bool {
    name.len() >= 4
        && name
            .get(name.len() - 4..)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(".esp"))
}

/// Walk every data directory and index each `.esp` file (suffix matched
/// case-insensitively) under its exact on-disk filename.
///
/// Entries that cannot be read are logged and skipped.
pub fn build_local_index(data_dirs: &[Utf8PathBuf]) -> LocalModIndex {
    let mut index = LocalModIndex::new();

    for data_dir in data_dirs {
        for entry in WalkDir::new(data_dir) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry under {}: {}", data_dir, e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = match Utf8PathBuf::from_path_buf(entry.into_path()) {
                Ok(path) => path,
                Err(path) => {
                    tracing::warn!("Skipping non UTF-8 path: {}", path.display());
                    continue;
                }
            };

            if let Some(name) = path.file_name().filter(|name| is_plugin_file(name)) {
                index.insert(name, path.clone());
            }
        }
    }

    tracing::info!(
        "Indexed {} plugin files ({} distinct names)",
        index.file_count(),
        index.len()
    );
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_parse_data_dirs() {
        let cfg = r#"
# comment line
fallback-archive=Morrowind.bsa
data="/games/Morrowind/Data Files"
data = /mods/Plain
content=Morrowind.esm
nonsense line
data="/mods/Rock && Roll"
data="/mods/&"Quoted&""
"#;
        assert_eq!(
            parse_data_dirs(cfg),
            vec![
                Utf8PathBuf::from("/games/Morrowind/Data Files"),
                Utf8PathBuf::from("/mods/Plain"),
                Utf8PathBuf::from("/mods/Rock & Roll"),
                Utf8PathBuf::from("/mods/\"Quoted\""),
            ]
        );
    }

    #[test]
    fn test_value_with_equals_sign() {
        assert_eq!(
            parse_data_dirs("data=/mods/a=b\n"),
            vec![Utf8PathBuf::from("/mods/a=b")]
        );
    }

    #[test]
    fn test_load_data_dirs_missing_file() {
        assert!(load_data_dirs(Utf8Path::new("/nonexistent/openmw.cfg")).is_err());
    }

    #[test]
    fn test_load_data_dirs_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "data=/mods/One").unwrap();
        writeln!(temp_file, "data=\"/mods/Two\"").unwrap();

        let path = Utf8Path::from_path(temp_file.path()).unwrap();
        assert_eq!(load_data_dirs(path).unwrap().len(), 2);
    }

    #[test]
    fn test_is_plugin_file() {
        assert!(is_plugin_file("Foo.esp"));
        assert!(is_plugin_file("Foo.ESP"));
        assert!(!is_plugin_file("Foo.esm"));
        assert!(!is_plugin_file("esp"));
        assert!(!is_plugin_file("Foo.esp.bak"));
    }

    #[test]
    fn test_build_local_index() {
        let temp_dir = TempDir::new().unwrap();
        let root = Utf8Path::from_path(temp_dir.path()).unwrap();
        let first = root.join("first");
        let second = root.join("second");
        fs::create_dir_all(first.join("nested")).unwrap();
        fs::create_dir_all(&second).unwrap();

        fs::write(first.join("Foo.esp"), b"").unwrap();
        fs::write(first.join("nested").join("Bar.ESP"), b"").unwrap();
        fs::write(first.join("Master.esm"), b"").unwrap();
        fs::write(second.join("Foo.esp"), b"").unwrap();

        let index = build_local_index(&[first.clone(), second.clone(), root.join("missing")]);

        assert_eq!(index.len(), 2);
        assert_eq!(index.file_count(), 3);
        let foo = index.paths("Foo.esp").unwrap();
        assert!(foo.contains(&first.join("Foo.esp")));
        assert!(foo.contains(&second.join("Foo.esp")));
        assert!(index.contains("Bar.ESP"));
        assert!(!index.contains("Master.esm"));
    }
}
