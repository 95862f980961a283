//! Integration tests for building the local plugin index from openmw.cfg

use camino::Utf8Path;
use omw_cleaner::services::openmw::{build_local_index, load_data_dirs};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_index_from_openmw_cfg() {
    let temp_dir = TempDir::new().unwrap();
    let root = Utf8Path::from_path(temp_dir.path()).unwrap();

    let vanilla = root.join("Morrowind").join("Data Files");
    let patch = root.join("mods").join("Patch");
    fs::create_dir_all(&vanilla).unwrap();
    fs::create_dir_all(patch.join("optional")).unwrap();

    fs::write(vanilla.join("Morrowind.esm"), b"").unwrap();
    fs::write(vanilla.join("Tribunal.esm"), b"").unwrap();
    fs::write(vanilla.join("Shared.esp"), b"").unwrap();
    fs::write(patch.join("Shared.esp"), b"").unwrap();
    fs::write(patch.join("optional").join("Extra.ESP"), b"").unwrap();
    fs::write(patch.join("readme.txt"), b"").unwrap();

    let cfg = root.join("openmw.cfg");
    fs::write(
        &cfg,
        format!(
            "# OpenMW config\ndata=\"{}\"\ndata=\"{}\"\ncontent=Morrowind.esm\ncontent=Shared.esp\n",
            vanilla, patch
        ),
    )
    .unwrap();

    let data_dirs = load_data_dirs(&cfg).unwrap();
    assert_eq!(data_dirs, vec![vanilla.clone(), patch.clone()]);

    let index = build_local_index(&data_dirs);
    assert_eq!(index.len(), 2);
    assert_eq!(index.file_count(), 3);

    let shared: Vec<_> = index.paths("Shared.esp").unwrap().iter().cloned().collect();
    assert_eq!(shared, vec![vanilla.join("Shared.esp"), patch.join("Shared.esp")]);
    assert!(index.contains("Extra.ESP"));
    assert!(index.filenames().all(|name| !name.ends_with(".esm")));
}

#[test]
fn test_empty_config_gives_empty_index() {
    let temp_dir = TempDir::new().unwrap();
    let root = Utf8Path::from_path(temp_dir.path()).unwrap();
    let cfg = root.join("openmw.cfg");
    fs::write(&cfg, "# nothing here\n").unwrap();

    let data_dirs = load_data_dirs(&cfg).unwrap();
    assert!(data_dirs.is_empty());
    assert!(build_local_index(&data_dirs).is_empty());
}
