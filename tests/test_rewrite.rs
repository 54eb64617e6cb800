use std::fs;

use tempfile::tempdir;
use tino_build::config::BuildConfig;
use tino_build::rewrite::rewrite_bundles;

fn test_config() -> BuildConfig {
    BuildConfig::embedded().unwrap()
}

#[test]
fn test_style_references_are_rewritten() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(
        root.join("tino-design-ui.mjs"),
        "import \"./Space/space.scss\";\nimport \"./Upload/upload.scss\";\n",
    )
    .unwrap();

    let report = rewrite_bundles(root, &test_config(), false).unwrap();

    assert_eq!(report.scanned, 1);
    assert_eq!(report.rewritten, 1);
    // Asset re-emitted under its unchanged name
    let text = fs::read_to_string(root.join("tino-design-ui.mjs")).unwrap();
    assert_eq!(
        text,
        "import \"./Space/space.css\";\nimport \"./Upload/upload.css\";\n"
    );
}

#[test]
fn test_assets_without_references_are_left_alone() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("install.js"), "export default {};\n").unwrap();

    let report = rewrite_bundles(root, &test_config(), false).unwrap();

    assert_eq!(report.scanned, 1);
    assert_eq!(report.rewritten, 0);
}

#[test]
fn test_non_asset_extensions_are_not_scanned() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("notes.txt"), "refers to space.scss").unwrap();
    fs::write(root.join("space.css"), ".space { margin: 8px; }").unwrap();

    let report = rewrite_bundles(root, &test_config(), false).unwrap();

    assert_eq!(report.scanned, 0);
    assert_eq!(
        fs::read_to_string(root.join("notes.txt")).unwrap(),
        "refers to space.scss"
    );
}

#[test]
fn test_declaration_files_are_rewritten() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("Space")).unwrap();
    fs::write(
        root.join("Space/space.d.ts"),
        "import './space.scss';\nexport declare const Space: unknown;\n",
    )
    .unwrap();

    let report = rewrite_bundles(root, &test_config(), false).unwrap();

    assert_eq!(report.rewritten, 1);
    let text = fs::read_to_string(root.join("Space/space.d.ts")).unwrap();
    assert!(text.contains("./space.css"));
    assert!(!text.contains(".scss"));
}

#[test]
fn test_skip_directories_are_not_rewritten() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("node_modules/sass")).unwrap();
    fs::write(
        root.join("node_modules/sass/index.js"),
        "// handles .scss input\n",
    )
    .unwrap();

    let report = rewrite_bundles(root, &test_config(), false).unwrap();

    assert_eq!(report.scanned, 0);
    assert_eq!(
        fs::read_to_string(root.join("node_modules/sass/index.js")).unwrap(),
        "// handles .scss input\n"
    );
}

#[test]
fn test_missing_root_is_a_noop() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("package");

    let report = rewrite_bundles(&missing, &test_config(), false).unwrap();

    assert_eq!(report.scanned, 0);
    assert_eq!(report.rewritten, 0);
}
