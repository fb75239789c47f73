use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WindowDefaults {
    width: f64,
    height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DesktopPlacement {
    x: i32,
    y: i32,
    kind: String,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    system: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AppManifest {
    schema_version: u32,
    app_id: String,
    title: String,
    content_type: String,
    #[serde(default)]
    component: Option<String>,
    #[serde(default)]
    handles_kinds: Vec<String>,
    #[serde(default)]
    window: Option<WindowDefaults>,
    #[serde(default)]
    desktop: Option<DesktopPlacement>,
}

const KNOWN_KINDS: [&str; 3] = ["app", "file", "folder"];

fn app_manifest_paths(root: &Path) -> Vec<PathBuf> {
    let dir = root.join("app_manifests");
    println!("cargo:rerun-if-changed={}", dir.display());
    let mut paths: Vec<PathBuf> = fs::read_dir(&dir)
        .unwrap_or_else(|err| panic!("failed to list {}: {err}", dir.display()))
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();
    paths
}

fn check_kind(path: &Path, kind: &str) {
    if !KNOWN_KINDS.contains(&kind) {
        panic!("unknown icon kind `{kind}` in {}", path.display());
    }
}

fn main() {
    let crate_root = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let mut manifests = Vec::<AppManifest>::new();
    let mut seen = BTreeSet::new();

    for path in app_manifest_paths(&crate_root) {
        println!("cargo:rerun-if-changed={}", path.display());
        let raw = fs::read_to_string(&path)
            .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
        let manifest: AppManifest = toml::from_str(&raw)
            .unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()));
        if manifest.schema_version != 1 {
            panic!(
                "manifest schema mismatch in {}: expected 1 found {}",
                path.display(),
                manifest.schema_version
            );
        }
        if !seen.insert(manifest.app_id.clone()) {
            panic!("duplicate app id `{}` in {}", manifest.app_id, path.display());
        }
        if let Some(desktop) = &manifest.desktop {
            check_kind(&path, &desktop.kind);
        }
        for kind in &manifest.handles_kinds {
            check_kind(&path, kind);
        }
        manifests.push(manifest);
    }

    // Desktop order: row-major by default placement, then undisplayed apps by id.
    manifests.sort_by(|a, b| {
        let key = |m: &AppManifest| m.desktop.as_ref().map(|d| (d.y, d.x));
        match (key(a), key(b)) {
            (Some(ka), Some(kb)) => ka.cmp(&kb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.app_id.cmp(&b.app_id),
        }
    });
    let json = serde_json::to_string_pretty(&manifests).expect("serialize app manifest catalog");
    let generated = format!(
        "/// Build-time generated app manifest catalog JSON.\n\
pub const APP_MANIFEST_CATALOG_JSON: &str = r##\"{}\"##;\n",
        json
    );

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR"));
    let out_file = out_dir.join("app_catalog_generated.rs");
    fs::write(&out_file, generated)
        .unwrap_or_else(|err| panic!("failed to write {}: {err}", out_file.display()));
}
