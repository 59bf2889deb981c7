use std::{
    env, fs,
    path::{Path, PathBuf},
};

use m100_common::version::BuildVersion;

use crate::version;

pub const BUILD_VERSION_VAR: &str = "M100_BUILD_VERSION";
pub const FRAMEWORK_DIR_VAR: &str = "M100_FRAMEWORK_DIR";
pub const CONFIG_DIR_VAR: &str = "M100_CONFIG_DIR";

/// Where the framework and config trees live: the override variables when set, otherwise the
/// workspace root and the firmware crate.
///
/// Both defaults sit in this one git repository, so without the overrides the two halves of the
/// build version are the same description. Point `M100_CONFIG_DIR` at a separate keymap checkout
/// to version it on its own.
pub fn source_dirs(manifest: &Path) -> (PathBuf, PathBuf) {
    let framework = env::var_os(FRAMEWORK_DIR_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| manifest.parent().unwrap_or(manifest).to_path_buf());
    let config = env::var_os(CONFIG_DIR_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| manifest.to_path_buf());
    (framework, config)
}

fn rerun_if_git_changes(dir: &Path) {
    for file in ["HEAD", "index"] {
        let path = dir.join(".git").join(file);
        if fs::exists(&path).unwrap_or(false) {
            println!("cargo:rerun-if-changed={}", path.display());
        }
    }
}

/// This build script exports the `<framework>::<config>` version string as
/// `M100_BUILD_VERSION` for the version-info macro.
pub fn build_rs() {
    let manifest =
        PathBuf::from(env::var_os("CARGO_MANIFEST_DIR").expect("missing CARGO_MANIFEST_DIR"));
    let (framework, config) = source_dirs(&manifest);

    let build_version = version::build_version(&framework, &config);
    println!("cargo:rustc-env={BUILD_VERSION_VAR}={build_version}");
    if BuildVersion::parse(&build_version).is_some_and(|v| v.is_dirty()) {
        println!("cargo:warning=building with uncommitted changes: {build_version}");
    }

    println!("cargo:rerun-if-env-changed={FRAMEWORK_DIR_VAR}");
    println!("cargo:rerun-if-env-changed={CONFIG_DIR_VAR}");
    println!("cargo:rerun-if-changed=build.rs");
    rerun_if_git_changes(&framework);
    if config != framework {
        rerun_if_git_changes(&config);
    }
}
