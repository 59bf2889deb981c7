use std::{path::Path, process::Command};

use m100_common::version::{BuildVersion, Revision, DIRTY_MARKER};

/// A git tree's description as `git describe` prints it, with the dirty marker split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Described {
    pub describe: String,
    pub dirty: bool,
}
impl Described {
    fn revision(&self) -> Revision<'_> {
        Revision::new(&self.describe, self.dirty)
    }
}

pub fn parse_describe(output: &str) -> Option<Described> {
    let output = output.trim();
    let (describe, dirty) = match output.strip_suffix(DIRTY_MARKER) {
        Some(d) => (d, true),
        None => (output, false),
    };
    if describe.is_empty() || describe.contains(char::is_whitespace) {
        return None;
    }
    Some(Described {
        describe: describe.to_string(),
        dirty,
    })
}

/// Describe the git tree containing `dir`; tags are preferred, the abbreviated commit is used
/// otherwise. `None` when `dir` is not in a git tree or git is unavailable.
pub fn describe(dir: &Path) -> Option<Described> {
    let dirty = format!("--dirty={DIRTY_MARKER}");
    let output = match Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["describe", "--always", "--tags", dirty.as_str()])
        .output()
    {
        Ok(output) => output,
        Err(err) => {
            log::warn!("git unavailable: {err}");
            return None;
        }
    };
    if !output.status.success() {
        log::debug!(
            "git describe failed in {}: {}",
            dir.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return None;
    }
    parse_describe(&String::from_utf8_lossy(&output.stdout))
}

fn revision(described: &Option<Described>) -> Revision<'_> {
    described
        .as_ref()
        .map_or_else(Revision::unknown, Described::revision)
}

/// The `<framework>::<config>` build version for the two trees.
pub fn build_version(framework_dir: &Path, config_dir: &Path) -> String {
    let framework = describe(framework_dir);
    let config = describe(config_dir);
    BuildVersion::new(revision(&framework), revision(&config)).to_string()
}

#[cfg(test)]
#[path = "version_test.rs"]
mod test;
