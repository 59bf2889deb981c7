use core::fmt;

pub const VERSION_INFO_PREFIX: &str = "Keyboardio Model 100 - Firmware version ";

pub const SEPARATOR: &str = "::";
pub const DIRTY_MARKER: char = '*';
pub const UNKNOWN: &str = "unknown";

/// One source tree's revision as reported by `git describe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Revision<'a> {
    pub describe: &'a str,
    pub dirty: bool,
}
impl<'a> Revision<'a> {
    pub fn new(describe: &'a str, dirty: bool) -> Self {
        Self { describe, dirty }
    }

    pub fn unknown() -> Self {
        Self::new(UNKNOWN, false)
    }

    fn parse(text: &'a str) -> Self {
        match text.strip_suffix(DIRTY_MARKER) {
            Some(describe) => Self::new(describe, true),
            None => Self::new(text, false),
        }
    }
}
impl fmt::Display for Revision<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe)?;
        if self.dirty {
            write!(f, "{}", DIRTY_MARKER)?;
        }
        Ok(())
    }
}

/// The string embedded in the version-info macro: `<framework>::<config>`, each half marked with a
/// trailing `*` when its tree had uncommitted changes at build time.
///
/// ```
/// use m100_common::version::{BuildVersion, Revision};
/// let v = BuildVersion::new(Revision::new("v1.99", false), Revision::new("3f2a9c1", true));
/// assert_eq!(format!("{v}"), "v1.99::3f2a9c1*");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildVersion<'a> {
    pub framework: Revision<'a>,
    pub config: Revision<'a>,
}
impl<'a> BuildVersion<'a> {
    pub fn new(framework: Revision<'a>, config: Revision<'a>) -> Self {
        Self { framework, config }
    }

    pub fn parse(text: &'a str) -> Option<Self> {
        let (framework, config) = text.split_once(SEPARATOR)?;
        if framework.is_empty() || config.is_empty() {
            return None;
        }
        Some(Self::new(Revision::parse(framework), Revision::parse(config)))
    }

    pub fn is_dirty(&self) -> bool {
        self.framework.dirty || self.config.dirty
    }
}
impl fmt::Display for BuildVersion<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.framework, SEPARATOR, self.config)
    }
}

#[cfg(test)]
#[path = "version_test.rs"]
mod test;
