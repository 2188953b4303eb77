//! Path filter (C4): include/exclude glob matching with per-instance
//! memoization.

use std::cell::RefCell;
use std::collections::HashMap;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

/// Include/exclude glob matcher. Invalid glob patterns are rejected at
/// construction (a configuration error per §7); matches are memoized per
/// instance, keyed by the (backslash-normalized) path string.
pub struct PathFilter {
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
    cache: RefCell<HashMap<String, bool>>,
}

fn build_set(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))?;
        builder.add(glob);
    }
    Ok(Some(builder.build().context("failed to build glob set")?))
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}

impl PathFilter {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        Ok(Self {
            include: build_set(include)?,
            exclude: build_set(exclude)?,
            cache: RefCell::new(HashMap::new()),
        })
    }

    pub fn everything() -> Self {
        Self {
            include: None,
            exclude: None,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Whether `path` passes the filter: excluded paths are rejected first;
    /// with no include patterns everything else is accepted; otherwise the
    /// path must match at least one include pattern.
    pub fn matches(&self, path: &str) -> bool {
        let normalized = normalize(path);
        if let Some(cached) = self.cache.borrow().get(&normalized) {
            return *cached;
        }

        let result = if self
            .exclude
            .as_ref()
            .is_some_and(|set| set.is_match(&normalized))
        {
            false
        } else {
            match &self.include {
                None => true,
                Some(set) => set.is_match(&normalized),
            }
        };

        self.cache.borrow_mut().insert(normalized, result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filters_accept_everything() {
        let f = PathFilter::everything();
        assert!(f.matches("src/main.rs"));
        assert!(f.matches("anything/at/all.txt"));
    }

    #[test]
    fn exclude_wins_over_include() {
        let f = PathFilter::new(&["src/**".into()], &["src/generated/**".into()]).unwrap();
        assert!(f.matches("src/main.rs"));
        assert!(!f.matches("src/generated/codegen.rs"));
    }

    #[test]
    fn include_restricts_to_matching_paths() {
        let f = PathFilter::new(&["*.rs".into()], &[]).unwrap();
        assert!(f.matches("main.rs"));
        assert!(!f.matches("README.md"));
    }

    #[test]
    fn backslashes_are_normalized() {
        let f = PathFilter::new(&["src/**".into()], &[]).unwrap();
        assert!(f.matches("src\\windows\\path.rs"));
    }

    #[test]
    fn invalid_glob_is_an_error() {
        let result = PathFilter::new(&["[".into()], &[]);
        assert!(result.is_err());
    }

    #[test]
    fn repeated_path_is_served_from_cache() {
        let f = PathFilter::new(&["*.rs".into()], &[]).unwrap();
        assert!(f.matches("main.rs"));
        assert_eq!(f.cache.borrow().len(), 1);
        assert!(f.matches("main.rs"));
        assert_eq!(f.cache.borrow().len(), 1);
    }
}
