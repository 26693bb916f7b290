//! Cache invalidation primitive and path dependency table.
//!
//! # Responsibilities
//! - Define the invalidation seam the revalidation endpoint calls into
//! - Hold the declared coupling between a path and its dependents
//!
//! # Design Decisions
//! - Dependents are declared data, extensible from configuration
//! - A `:`-containing dependent is a template (a class of pages), otherwise
//!   an exact path

use std::collections::HashMap;

use thiserror::Error;

use crate::cache::page_cache::PageCache;
use crate::config::schema::DependencyRule;
use crate::observability::metrics;

/// Failure while marking cached content stale.
#[derive(Debug, Error)]
pub enum InvalidateError {
    #[error("invalidation failed for {path}: {reason}")]
    Failed { path: String, reason: String },
}

/// Seam for marking cached page content stale.
///
/// The in-memory [`PageCache`] implements this infallibly; the trait is
/// fallible so alternative backends (or test doubles) can surface errors,
/// which the endpoint reports as a 500.
pub trait Invalidator: Send + Sync {
    /// Mark the entry for an exact path stale.
    fn invalidate_path(&self, path: &str) -> Result<(), InvalidateError>;

    /// Mark every entry matching a `:param` path template stale.
    fn invalidate_template(&self, template: &str) -> Result<(), InvalidateError>;
}

impl Invalidator for PageCache {
    fn invalidate_path(&self, path: &str) -> Result<(), InvalidateError> {
        let removed = self.remove(path);
        metrics::record_invalidation("path");
        tracing::debug!(path = %path, removed = removed, "Invalidated cache path");
        Ok(())
    }

    fn invalidate_template(&self, template: &str) -> Result<(), InvalidateError> {
        let removed = self.remove_matching(template);
        metrics::record_invalidation("template");
        tracing::debug!(template = %template, removed = removed, "Invalidated cache template");
        Ok(())
    }
}

/// Declared map from a logical path to the paths whose cached data it
/// feeds. The default table records that the home document and portfolio
/// pages share global site settings.
#[derive(Debug, Clone, Default)]
pub struct DependencyTable {
    rules: HashMap<String, Vec<String>>,
}

impl DependencyTable {
    pub fn from_rules(rules: &[DependencyRule]) -> Self {
        Self {
            rules: rules
                .iter()
                .map(|r| (r.path.clone(), r.dependents.clone()))
                .collect(),
        }
    }

    /// Dependent paths/templates for a path, empty when none are declared.
    pub fn dependents_of(&self, path: &str) -> &[String] {
        self.rules.get(path).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Invalidate a path and, per the dependency table, everything declared
/// as depending on it. A dependent containing `:` is treated as a
/// template. Fails on the first error; earlier invalidations stand
/// (repeating the call is safe).
pub fn invalidate_with_dependents(
    invalidator: &dyn Invalidator,
    table: &DependencyTable,
    path: &str,
) -> Result<(), InvalidateError> {
    invalidator.invalidate_path(path)?;
    for dependent in table.dependents_of(path) {
        if dependent.contains(':') {
            invalidator.invalidate_template(dependent)?;
        } else {
            invalidator.invalidate_path(dependent)?;
        }
    }
    Ok(())
}
