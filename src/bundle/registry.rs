//! Bundle registry — resolving bundle identifiers at composition time.
//!
//! The registry holds bundles indexed by namespaced id and supports:
//! 1. Programmatic registration (bundles carry closures, so this is the only
//!    way a bundle enters the registry)
//! 2. YAML manifests loaded from directories, enforced as contracts when the
//!    matching bundle is registered
//! 3. Namespace aliases (e.g. `"hr"` -> `"org"`)
//!
//! Resolution is by namespaced id: `registry.resolve("org:managed")`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::behavior::BehaviorBundle;
use super::manifest::BundleManifest;
use crate::composer::compose;
use crate::errors::{ComposeError, ManifestError};
use crate::target::Target;

/// Registry of behavior bundles indexed by namespaced id.
#[derive(Debug, Default)]
pub struct BundleRegistry {
    /// Bundles indexed by id
    bundles: HashMap<String, Arc<BehaviorBundle>>,

    /// Manifests awaiting their bundle, indexed by id
    contracts: HashMap<String, BundleManifest>,

    /// Namespace aliases (e.g., "hr" -> "org")
    aliases: HashMap<String, String>,
}

impl BundleRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a namespace alias.
    pub fn add_alias(&mut self, alias: &str, target_namespace: &str) {
        self.aliases
            .insert(alias.to_string(), target_namespace.to_string());
    }

    /// Register a bundle.
    ///
    /// If a manifest for the same id was loaded earlier, the bundle is
    /// verified against it and registration fails if the contract is not
    /// satisfied. Re-registering an id replaces the previous bundle.
    pub fn register(&mut self, bundle: BehaviorBundle) -> Result<(), ManifestError> {
        if let Some(manifest) = self.contracts.get(bundle.id()) {
            manifest.verify(&bundle)?;
        }
        log::debug!(
            "registered bundle {} ({} operations)",
            bundle.id(),
            bundle.len()
        );
        self.bundles
            .insert(bundle.id().to_string(), Arc::new(bundle));
        Ok(())
    }

    /// Record a manifest as a pending contract for its bundle id.
    ///
    /// If the bundle is already registered it is verified immediately.
    pub fn add_manifest(&mut self, manifest: BundleManifest) -> Result<(), ManifestError> {
        if let Some(bundle) = self.bundles.get(&manifest.id) {
            manifest.verify(bundle)?;
        }
        self.contracts.insert(manifest.id.clone(), manifest);
        Ok(())
    }

    /// Load all manifest YAML files from a directory (recursive).
    ///
    /// Files that fail to parse are logged and skipped; the count of loaded
    /// manifests is returned.
    pub fn load_manifest_dir(&mut self, dir: &Path) -> Result<usize, ManifestError> {
        let mut count = 0;
        if !dir.exists() {
            return Ok(0);
        }

        let entries = std::fs::read_dir(dir).map_err(|source| ManifestError::Io {
            path: dir.display().to_string(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| ManifestError::Io {
                path: dir.display().to_string(),
                source,
            })?;
            let path = entry.path();

            if path.is_dir() {
                count += self.load_manifest_dir(&path)?;
            } else if path
                .extension()
                .map_or(false, |ext| ext == "yaml" || ext == "yml")
            {
                match BundleManifest::from_file(&path) {
                    Ok(manifests) => {
                        for manifest in manifests {
                            self.add_manifest(manifest)?;
                            count += 1;
                        }
                    }
                    Err(e) => {
                        log::warn!("failed to load manifest from {}: {}", path.display(), e);
                    }
                }
            }
        }

        Ok(count)
    }

    /// Resolve a bundle by its namespaced id, applying alias resolution.
    pub fn resolve(&self, id: &str) -> Option<Arc<BehaviorBundle>> {
        let resolved_id = self.resolve_alias(id);
        let bundle = self.bundles.get(&resolved_id).cloned();
        if bundle.is_none() {
            log::debug!("bundle {resolved_id} not found in registry");
        }
        bundle
    }

    /// Resolve a list of bundle ids. Returns (resolved, unresolved).
    pub fn resolve_many(&self, ids: &[&str]) -> (Vec<Arc<BehaviorBundle>>, Vec<String>) {
        let mut resolved = Vec::new();
        let mut unresolved = Vec::new();
        for id in ids {
            match self.resolve(id) {
                Some(bundle) => resolved.push(bundle),
                None => unresolved.push((*id).to_string()),
            }
        }
        (resolved, unresolved)
    }

    /// Resolve the given ids in order and compose the bundles onto `target`.
    ///
    /// All ids are resolved before anything is applied, so an unknown id
    /// leaves the target unmodified.
    pub fn compose_by_id(&self, target: &Target, ids: &[&str]) -> Result<Target, ComposeError> {
        let mut bundles = Vec::with_capacity(ids.len());
        for id in ids {
            let bundle = self.resolve(id).ok_or_else(|| ComposeError::UnknownBundle {
                id: (*id).to_string(),
            })?;
            bundles.push(bundle);
        }
        compose(target, bundles.iter().map(Arc::as_ref))
    }

    /// The manifest recorded for a bundle id, if any.
    pub fn manifest(&self, id: &str) -> Option<&BundleManifest> {
        self.contracts.get(&self.resolve_alias(id))
    }

    /// List all registered bundles.
    pub fn list(&self) -> Vec<Arc<BehaviorBundle>> {
        self.bundles.values().cloned().collect()
    }

    /// List bundles by namespace.
    pub fn list_by_namespace(&self, namespace: &str) -> Vec<Arc<BehaviorBundle>> {
        let resolved_ns = self
            .aliases
            .get(namespace)
            .cloned()
            .unwrap_or_else(|| namespace.to_string());
        self.bundles
            .values()
            .filter(|b| b.namespace() == resolved_ns)
            .cloned()
            .collect()
    }

    /// Search bundles by tag.
    pub fn search_by_tag(&self, tag: &str) -> Vec<Arc<BehaviorBundle>> {
        self.bundles
            .values()
            .filter(|b| b.tags().iter().any(|t| t == tag))
            .cloned()
            .collect()
    }

    /// Search bundles by description (substring match).
    pub fn search_by_description(&self, query: &str) -> Vec<Arc<BehaviorBundle>> {
        let query_lower = query.to_lowercase();
        self.bundles
            .values()
            .filter(|b| b.description().to_lowercase().contains(&query_lower))
            .cloned()
            .collect()
    }

    /// Get the total number of registered bundles.
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Resolve aliases in an id
    fn resolve_alias(&self, id: &str) -> String {
        if let Some((namespace, name)) = id.split_once(':') {
            if let Some(target_ns) = self.aliases.get(namespace) {
                return format!("{target_ns}:{name}");
            }
        }
        id.to_string()
    }
}

static DEFAULT_REGISTRY: Lazy<RwLock<BundleRegistry>> =
    Lazy::new(|| RwLock::new(BundleRegistry::new()));

/// The process-wide default registry.
pub fn default_registry() -> &'static RwLock<BundleRegistry> {
    &DEFAULT_REGISTRY
}
