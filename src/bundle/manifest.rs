//! Bundle manifests — the declarative half of a bundle.
//!
//! Operations are closures and cannot live in a file, but the *contract* a
//! bundle promises can: a manifest names the operations a bundle must
//! provide, along with discovery metadata. Manifests are loaded from YAML and
//! enforced by the registry when the matching bundle is registered.
//!
//! Example YAML (single manifest under `bundle:`, or a list under
//! `bundles:`):
//!
//! ```yaml
//! bundle:
//!   id: "org:managed"
//!   version: "1.0.0"
//!   description: "Report-side management relationship"
//!   tags: ["org"]
//!   operations:
//!     - name: "set_manager"
//!       doc: "Attach this target to a manager"
//!       arity: 1
//!     - name: "remove_manager"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::behavior::BehaviorBundle;
use crate::errors::ManifestError;

/// Declarative descriptor of a bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleManifest {
    /// Namespaced identifier: `"namespace:name"`.
    pub id: String,

    /// Semantic version.
    pub version: String,

    /// Human-readable description.
    #[serde(default)]
    pub description: String,

    /// Searchable tags.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Operations the bundle must provide.
    #[serde(default)]
    pub operations: Vec<OperationSpec>,
}

/// One declared operation in a manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationSpec {
    /// Operation name as bound on targets.
    pub name: String,

    /// Optional documentation line.
    #[serde(default)]
    pub doc: Option<String>,

    /// Optional expected argument count.
    #[serde(default)]
    pub arity: Option<usize>,
}

impl BundleManifest {
    /// Parse a single manifest from YAML (wrapped in a `bundle:` key).
    pub fn from_yaml(yaml: &str) -> Result<Self, ManifestError> {
        let wrapper: ManifestWrapper = serde_yaml::from_str(yaml)?;
        Ok(wrapper.bundle)
    }

    /// Parse one or more manifests from YAML: a single `bundle:` or a
    /// `bundles:` list.
    pub fn list_from_yaml(yaml: &str) -> Result<Vec<Self>, ManifestError> {
        if let Ok(wrapper) = serde_yaml::from_str::<ManifestWrapper>(yaml) {
            return Ok(vec![wrapper.bundle]);
        }
        let wrapper: ManifestListWrapper = serde_yaml::from_str(yaml)?;
        Ok(wrapper.bundles)
    }

    /// Parse manifests from a YAML file.
    pub fn from_file(path: &Path) -> Result<Vec<Self>, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::list_from_yaml(&content)
    }

    /// The namespace portion of the id, empty if the id is not namespaced.
    pub fn namespace(&self) -> &str {
        match self.id.split_once(':') {
            Some((ns, _)) => ns,
            None => "",
        }
    }

    /// Check that `bundle` provides every operation this manifest declares.
    pub fn verify(&self, bundle: &BehaviorBundle) -> Result<(), ManifestError> {
        let missing: Vec<String> = self
            .operations
            .iter()
            .filter(|spec| !bundle.provides(&spec.name))
            .map(|spec| spec.name.clone())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ManifestError::Unsatisfied {
                id: self.id.clone(),
                missing,
            })
        }
    }
}

#[derive(Debug, Deserialize)]
struct ManifestWrapper {
    bundle: BundleManifest,
}

#[derive(Debug, Deserialize)]
struct ManifestListWrapper {
    bundles: Vec<BundleManifest>,
}
