//! Model snapshot persistence and fingerprinting.
//!
//! A snapshot is the model's ordered type table, pretty-printed as JSON so
//! hosts can fixture, cache, and diff models between pipeline stages. The
//! name-lookup index is rebuilt on load. The fingerprint is a content hash
//! of the serialized table, cheap enough for tests and hosts to assert that
//! a pass left a model untouched.

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::model::BuildModel;
use crate::model::TypeDef;

/// Write a model snapshot to `path`, creating parent directories as needed.
pub fn save(model: &BuildModel, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(model.types())?;
    fs::write(path, json)?;
    debug!(path = %path.display(), types = model.len(), "saved model snapshot");
    Ok(())
}

/// Load a model snapshot from `path`, rebuilding the lookup index.
pub fn load(path: impl AsRef<Path>) -> Result<BuildModel> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;
    let types: Vec<TypeDef> = serde_json::from_str(&json)?;
    let model = BuildModel::from_types(types)?;
    debug!(path = %path.display(), types = model.len(), "loaded model snapshot");
    Ok(model)
}

/// Content hash of a model's serialized type table.
///
/// Stable across identical models in one process; two models compare equal
/// exactly when their fingerprints do.
pub fn fingerprint(model: &BuildModel) -> Result<u64> {
    let json = serde_json::to_string(model.types())?;
    let mut hasher = DefaultHasher::new();
    json.hash(&mut hasher);
    Ok(hasher.finish())
}
