//! Scene import.
//!
//! [`load`] reads Wavefront OBJ (through `tobj`) and glTF/GLB (through
//! `gltf`) files into a [`Scene`]: a tree of [`Node`]s and the list of
//! [`Mesh`]es they reference. Faces are triangulated on import and missing
//! tangents are generated from positions and texture coordinates.

use std::{path::Path, rc::Rc};

use crate::error::{Error, Result};

mod import;
mod mesh;
mod node;
mod scene;
mod tangent;

pub use mesh::Mesh;
pub use node::Node;
pub use scene::Scene;

/// Imports the scene at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<Scene> {
    let path = path.as_ref();
    let src = path.display().to_string();
    let raw = import::import(path).map_err(|e| {
        log::warn!("Import of {src} failed: {e:#}");
        Error::import(src.clone(), format!("{e:#}"))
    })?;
    let meshes: Vec<Rc<Mesh>> = raw
        .meshes
        .into_iter()
        .map(|m| Rc::new(Mesh::from_raw(m)))
        .collect();
    let root = Node::build(raw.root, meshes.len(), &src)?;
    log::info!("Imported {src}: {} meshes", meshes.len());
    Ok(Scene::new(src, root, meshes))
}
