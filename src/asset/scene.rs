use std::{fmt, rc::Rc};

use crate::asset::{Mesh, Node};

/// An imported scene: the node tree and the meshes its nodes refer to.
#[derive(Debug)]
pub struct Scene {
    src: String,
    root: Rc<Node>,
    meshes: Vec<Rc<Mesh>>,
}

impl Scene {
    pub const TYPE_NAME: &'static str = "gl.ai.Scene";

    pub(crate) fn new(src: String, root: Rc<Node>, meshes: Vec<Rc<Mesh>>) -> Self {
        Self { src, root, meshes }
    }

    /// The path the scene was loaded from.
    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn root(&self) -> &Rc<Node> {
        &self.root
    }

    pub fn meshes(&self) -> &[Rc<Mesh>] {
        &self.meshes
    }

    /// Meshes referenced by `node`, in reference order.
    pub fn meshes_of<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = &'a Rc<Mesh>> + 'a {
        node.mesh_indices().iter().filter_map(|i| self.meshes.get(*i))
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} src={:?}>", Self::TYPE_NAME, self.src)
    }
}
