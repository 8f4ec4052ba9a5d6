use std::{fmt, rc::Rc};

use cgmath::{Matrix, Matrix4};

use crate::{
    asset::import::RawNode,
    error::{Error, Result},
};

/// A node of an imported scene graph: a name, child nodes, indices into the
/// scene's mesh list and a transform relative to the parent.
#[derive(Debug)]
pub struct Node {
    name: String,
    children: Vec<Rc<Node>>,
    meshes: Vec<usize>,
    transform: [[f32; 4]; 4],
}

impl Node {
    pub const TYPE_NAME: &'static str = "gl.ai.Node";

    /// Builds the whole subtree, or fails without leaving a partial tree
    /// behind when any node references a mesh past `mesh_count`.
    pub(crate) fn build(raw: RawNode, mesh_count: usize, src: &str) -> Result<Rc<Node>> {
        if let Some(bad) = raw.meshes.iter().find(|m| **m >= mesh_count) {
            return Err(Error::import(
                src,
                format!("node '{}' references mesh {bad} of {mesh_count}", raw.name),
            ));
        }
        let children = raw
            .children
            .into_iter()
            .map(|child| Node::build(child, mesh_count, src))
            .collect::<Result<Vec<_>>>()?;
        Ok(Rc::new(Node {
            name: raw.name,
            children,
            meshes: raw.meshes,
            transform: raw.transform,
        }))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[Rc<Node>] {
        &self.children
    }

    /// Indices into [`Scene::meshes`](crate::asset::Scene::meshes).
    pub fn mesh_indices(&self) -> &[usize] {
        &self.meshes
    }

    /// Row-major 4x4 transform.
    pub fn transform(&self) -> [[f32; 4]; 4] {
        self.transform
    }

    pub fn transform_matrix(&self) -> Matrix4<f32> {
        // cgmath reads nested arrays as columns.
        Matrix4::from(self.transform).transpose()
    }

    /// Depth-first walk over this node and its descendants.
    pub fn walk(&self, visit: &mut impl FnMut(&Node, usize)) {
        self.walk_at(visit, 0);
    }

    fn walk_at(&self, visit: &mut impl FnMut(&Node, usize), depth: usize) {
        visit(self, depth);
        for child in &self.children {
            child.walk_at(visit, depth + 1);
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} name={:?}>", Self::TYPE_NAME, self.name)
    }
}
