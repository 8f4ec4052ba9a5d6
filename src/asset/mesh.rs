use std::fmt;

use crate::{
    asset::import::RawMesh,
    error::{Error, Result},
};

/// An imported mesh. Read-only.
#[derive(Debug)]
pub struct Mesh {
    name: String,
    positions: Vec<[f32; 3]>,
    normals: Option<Vec<[f32; 3]>>,
    uvs: Option<Vec<[f32; 2]>>,
    tangents: Option<Vec<[f32; 3]>>,
    bitangents: Option<Vec<[f32; 3]>>,
    faces: Vec<Vec<u32>>,
}

impl Mesh {
    pub const TYPE_NAME: &'static str = "gl.ai.Mesh";

    pub(crate) fn from_raw(raw: RawMesh) -> Self {
        Self {
            name: raw.name,
            positions: raw.positions,
            normals: raw.normals,
            uvs: raw.uvs,
            tangents: raw.tangents,
            bitangents: raw.bitangents,
            faces: raw.faces,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn faces(&self) -> &[Vec<u32>] {
        &self.faces
    }

    /// Vertex positions, one row per vertex.
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn normals(&self) -> Option<&[[f32; 3]]> {
        self.normals.as_deref()
    }

    /// First texture coordinate channel.
    pub fn uvs(&self) -> Option<&[[f32; 2]]> {
        self.uvs.as_deref()
    }

    pub fn tangents(&self) -> Option<&[[f32; 3]]> {
        self.tangents.as_deref()
    }

    pub fn bitangents(&self) -> Option<&[[f32; 3]]> {
        self.bitangents.as_deref()
    }

    /// Triangle indices. Fails if any face is not a triangle.
    pub fn indices(&self) -> Result<Vec<[u32; 3]>> {
        self.faces
            .iter()
            .map(|face| <[u32; 3]>::try_from(face.as_slice()))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| Error::Size("Faces were not triangulated!".to_string()))
    }
}

impl fmt::Display for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{} name={:?} nvert={} ntri={}>",
            Self::TYPE_NAME,
            self.name,
            self.vertex_count(),
            self.face_count()
        )
    }
}
