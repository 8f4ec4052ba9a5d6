//! Reading OBJ and glTF files into an intermediate scene description.

use std::path::Path;

use anyhow::{Context as _, bail};

use crate::asset::tangent;

/// Row-major identity.
pub(crate) const IDENTITY: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

#[derive(Debug, Default)]
pub(crate) struct RawMesh {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub uvs: Option<Vec<[f32; 2]>>,
    pub tangents: Option<Vec<[f32; 3]>>,
    pub bitangents: Option<Vec<[f32; 3]>>,
    pub faces: Vec<Vec<u32>>,
}

#[derive(Debug)]
pub(crate) struct RawNode {
    pub name: String,
    pub children: Vec<RawNode>,
    pub meshes: Vec<usize>,
    /// Row-major.
    pub transform: [[f32; 4]; 4],
}

#[derive(Debug)]
pub(crate) struct RawScene {
    pub root: RawNode,
    pub meshes: Vec<RawMesh>,
}

/// Imports `path` by extension, triangulating faces and filling in the
/// tangent space where the file has none.
pub(crate) fn import(path: &Path) -> anyhow::Result<RawScene> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let mut scene = match extension.as_str() {
        "obj" => import_obj(path)?,
        "gltf" | "glb" => import_gltf(path)?,
        "" => bail!("file has no extension"),
        other => bail!("unsupported file format '.{other}'"),
    };
    if scene.meshes.is_empty() {
        bail!("file contains no meshes");
    }
    for mesh in &mut scene.meshes {
        for face in &mesh.faces {
            if let Some(bad) = face.iter().find(|i| **i as usize >= mesh.positions.len()) {
                bail!(
                    "mesh '{}' references vertex {bad} of {}",
                    mesh.name,
                    mesh.positions.len()
                );
            }
        }
        if mesh.tangents.is_none() {
            tangent::generate(mesh);
        }
    }
    Ok(scene)
}

fn chunked<const N: usize>(flat: &[f32]) -> Vec<[f32; N]> {
    flat.chunks_exact(N)
        .map(|c| {
            let mut out = [0.0; N];
            out.copy_from_slice(c);
            out
        })
        .collect()
}

fn import_obj(path: &Path) -> anyhow::Result<RawScene> {
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .with_context(|| format!("could not parse {}", path.display()))?;
    if let Err(e) = materials {
        log::debug!("Ignoring materials of {}: {e}", path.display());
    }

    let mut meshes = Vec::with_capacity(models.len());
    let mut children = Vec::with_capacity(models.len());
    for model in models {
        let m = model.mesh;
        if m.positions.is_empty() {
            log::debug!("Skipping object '{}' of {}: no vertices", model.name, path.display());
            continue;
        }
        let index = meshes.len();
        let vertex_count = m.positions.len() / 3;
        let faces = if m.face_arities.is_empty() {
            m.indices.chunks(3).map(<[u32]>::to_vec).collect()
        } else {
            let mut faces = Vec::with_capacity(m.face_arities.len());
            let mut start = 0;
            for arity in &m.face_arities {
                let end = start + *arity as usize;
                faces.push(m.indices.get(start..end).context("face runs past the index list")?.to_vec());
                start = end;
            }
            faces
        };
        let normals = (m.normals.len() == vertex_count * 3 && vertex_count > 0).then(|| chunked(&m.normals));
        let uvs = (m.texcoords.len() == vertex_count * 2 && vertex_count > 0).then(|| chunked(&m.texcoords));
        children.push(RawNode {
            name: model.name.clone(),
            children: Vec::new(),
            meshes: vec![index],
            transform: IDENTITY,
        });
        meshes.push(RawMesh {
            name: model.name,
            positions: chunked(&m.positions),
            normals,
            uvs,
            tangents: None,
            bitangents: None,
            faces,
        });
    }

    let root = RawNode {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        children,
        meshes: Vec::new(),
        transform: IDENTITY,
    };
    Ok(RawScene { root, meshes })
}

fn import_gltf(path: &Path) -> anyhow::Result<RawScene> {
    let gltf::Gltf { document, blob } =
        gltf::Gltf::open(path).with_context(|| format!("could not parse {}", path.display()))?;
    let buffers = gltf::import_buffers(&document, path.parent(), blob).context("could not load buffers")?;

    // glTF mesh index -> indices of the meshes made from its primitives
    let mut primitive_meshes: Vec<Vec<usize>> = Vec::new();
    let mut meshes = Vec::new();
    for mesh in document.meshes() {
        let base_name = mesh.name().map_or_else(|| format!("mesh{}", mesh.index()), str::to_string);
        let primitive_count = mesh.primitives().len();
        let mut ids = Vec::with_capacity(primitive_count);
        for primitive in mesh.primitives() {
            let name = if primitive_count > 1 {
                format!("{base_name}-{}", primitive.index())
            } else {
                base_name.clone()
            };
            ids.push(meshes.len());
            meshes.push(read_primitive(name, &primitive, &buffers)?);
        }
        primitive_meshes.push(ids);
    }

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .context("file contains no scene")?;
    let root = RawNode {
        name: scene.name().unwrap_or("Scene").to_string(),
        children: scene
            .nodes()
            .map(|node| read_node(&node, &primitive_meshes, 0))
            .collect::<anyhow::Result<_>>()?,
        meshes: Vec::new(),
        transform: IDENTITY,
    };
    Ok(RawScene { root, meshes })
}

const MAX_NODE_DEPTH: usize = 256;

fn read_node(node: &gltf::Node, primitive_meshes: &[Vec<usize>], depth: usize) -> anyhow::Result<RawNode> {
    if depth > MAX_NODE_DEPTH {
        bail!("node hierarchy deeper than {MAX_NODE_DEPTH} levels");
    }
    let columns = node.transform().matrix();
    let mut transform = [[0.0; 4]; 4];
    for (row, out) in transform.iter_mut().enumerate() {
        for (col, value) in out.iter_mut().enumerate() {
            *value = columns[col][row];
        }
    }
    let meshes = match node.mesh() {
        Some(mesh) => primitive_meshes
            .get(mesh.index())
            .cloned()
            .with_context(|| format!("node {} references missing mesh {}", node.index(), mesh.index()))?,
        None => Vec::new(),
    };
    Ok(RawNode {
        name: node.name().map_or_else(|| format!("node{}", node.index()), str::to_string),
        children: node
            .children()
            .map(|child| read_node(&child, primitive_meshes, depth + 1))
            .collect::<anyhow::Result<_>>()?,
        meshes,
        transform,
    })
}

fn read_primitive(
    name: String,
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
) -> anyhow::Result<RawMesh> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));
    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .with_context(|| format!("primitive of '{name}' has no positions"))?
        .collect();
    let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(Iterator::collect);
    let uvs: Option<Vec<[f32; 2]>> = reader.read_tex_coords(0).map(|uv| uv.into_f32().collect());
    let tangents: Option<Vec<[f32; 4]>> = reader.read_tangents().map(Iterator::collect);
    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };

    // The w component carries the handedness of the bitangent.
    let (tangents, bitangents) = match (tangents, &normals) {
        (Some(tangents), Some(normals)) => {
            let bitangents = tangents
                .iter()
                .zip(normals)
                .map(|(t, n)| tangent::bitangent_from_handedness(*n, *t))
                .collect();
            (Some(tangents.iter().map(|t| [t[0], t[1], t[2]]).collect()), Some(bitangents))
        }
        _ => (None, None),
    };

    Ok(RawMesh {
        name,
        positions,
        normals,
        uvs,
        tangents,
        bitangents,
        faces: faces_for_mode(primitive.mode(), &indices),
    })
}

/// Splits an index list into faces. Strips and fans are triangulated; point
/// and line modes give 1- and 2-index faces.
fn faces_for_mode(mode: gltf::mesh::Mode, indices: &[u32]) -> Vec<Vec<u32>> {
    use gltf::mesh::Mode;
    match mode {
        Mode::Points => indices.iter().map(|i| vec![*i]).collect(),
        Mode::Lines => indices.chunks_exact(2).map(<[u32]>::to_vec).collect(),
        Mode::LineStrip => indices.windows(2).map(<[u32]>::to_vec).collect(),
        Mode::LineLoop => {
            let mut faces: Vec<Vec<u32>> = indices.windows(2).map(<[u32]>::to_vec).collect();
            if let (Some(first), Some(last)) = (indices.first(), indices.last()) {
                if indices.len() > 2 {
                    faces.push(vec![*last, *first]);
                }
            }
            faces
        }
        Mode::Triangles => indices.chunks_exact(3).map(<[u32]>::to_vec).collect(),
        Mode::TriangleStrip => indices
            .windows(3)
            .enumerate()
            .map(|(i, w)| if i % 2 == 0 { vec![w[0], w[1], w[2]] } else { vec![w[1], w[0], w[2]] })
            .collect(),
        Mode::TriangleFan => match indices.split_first() {
            Some((center, rest)) => rest.windows(2).map(|w| vec![*center, w[0], w[1]]).collect(),
            None => Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gltf::mesh::Mode;

    #[test]
    fn strips_and_fans_become_triangles() {
        let strip = faces_for_mode(Mode::TriangleStrip, &[0, 1, 2, 3]);
        assert_eq!(strip, vec![vec![0, 1, 2], vec![2, 1, 3]]);
        let fan = faces_for_mode(Mode::TriangleFan, &[0, 1, 2, 3]);
        assert_eq!(fan, vec![vec![0, 1, 2], vec![0, 2, 3]]);
    }

    #[test]
    fn lines_keep_two_indices() {
        let lines = faces_for_mode(Mode::LineLoop, &[0, 1, 2]);
        assert_eq!(lines, vec![vec![0, 1], vec![1, 2], vec![2, 0]]);
    }

    #[test]
    fn obj_objects_without_vertices_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let sparse = dir.path().join("sparse.obj");
        std::fs::write(&sparse, "o Empty\no Tri\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        let scene = import(&sparse).unwrap();
        assert_eq!(scene.meshes.len(), 1);
        assert_eq!(scene.meshes[0].name, "Tri");
        assert_eq!(scene.root.children.len(), 1);
        assert_eq!(scene.root.children[0].meshes, [0]);

        let empty = dir.path().join("empty.obj");
        std::fs::write(&empty, "# nothing here\n").unwrap();
        let err = import(&empty).unwrap_err();
        assert!(err.to_string().contains("no meshes"), "{err}");
    }
}
