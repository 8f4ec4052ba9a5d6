//! Per-vertex tangent space for meshes whose files carry none.

use cgmath::{Vector2, Vector3};

use crate::asset::import::RawMesh;

/// Accumulates a tangent and bitangent per triangle from positions and UVs
/// and averages them over the triangles sharing each vertex.
///
/// Needs normals and UVs; meshes without them keep no tangent channels.
/// Triangles with a degenerate UV mapping contribute nothing.
pub(crate) fn generate(mesh: &mut RawMesh) {
    let (Some(_), Some(uvs)) = (&mesh.normals, &mesh.uvs) else {
        return;
    };
    let vertex_count = mesh.positions.len();
    if uvs.len() != vertex_count {
        return;
    }

    let mut tangents = vec![Vector3::new(0.0f32, 0.0, 0.0); vertex_count];
    let mut bitangents = tangents.clone();
    let mut triangles_included = vec![0u32; vertex_count];

    for face in mesh.faces.iter().filter(|f| f.len() == 3) {
        let [a, b, c] = [face[0] as usize, face[1] as usize, face[2] as usize];
        if a >= vertex_count || b >= vertex_count || c >= vertex_count {
            continue;
        }
        let pos0: Vector3<f32> = mesh.positions[a].into();
        let pos1: Vector3<f32> = mesh.positions[b].into();
        let pos2: Vector3<f32> = mesh.positions[c].into();
        let uv0: Vector2<f32> = uvs[a].into();
        let uv1: Vector2<f32> = uvs[b].into();
        let uv2: Vector2<f32> = uvs[c].into();

        let delta_pos1 = pos1 - pos0;
        let delta_pos2 = pos2 - pos0;
        let delta_uv1 = uv1 - uv0;
        let delta_uv2 = uv2 - uv0;

        // delta_pos1 = delta_uv1.x * T + delta_uv1.y * B
        // delta_pos2 = delta_uv2.x * T + delta_uv2.y * B
        let det = delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x;
        if det.abs() <= f32::EPSILON {
            continue;
        }
        let r = 1.0 / det;
        let tangent = (delta_pos1 * delta_uv2.y - delta_pos2 * delta_uv1.y) * r;
        let bitangent = (delta_pos2 * delta_uv1.x - delta_pos1 * delta_uv2.x) * r;

        for vertex in [a, b, c] {
            tangents[vertex] += tangent;
            bitangents[vertex] += bitangent;
            triangles_included[vertex] += 1;
        }
    }

    for (i, n) in triangles_included.into_iter().enumerate() {
        if n > 0 {
            let denom = 1.0 / n as f32;
            tangents[i] *= denom;
            bitangents[i] *= denom;
        }
    }

    mesh.tangents = Some(tangents.into_iter().map(Into::into).collect());
    mesh.bitangents = Some(bitangents.into_iter().map(Into::into).collect());
}

/// The bitangent `cross(n, t.xyz) * t.w` of a glTF tangent.
pub(crate) fn bitangent_from_handedness(normal: [f32; 3], tangent: [f32; 4]) -> [f32; 3] {
    let n = Vector3::from(normal);
    let t = Vector3::new(tangent[0], tangent[1], tangent[2]);
    (n.cross(t) * tangent[3]).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    fn quad() -> RawMesh {
        RawMesh {
            name: "quad".to_string(),
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            normals: Some(vec![[0.0, 0.0, 1.0]; 4]),
            uvs: Some(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]),
            faces: vec![vec![0, 1, 2], vec![0, 2, 3]],
            ..Default::default()
        }
    }

    #[test]
    fn planar_quad_has_axis_aligned_tangents() {
        let mut mesh = quad();
        generate(&mut mesh);
        let tangents = mesh.tangents.unwrap();
        let bitangents = mesh.bitangents.unwrap();
        for (t, b) in tangents.iter().zip(&bitangents) {
            assert!((Vector3::from(*t) - Vector3::new(1.0, 0.0, 0.0)).magnitude() < 1e-5);
            assert!((Vector3::from(*b) - Vector3::new(0.0, 1.0, 0.0)).magnitude() < 1e-5);
        }
    }

    #[test]
    fn skipped_without_uvs() {
        let mut mesh = RawMesh { uvs: None, ..quad() };
        generate(&mut mesh);
        assert!(mesh.tangents.is_none());
    }

    #[test]
    fn handedness_flips_the_bitangent() {
        let b = bitangent_from_handedness([0.0, 0.0, 1.0], [1.0, 0.0, 0.0, -1.0]);
        assert_eq!(b, [0.0, -1.0, 0.0]);
    }
}
