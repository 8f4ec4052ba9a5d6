mod common;

use common::test_utils::{QUADS_OBJ, TRIANGLE_GLTF, headless, init_logger, write_fixture};
use flow_gl::{
    ErrorKind,
    asset::{self, Node},
};

#[test]
fn obj_objects_become_child_nodes() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "quads.obj", QUADS_OBJ).unwrap();
    let scene = asset::load(&path).unwrap();

    assert_eq!(scene.src(), path.display().to_string());
    let root = scene.root();
    assert_eq!(root.name(), "quads.obj");
    let names: Vec<&str> = root.children().iter().map(|n| n.name()).collect();
    assert_eq!(names, ["Front", "Floor"]);

    let front = &scene.meshes()[0];
    assert_eq!(front.name(), "Front");
    assert_eq!(front.vertex_count(), 4);
    assert_eq!(front.face_count(), 2);
    let idx = front.indices().unwrap();
    assert_eq!(idx.len(), 2);

    // Every mesh reference resolves, and every index is in range.
    let mut visited = 0;
    root.walk(&mut |node: &Node, _depth| {
        for i in node.mesh_indices() {
            let mesh = &scene.meshes()[*i];
            let indices = mesh.indices().unwrap();
            assert!(indices.as_flattened().iter().all(|v| (*v as usize) < mesh.vertex_count()));
            visited += 1;
        }
    });
    assert_eq!(visited, 2);
}

#[test]
fn obj_tangents_follow_the_uv_layout() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "quads.obj", QUADS_OBJ).unwrap();
    let scene = asset::load(&path).unwrap();
    let front = &scene.meshes()[0];

    let tangents = front.tangents().unwrap();
    assert_eq!(tangents.len(), 4);
    for tangent in tangents {
        assert!(tangent[0] > 0.0);
        assert!(tangent[1].abs() < 1e-5);
    }
    let bitangents = front.bitangents().unwrap();
    assert!(bitangents[0][1] > 0.0);
    assert_eq!(front.normals().unwrap().len(), 4);
    assert_eq!(front.uvs().unwrap().len(), 4);
}

#[test]
fn gltf_scenes_mirror_the_node_tree() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "triangle.gltf", TRIANGLE_GLTF).unwrap();
    let scene = asset::load(&path).unwrap();

    let root = scene.root();
    assert_eq!(root.name(), "Stage");
    let tri = &root.children()[0];
    assert_eq!(tri.name(), "Tri");
    assert_eq!(tri.mesh_indices(), [0]);
    // Row-major: the translation is the last column.
    let transform = tri.transform();
    assert_eq!([transform[0][3], transform[1][3], transform[2][3]], [1.0, 2.0, 3.0]);
    assert_eq!(transform[3], [0.0, 0.0, 0.0, 1.0]);

    let mesh = &scene.meshes()[0];
    assert_eq!(mesh.name(), "Triangle");
    assert_eq!(mesh.positions().len(), 3);
    assert_eq!(mesh.indices().unwrap(), vec![[0, 1, 2]]);
    assert!(mesh.normals().is_none());
    assert!(mesh.tangents().is_none());
}

#[test]
fn missing_and_malformed_files_are_import_errors() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("nowhere.obj");
    let err = asset::load(&missing).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Import);
    assert!(!err.to_string().is_empty());

    let malformed = write_fixture(dir.path(), "broken.gltf", "{ \"asset\": ").unwrap();
    let err = asset::load(&malformed).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Import);

    let unknown = write_fixture(dir.path(), "model.fbx", "").unwrap();
    let err = asset::load(&unknown).unwrap_err();
    assert!(err.to_string().contains("unsupported file format"));

    let empty = write_fixture(dir.path(), "empty.obj", "# nothing here\n").unwrap();
    assert_eq!(asset::load(&empty).unwrap_err().kind(), ErrorKind::Import);
}

#[test]
fn objects_without_vertices_are_skipped() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let contents = format!("o Empty\n{QUADS_OBJ}");
    let path = write_fixture(dir.path(), "padded.obj", &contents).unwrap();
    let scene = asset::load(&path).unwrap();

    let names: Vec<&str> = scene.meshes().iter().map(|m| m.name()).collect();
    assert_eq!(names, ["Front", "Floor"]);
    let children = scene.root().children();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].mesh_indices(), [0]);
    assert_eq!(children[1].mesh_indices(), [1]);
}

#[cfg(feature = "python")]
mod python {
    use flow_gl::bindings::AssetError;
    use pyo3::{
        exceptions::{PyAttributeError, PyRuntimeError, PyTypeError},
        prelude::*,
    };

    use super::*;
    use crate::common::test_utils::with_gl;

    #[test]
    fn attributes_of_imported_objects() {
        let _h = headless();
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), "triangle.gltf", TRIANGLE_GLTF).unwrap();
        let src = path.display().to_string();

        with_gl(|py, gl| {
            let ai = gl.getattr("ai").unwrap();
            let scene = ai.getattr("load").unwrap().call1((src.as_str(),)).unwrap();
            assert_eq!(scene.getattr("src").unwrap().extract::<String>().unwrap(), src);

            let root = scene.getattr("root").unwrap();
            assert_eq!(root.getattr("name").unwrap().extract::<String>().unwrap(), "Stage");
            let children = root.getattr("sub").unwrap();
            assert_eq!(children.len().unwrap(), 1);
            let tri = children.get_item(0).unwrap();
            assert_eq!(tri.getattr("meshes").unwrap().extract::<Vec<usize>>().unwrap(), [0]);

            let mesh = scene.getattr("meshes").unwrap().get_item(0).unwrap();
            assert_eq!(mesh.getattr("name").unwrap().extract::<String>().unwrap(), "Triangle");
            assert_eq!(mesh.getattr("nvert").unwrap().extract::<usize>().unwrap(), 3);
            assert_eq!(mesh.getattr("ntri").unwrap().extract::<usize>().unwrap(), 1);
            assert!(mesh.getattr("normals").unwrap().is_none());
            assert!(mesh.getattr("tangents").unwrap().is_none());

            let err = mesh.getattr("colors").unwrap_err();
            assert!(err.is_instance_of::<PyAttributeError>(py), "{err}");

            for name in ["Scene", "Node", "Mesh"] {
                let err = ai.getattr(name).unwrap().call0().unwrap_err();
                assert!(err.is_instance_of::<PyTypeError>(py), "{name}: {err}");
            }

            let err = ai.getattr("load").unwrap().call1(("missing.obj",)).unwrap_err();
            assert!(err.is_instance_of::<AssetError>(py), "{err}");
            assert!(err.is_instance_of::<PyRuntimeError>(py), "{err}");
        });
    }
}
