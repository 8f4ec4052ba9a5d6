use std::{path::PathBuf, rc::Rc};

use numpy::PyArray2;
use pyo3::prelude::*;

use crate::{
    asset::{self, Mesh, Node, Scene},
    bindings::convert::rows_array,
};

/// An imported scene. Only `gl.ai.load` creates these.
#[pyclass(unsendable, name = "Scene", module = "gl.ai")]
pub struct PyScene(pub Scene);

#[pymethods]
impl PyScene {
    #[getter]
    fn src(&self) -> &str {
        self.0.src()
    }

    #[getter]
    fn root(&self) -> PyNode {
        PyNode(self.0.root().clone())
    }

    #[getter]
    fn meshes(&self) -> Vec<PyMesh> {
        self.0.meshes().iter().cloned().map(PyMesh).collect()
    }

    fn __repr__(&self) -> String {
        self.0.to_string()
    }
}

/// A node of an imported scene graph.
#[pyclass(unsendable, name = "Node", module = "gl.ai")]
pub struct PyNode(pub Rc<Node>);

#[pymethods]
impl PyNode {
    #[getter]
    fn name(&self) -> &str {
        self.0.name()
    }

    /// Child nodes.
    #[getter]
    fn sub(&self) -> Vec<PyNode> {
        self.0.children().iter().cloned().map(PyNode).collect()
    }

    /// Indices into `Scene.meshes`.
    #[getter]
    fn meshes(&self) -> Vec<usize> {
        self.0.mesh_indices().to_vec()
    }

    /// Row-major `(4, 4)` transform relative to the parent.
    #[getter]
    fn transform<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<f32>>> {
        rows_array(py, &self.0.transform())
    }

    fn __repr__(&self) -> String {
        self.0.to_string()
    }
}

/// An imported triangle mesh.
#[pyclass(unsendable, name = "Mesh", module = "gl.ai")]
pub struct PyMesh(pub Rc<Mesh>);

type Rows<'py> = PyResult<Option<Bound<'py, PyArray2<f32>>>>;

#[pymethods]
impl PyMesh {
    #[getter]
    fn name(&self) -> &str {
        self.0.name()
    }

    #[getter]
    fn nvert(&self) -> usize {
        self.0.vertex_count()
    }

    #[getter]
    fn ntri(&self) -> usize {
        self.0.face_count()
    }

    #[getter]
    fn pos<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<f32>>> {
        rows_array(py, self.0.positions())
    }

    #[getter]
    fn normals<'py>(&self, py: Python<'py>) -> Rows<'py> {
        self.0.normals().map(|rows| rows_array(py, rows)).transpose()
    }

    #[getter]
    fn uv<'py>(&self, py: Python<'py>) -> Rows<'py> {
        self.0.uvs().map(|rows| rows_array(py, rows)).transpose()
    }

    #[getter]
    fn tangents<'py>(&self, py: Python<'py>) -> Rows<'py> {
        self.0.tangents().map(|rows| rows_array(py, rows)).transpose()
    }

    #[getter]
    fn bitangents<'py>(&self, py: Python<'py>) -> Rows<'py> {
        self.0.bitangents().map(|rows| rows_array(py, rows)).transpose()
    }

    /// `(F, 3)` triangle indices as `uint32`.
    #[getter]
    fn idx<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<u32>>> {
        rows_array(py, &self.0.indices()?)
    }

    fn __repr__(&self) -> String {
        self.0.to_string()
    }
}

/// Imports the scene file at `src`.
#[pyfunction]
fn load(src: PathBuf) -> PyResult<PyScene> {
    Ok(PyScene(asset::load(src)?))
}

pub(super) fn module(py: Python<'_>) -> PyResult<Bound<'_, PyModule>> {
    let m = PyModule::new(py, "ai")?;
    m.add("__doc__", "3D scene import")?;
    m.add_class::<PyScene>()?;
    m.add_class::<PyNode>()?;
    m.add_class::<PyMesh>()?;
    m.add_function(wrap_pyfunction!(load, &m)?)?;
    Ok(m)
}
