#![cfg(feature = "python")]

mod common;

use common::test_utils::{headless, with_gl};
use flow_gl::{
    bindings::{GLError, WindowError},
    native::consts,
};
use pyo3::{
    exceptions::{PyAttributeError, PyOverflowError, PyTypeError, PyValueError},
    prelude::*,
};

#[test]
fn the_gl_module_exposes_its_namespaces() {
    let _h = headless();
    with_gl(|py, gl| {
        for name in ["Shader", "VBO", "EBO", "VAO", "Texture2D", "clear", "clear_color", "glfw", "ai"] {
            assert!(gl.hasattr(name).unwrap(), "missing {name}");
        }
        let glfw = gl.getattr("glfw").unwrap();
        assert!(glfw.hasattr("Window").unwrap());
        assert!(gl.getattr("ai").unwrap().getattr("load").unwrap().is_callable());
        assert_eq!(gl.getattr("STATIC_DRAW").unwrap().extract::<u32>().unwrap(), consts::STATIC_DRAW);

        let modules = py.import("sys").unwrap().getattr("modules").unwrap();
        assert!(modules.get_item("gl.glfw").unwrap().is(&glfw));
        assert!(modules.get_item("gl.ai").is_ok());

        let size_error = gl.getattr("SizeError").unwrap();
        assert!(size_error.is(&py.get_type::<flow_gl::bindings::SizeError>()));
        assert!(
            gl.getattr("GLError")
                .unwrap()
                .is(&py.get_type::<GLError>())
        );
    });
}

#[test]
fn clear_color_defaults_and_arity() {
    let h = headless();
    with_gl(|py, gl| {
        let clear_color = gl.getattr("clear_color").unwrap();
        clear_color.call1((0.5,)).unwrap();
        assert_eq!(h.gl.clear_color_value(), [0.5, 0.0, 0.0, 1.0]);

        clear_color.call1((1, 0.25, 0.5, 0.0)).unwrap();
        assert_eq!(h.gl.clear_color_value(), [1.0, 0.25, 0.5, 0.0]);

        clear_color.call0().unwrap();
        assert_eq!(h.gl.clear_color_value(), [0.0, 0.0, 0.0, 1.0]);

        let err = clear_color.call1((0.0, 0.0, 0.0, 0.0, 0.0)).unwrap_err();
        assert!(err.is_instance_of::<PyValueError>(py), "{err}");
        assert_eq!(
            err.value(py).to_string(),
            "Expected at most 4 arguments to create color from"
        );

        let err = clear_color.call1(("red",)).unwrap_err();
        assert!(err.is_instance_of::<PyTypeError>(py), "{err}");
    });
}

#[test]
fn state_helpers() {
    let h = headless();
    with_gl(|py, gl| {
        gl.getattr("viewport").unwrap().call1((0, 0, 640, 480)).unwrap();
        assert_eq!(h.gl.viewport_value(), [0, 0, 640, 480]);

        let depth = gl.getattr("DEPTH_TEST").unwrap();
        gl.getattr("enable").unwrap().call1((&depth,)).unwrap();
        assert!(h.gl.is_enabled(consts::DEPTH_TEST));
        gl.getattr("disable").unwrap().call1((&depth,)).unwrap();
        assert!(!h.gl.is_enabled(consts::DEPTH_TEST));

        let clear = gl.getattr("clear").unwrap();
        clear.call0().unwrap();
        let err = clear.call1((-1,)).unwrap_err();
        assert!(err.is_instance_of::<PyOverflowError>(py), "{err}");
    });
}

#[test]
fn unknown_attributes_are_attribute_errors() {
    let _h = headless();
    with_gl(|py, gl| {
        let vbo = gl.getattr("VBO").unwrap().call0().unwrap();
        assert_eq!(vbo.getattr("size").unwrap().extract::<usize>().unwrap(), 0);

        let err = vbo.getattr("capacity").unwrap_err();
        assert!(err.is_instance_of::<PyAttributeError>(py), "{err}");
        let err = gl.getattr("nope").unwrap_err();
        assert!(err.is_instance_of::<PyAttributeError>(py), "{err}");

        let err = gl.getattr("FLOAT").unwrap().call0().unwrap_err();
        assert!(err.is_instance_of::<PyTypeError>(py), "{err}");
    });
}

#[test]
fn objects_print_and_coerce() {
    let h = headless();
    with_gl(|_py, gl| {
        let vao = gl.getattr("VAO").unwrap().call0().unwrap();
        let handle = vao.call_method0("__index__").unwrap().extract::<i32>().unwrap();
        assert_eq!(vao.repr().unwrap().to_string(), format!("<gl.VAO val={handle}>"));

        // Objects convert to their handle wherever an int is expected.
        let vbo = gl.getattr("VBO").unwrap().call0().unwrap();
        let buffer = vbo.call_method0("__index__").unwrap().extract::<i32>().unwrap();
        gl.getattr("viewport").unwrap().call1((&vao, &vbo, &vbo, &vbo)).unwrap();
        assert_eq!(h.gl.viewport_value(), [handle, buffer, buffer, buffer]);
    });
}

#[test]
fn module_functions_need_a_current_context() {
    let _h = headless();
    with_gl(|py, gl| {
        let clear = gl.getattr("clear").unwrap().unbind();
        let outcome = py.detach(move || {
            std::thread::spawn(move || {
                Python::attach(|py| {
                    let err = clear.bind(py).call0().unwrap_err();
                    (err.is_instance_of::<WindowError>(py), err.value(py).to_string())
                })
            })
            .join()
            .unwrap()
        });
        assert!(outcome.0);
        assert_eq!(outcome.1, "No current OpenGL context; open a gl.glfw.Window first");
    });
}
