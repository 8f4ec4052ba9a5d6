mod common;

use cgmath::{Matrix4, Vector3};
use common::test_utils::{FRAGMENT_SRC, VERTEX_SRC, headless};
use flow_gl::{ErrorKind, UniformValue, native::UniformCall, resources::Shader};

/// A uniform per `rows`x`cols` shape in `1..=4`, named `u{rows}x{cols}`.
fn shape_table_source() -> String {
    let mut source = String::from("#version 330 core\n");
    for rows in 1..=4 {
        for cols in 1..=4 {
            let ty = match (rows, cols) {
                (1, 1) => "float".to_string(),
                (1, n) | (n, 1) => format!("vec{n}"),
                (r, c) if r == c => format!("mat{c}"),
                (r, c) => format!("mat{c}x{r}"),
            };
            source.push_str(&format!("uniform {ty} u{rows}x{cols};\n"));
        }
    }
    source.push_str("void main() {}\n");
    source
}

#[test]
fn scalars_pick_int_or_float() {
    let h = headless();
    let shader = Shader::new(&h.ctx, VERTEX_SRC, FRAGMENT_SRC).unwrap();

    shader.set_uniform("mode", 3).unwrap();
    assert_eq!(h.gl.last_uniform_call(), Some(UniformCall::Int(3)));

    shader.set_uniform("alpha", 0.5f32).unwrap();
    assert_eq!(h.gl.last_uniform_call(), Some(UniformCall::Float(vec![0.5])));

    shader.set_uniform("mode", UniformValue::int(7).unwrap()).unwrap();
    assert_eq!(h.gl.last_uniform_call(), Some(UniformCall::Int(7)));
    assert_eq!(h.gl.current_program(), shader.handle().unwrap());
}

#[test]
fn every_shape_up_to_four_by_four_dispatches() {
    let h = headless();
    let source = shape_table_source();
    let shader = Shader::new(&h.ctx, &source, FRAGMENT_SRC).unwrap();

    for rows in 1..=4usize {
        for cols in 1..=4usize {
            let name = format!("u{rows}x{cols}");
            let data: Vec<f32> = (0..rows * cols).map(|i| i as f32).collect();
            let value = UniformValue::from_shape(&[rows, cols], &data).unwrap();
            shader.set_uniform(&name, value).unwrap();

            let expected = if rows == 1 || cols == 1 {
                UniformCall::Float(data)
            } else {
                UniformCall::Matrix {
                    cols,
                    rows,
                    transpose: true,
                    values: data,
                }
            };
            let calls = h.gl.uniform_calls();
            let (_, uniform, call) = calls.last().unwrap();
            assert_eq!(uniform, &name);
            assert_eq!(call, &expected, "{name}");
        }
    }
    assert_eq!(h.gl.uniform_calls().len(), 16);
}

#[test]
fn one_by_five_and_five_by_one_are_size_errors() {
    let h = headless();
    let shader = Shader::new(&h.ctx, VERTEX_SRC, FRAGMENT_SRC).unwrap();
    for shape in [[1, 5], [5, 1]] {
        let err = UniformValue::from_shape(&shape, &[0.0; 5]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Size, "{shape:?}");
        // The same shape built by hand fails at upload.
        let err = shader
            .set_uniform("color", UniformValue::Vector(vec![0.0; 5]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Size);
    }
    assert!(h.gl.uniform_calls().is_empty());
}

#[test]
fn matrices_are_sent_row_major_with_transpose() {
    let h = headless();
    let shader = Shader::new(&h.ctx, VERTEX_SRC, FRAGMENT_SRC).unwrap();

    let model = Matrix4::from_translation(Vector3::new(1.0f32, 2.0, 3.0));
    shader.set_uniform("model", model).unwrap();
    let Some(UniformCall::Matrix { cols, rows, transpose, values }) = h.gl.last_uniform_call() else {
        panic!("expected a matrix upload");
    };
    assert_eq!((cols, rows, transpose), (4, 4, true));
    // Translation sits in the last column, i.e. at the end of each row.
    assert_eq!(values[3], 1.0);
    assert_eq!(values[7], 2.0);
    assert_eq!(values[11], 3.0);

    let skew = UniformValue::matrix(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    shader.set_uniform("skew", skew).unwrap();
    assert_eq!(
        h.gl.last_uniform_call(),
        Some(UniformCall::Matrix {
            cols: 2,
            rows: 3,
            transpose: true,
            values: vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        })
    );
}

#[test]
fn malformed_values_fail_before_any_native_call() {
    let h = headless();
    let shader = Shader::new(&h.ctx, VERTEX_SRC, FRAGMENT_SRC).unwrap();

    let cases = [
        UniformValue::Vector(vec![]),
        UniformValue::Vector(vec![0.0; 7]),
        UniformValue::Matrix {
            rows: 4,
            cols: 5,
            data: vec![0.0; 20],
        },
        UniformValue::Matrix {
            rows: 4,
            cols: 4,
            data: vec![0.0; 15],
        },
    ];
    for value in cases {
        let err = shader.set_uniform("color", value.clone()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Size, "{value:?}");
    }
    assert!(h.gl.uniform_calls().is_empty());
    assert_eq!(h.gl.current_program(), 0);
}

#[test]
fn bad_names_and_values() {
    let h = headless();
    let shader = Shader::new(&h.ctx, VERTEX_SRC, FRAGMENT_SRC).unwrap();

    let err = shader.set_uniform("missing", 1.0f32).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownUniform);
    assert_eq!(err.to_string(), "Unknown uniform 'missing'");

    let err = UniformValue::int(1 << 40).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Argument);
}

#[cfg(feature = "python")]
mod python {
    use pyo3::{
        exceptions::{PyKeyError, PyValueError},
        prelude::*,
        types::PyList,
    };

    use super::*;
    use crate::common::test_utils::with_gl;
    use flow_gl::bindings::SizeError;

    #[test]
    fn sequences_and_numbers_through_the_module() {
        let h = headless();
        with_gl(|py, gl| {
            let shader = gl.getattr("Shader").unwrap().call1((VERTEX_SRC, FRAGMENT_SRC)).unwrap();

            for (name, values) in [
                ("weights", vec![0.25]),
                ("offset", vec![1.0, 2.0]),
                ("tint", vec![1.0, 0.5, 0.25]),
                ("color", vec![0.0, 0.0, 0.0, 1.0]),
            ] {
                shader.call_method1("uniform", (name, values.clone())).unwrap();
                let expected: Vec<f32> = values.iter().map(|v| *v as f32).collect();
                assert_eq!(h.gl.last_uniform_call(), Some(UniformCall::Float(expected)), "{name}");
            }

            // Row and column vectors both count as vectors.
            let column = PyList::new(py, [vec![1.0], vec![2.0], vec![3.0]]).unwrap();
            shader.call_method1("uniform", ("tint", column)).unwrap();
            assert_eq!(h.gl.last_uniform_call(), Some(UniformCall::Float(vec![1.0, 2.0, 3.0])));

            let skew = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
            shader.call_method1("uniform", ("skew", skew)).unwrap();
            assert!(matches!(
                h.gl.last_uniform_call(),
                Some(UniformCall::Matrix { cols: 2, rows: 3, .. })
            ));

            shader.call_method1("uniform", ("mode", true)).unwrap();
            assert_eq!(h.gl.last_uniform_call(), Some(UniformCall::Int(1)));
            shader.call_method1("uniform", ("mode", -4)).unwrap();
            assert_eq!(h.gl.last_uniform_call(), Some(UniformCall::Int(-4)));
        });
    }

    #[test]
    fn module_errors_carry_python_types() {
        let h = headless();
        with_gl(|py, gl| {
            let shader = gl.getattr("Shader").unwrap().call1((VERTEX_SRC, FRAGMENT_SRC)).unwrap();
            let calls_before = h.gl.uniform_calls().len();

            let five = vec![1.0, 2.0, 3.0, 4.0, 5.0];
            let empty: Vec<f64> = Vec::new();
            for value in [five.into_pyobject(py).unwrap(), empty.into_pyobject(py).unwrap()] {
                let err = shader.call_method1("uniform", ("color", value)).unwrap_err();
                assert!(err.is_instance_of::<SizeError>(py), "{err}");
            }

            // [1.0, [2.0]] and [[1.0, 2.0], [3.0]]
            let mixed = py.eval(c"[1.0, [2.0]]", None, None).unwrap();
            let short_row = py.eval(c"[[1.0, 2.0], [3.0]]", None, None).unwrap();
            for value in [mixed, short_row] {
                let err = shader.call_method1("uniform", ("skew", value)).unwrap_err();
                assert!(err.is_instance_of::<PyValueError>(py), "{err}");
                assert!(!err.is_instance_of::<SizeError>(py), "{err}");
            }

            let huge = py.eval(c"2 ** 40", None, None).unwrap();
            let err = shader.call_method1("uniform", ("mode", huge)).unwrap_err();
            assert!(err.is_instance_of::<PyValueError>(py), "{err}");
            let err = shader.call_method1("uniform", ("color", "red")).unwrap_err();
            assert!(err.is_instance_of::<PyValueError>(py), "{err}");
            let err = shader.call_method1("uniform", ("missing", 1.0)).unwrap_err();
            assert!(err.is_instance_of::<PyKeyError>(py), "{err}");

            assert_eq!(h.gl.uniform_calls().len(), calls_before);
        });
    }
}
