//! Uniform values, resolved once from their shape.

use cgmath::{Matrix2, Matrix3, Matrix4, Vector2, Vector3, Vector4};

use crate::{
    error::{Error, Result},
    native::{GlApi, MatrixShape},
};

/// A value that can be uploaded to a shader uniform.
///
/// Matrix data is stored row-major; it is sent with `transpose = true`.
/// Values built by hand are checked by [`UniformValue::validate`] before
/// upload.
#[derive(Clone, Debug, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    /// 1 to 4 components.
    Vector(Vec<f32>),
    /// `rows` and `cols` in `2..=4`, `data.len() == rows * cols`.
    Matrix { rows: usize, cols: usize, data: Vec<f32> },
}

/// A number or an arbitrarily nested sequence of numbers, as handed over
/// from script lists and tuples.
#[derive(Clone, Debug, PartialEq)]
pub enum Nested {
    Scalar(f64),
    Seq(Vec<Nested>),
}

impl Nested {
    /// Flattens a rectangular nesting into its shape and row-major data.
    ///
    /// Siblings must all be scalars or all be sequences of equal length.
    pub fn flatten(&self) -> Result<(Vec<usize>, Vec<f32>)> {
        let mut shape = Vec::new();
        let mut level = self;
        while let Nested::Seq(items) = level {
            shape.push(items.len());
            match items.first() {
                Some(first) => level = first,
                None => break,
            }
        }
        let mut data = Vec::with_capacity(shape.iter().product());
        self.collect(&shape, &mut data)?;
        Ok((shape, data))
    }

    fn collect(&self, shape: &[usize], out: &mut Vec<f32>) -> Result<()> {
        match (self, shape) {
            (Nested::Scalar(x), []) => {
                out.push(*x as f32);
                Ok(())
            }
            (Nested::Seq(items), [len, rest @ ..]) if items.len() == *len => {
                items.iter().try_for_each(|item| item.collect(rest, out))
            }
            (Nested::Seq(items), [len, ..]) => Err(Error::Argument(format!(
                "Ragged sequence: expected {len} items, got {}",
                items.len()
            ))),
            _ => Err(Error::Argument(
                "Ragged sequence: numbers and sequences mixed at the same depth".to_string(),
            )),
        }
    }
}

impl UniformValue {
    /// An integer uniform. Values outside the `i32` range are rejected.
    pub fn int(value: i64) -> Result<Self> {
        i32::try_from(value)
            .map(UniformValue::Int)
            .map_err(|_| Error::Argument(format!("Uniform integer {value} out of range")))
    }

    pub fn vector(values: &[f32]) -> Result<Self> {
        let value = UniformValue::Vector(values.to_vec());
        value.validate()?;
        Ok(value)
    }

    /// A `rows`x`cols` matrix from row-major data.
    pub fn matrix(rows: usize, cols: usize, row_major: &[f32]) -> Result<Self> {
        let value = UniformValue::Matrix {
            rows,
            cols,
            data: row_major.to_vec(),
        };
        value.validate()?;
        Ok(value)
    }

    /// Picks the variant from the shape of row-major `data`.
    pub fn from_shape(shape: &[usize], data: &[f32]) -> Result<Self> {
        match *shape {
            [] => data
                .first()
                .map(|x| UniformValue::Float(*x))
                .ok_or_else(|| Error::Size("Empty scalar".to_string())),
            [_] => Self::vector(data),
            [rows, cols] if rows == 1 || cols == 1 => Self::vector(data),
            [rows, cols] => Self::matrix(rows, cols, data),
            _ => Err(Error::Size(format!(
                "Uniform values must have rank 0, 1 or 2, got rank {}",
                shape.len()
            ))),
        }
    }

    /// Resolves a nested sequence by its shape.
    pub fn from_nested(nested: &Nested) -> Result<Self> {
        let (shape, data) = nested.flatten()?;
        Self::from_shape(&shape, &data)
    }

    /// Checks the component count of vectors and the dimensions of
    /// matrices.
    pub fn validate(&self) -> Result<()> {
        match self {
            UniformValue::Int(_) | UniformValue::Float(_) => Ok(()),
            UniformValue::Vector(v) if v.is_empty() || v.len() > 4 => Err(Error::Size(format!(
                "Uniform vectors must have 1 to 4 components, got {}",
                v.len()
            ))),
            UniformValue::Vector(_) => Ok(()),
            UniformValue::Matrix { rows, cols, .. } if MatrixShape::new(*cols, *rows).is_none() => {
                Err(Error::Size(format!(
                    "Uniform matrices must be 2x2 through 4x4, got {rows}x{cols}"
                )))
            }
            UniformValue::Matrix { rows, cols, data } if data.len() != rows * cols => {
                Err(Error::Size(format!(
                    "A {rows}x{cols} matrix needs {} values, got {}",
                    rows * cols,
                    data.len()
                )))
            }
            UniformValue::Matrix { .. } => Ok(()),
        }
    }

    /// Issues the native upload for the current program.
    pub(crate) fn apply(&self, gl: &dyn GlApi, location: u32) -> Result<()> {
        self.validate()?;
        match self {
            UniformValue::Int(x) => gl.uniform_1_i32(location, *x),
            UniformValue::Float(x) => gl.uniform_1_f32(location, *x),
            UniformValue::Vector(v) => match v.as_slice() {
                [x] => gl.uniform_1_f32(location, *x),
                [x, y] => gl.uniform_2_f32(location, *x, *y),
                [x, y, z] => gl.uniform_3_f32(location, *x, *y, *z),
                [x, y, z, w] => gl.uniform_4_f32(location, *x, *y, *z, *w),
                _ => {
                    return Err(Error::Size(format!(
                        "Uniform vectors must have 1 to 4 components, got {}",
                        v.len()
                    )));
                }
            },
            UniformValue::Matrix { rows, cols, data } => {
                let shape = MatrixShape::new(*cols, *rows).ok_or_else(|| {
                    Error::Size(format!("Uniform matrices must be 2x2 through 4x4, got {rows}x{cols}"))
                })?;
                gl.uniform_matrix_f32(location, shape, true, data)
            }
        }
        Ok(())
    }
}

impl From<i32> for UniformValue {
    fn from(value: i32) -> Self {
        UniformValue::Int(value)
    }
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        UniformValue::Float(value)
    }
}

impl From<Vector2<f32>> for UniformValue {
    fn from(v: Vector2<f32>) -> Self {
        UniformValue::Vector(vec![v.x, v.y])
    }
}

impl From<Vector3<f32>> for UniformValue {
    fn from(v: Vector3<f32>) -> Self {
        UniformValue::Vector(vec![v.x, v.y, v.z])
    }
}

impl From<Vector4<f32>> for UniformValue {
    fn from(v: Vector4<f32>) -> Self {
        UniformValue::Vector(vec![v.x, v.y, v.z, v.w])
    }
}

// cgmath matrices are column-major: m[col][row].
macro_rules! from_cgmath_matrix {
    ($ty:ident, $n:literal) => {
        impl From<$ty<f32>> for UniformValue {
            fn from(m: $ty<f32>) -> Self {
                let mut data = Vec::with_capacity($n * $n);
                for row in 0..$n {
                    for col in 0..$n {
                        data.push(m[col][row]);
                    }
                }
                UniformValue::Matrix {
                    rows: $n,
                    cols: $n,
                    data,
                }
            }
        }
    };
}

from_cgmath_matrix!(Matrix2, 2);
from_cgmath_matrix!(Matrix3, 3);
from_cgmath_matrix!(Matrix4, 4);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn seq(items: Vec<Nested>) -> Nested {
        Nested::Seq(items)
    }

    fn row(values: &[f64]) -> Nested {
        seq(values.iter().map(|v| Nested::Scalar(*v)).collect())
    }

    #[test]
    fn unit_dimension_is_a_vector_either_way() {
        let row = UniformValue::from_shape(&[1, 3], &[1.0, 2.0, 3.0]).unwrap();
        let col = UniformValue::from_shape(&[3, 1], &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(row, col);
        assert_eq!(
            UniformValue::from_shape(&[1, 1], &[5.0]).unwrap(),
            UniformValue::Vector(vec![5.0])
        );
    }

    #[test]
    fn cgmath_matrices_become_row_major() {
        let m = Matrix2::new(1.0, 2.0, 3.0, 4.0); // columns (1, 2) and (3, 4)
        assert_eq!(
            UniformValue::from(m),
            UniformValue::Matrix {
                rows: 2,
                cols: 2,
                data: vec![1.0, 3.0, 2.0, 4.0]
            }
        );
    }

    #[test]
    fn rejects_out_of_range_shapes() {
        for shape in [vec![5], vec![1, 5], vec![5, 1], vec![5, 2], vec![2, 5], vec![2, 2, 2]] {
            let len = shape.iter().product::<usize>();
            let err = UniformValue::from_shape(&shape, &vec![0.0; len]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Size, "shape {shape:?}");
        }
    }

    #[test]
    fn nested_rows_flatten_row_major() {
        let nested = seq(vec![row(&[1.0, 2.0]), row(&[3.0, 4.0]), row(&[5.0, 6.0])]);
        let (shape, data) = nested.flatten().unwrap();
        assert_eq!(shape, [3, 2]);
        assert_eq!(data, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(
            UniformValue::from_nested(&nested).unwrap(),
            UniformValue::Matrix {
                rows: 3,
                cols: 2,
                data
            }
        );
        assert_eq!(Nested::Scalar(2.5).flatten().unwrap(), (vec![], vec![2.5]));
        assert_eq!(seq(vec![]).flatten().unwrap(), (vec![0], vec![]));
    }

    #[test]
    fn ragged_nesting_is_an_argument_error() {
        let cases = [
            // [1.0, [2.0]]
            seq(vec![Nested::Scalar(1.0), row(&[2.0])]),
            // [[1.0], 2.0]
            seq(vec![row(&[1.0]), Nested::Scalar(2.0)]),
            // [[1.0, 2.0], [3.0]]
            seq(vec![row(&[1.0, 2.0]), row(&[3.0])]),
            // [[1.0], []]
            seq(vec![row(&[1.0]), seq(vec![])]),
            // [[[1.0]], [2.0]]
            seq(vec![seq(vec![row(&[1.0])]), row(&[2.0])]),
        ];
        for nested in cases {
            let err = UniformValue::from_nested(&nested).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Argument, "{nested:?}");
        }
    }

    #[test]
    fn integers_outside_i32_are_rejected() {
        assert_eq!(UniformValue::int(-7).unwrap(), UniformValue::Int(-7));
        assert_eq!(UniformValue::int(i32::MAX as i64).unwrap(), UniformValue::Int(i32::MAX));
        for value in [1 << 40, i64::MIN, i32::MAX as i64 + 1] {
            assert_eq!(UniformValue::int(value).unwrap_err().kind(), ErrorKind::Argument);
        }
    }

    #[test]
    fn hand_built_values_are_validated() {
        let bad = [
            UniformValue::Vector(vec![]),
            UniformValue::Vector(vec![0.0; 7]),
            UniformValue::Matrix {
                rows: 1,
                cols: 4,
                data: vec![0.0; 4],
            },
            UniformValue::Matrix {
                rows: 3,
                cols: 3,
                data: vec![0.0; 8],
            },
        ];
        for value in bad {
            assert_eq!(value.validate().unwrap_err().kind(), ErrorKind::Size, "{value:?}");
        }
        assert!(UniformValue::Vector(vec![1.0; 4]).validate().is_ok());
    }
}
