//! Dense matrix of `f64` values.
//!
//! A thin, shape-checked layer over `ndarray::Array2`. Operations come in two
//! flavours with distinct names: `*_in_place` methods mutate `self`, and the
//! others (`mapped`, `multiplied`, `added`, `subtract`, `dot`, `transpose`)
//! leave their operands alone and return a new matrix. Binary operations
//! never broadcast: operands must have the documented shapes or the call
//! fails with [`Error::ShapeMismatch`] before anything is touched.

use std::fmt;

use ndarray::Array2;
use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use crate::error::{Error, Result};

/// A rows × cols matrix, zero initialized unless built from data
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Array2<f64>,
}

impl Matrix {
    /// Zero-filled matrix of the given shape
    pub fn new(rows: usize, cols: usize) -> Matrix {
        Matrix {
            data: Array2::zeros((rows, cols)),
        }
    }

    /// Column vector (`values.len()` × 1)
    pub fn from_vector(values: &[f64]) -> Matrix {
        Matrix {
            data: Array2::from_shape_fn((values.len(), 1), |(row, _)| values[row]),
        }
    }

    /// Matrix whose rows are copies of `rows`. Every row must have the same length.
    pub fn from_grid(rows: &[Vec<f64>]) -> Result<Matrix> {
        let cols = rows.first().map_or(0, Vec::len);

        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(Error::shape(format!(
                "row {} has {} elements, expected {}",
                idx,
                row.len(),
                cols
            )));
        }

        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let data = Array2::from_shape_vec((rows.len(), cols), flat)
            .map_err(|e| Error::shape(e.to_string()))?;

        Ok(Matrix { data })
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get((row, col)).copied()
    }

    /// Elements in row-major order
    pub fn iter(&self) -> impl Iterator<Item = &f64> + '_ {
        self.data.iter()
    }

    /// All elements flattened in row-major order. For a row or column vector
    /// this is simply its elements.
    pub fn to_vec(&self) -> Vec<f64> {
        self.data.iter().copied().collect()
    }

    /// One `Vec` per row
    pub fn to_grid(&self) -> Vec<Vec<f64>> {
        self.data.outer_iter().map(|row| row.to_vec()).collect()
    }

    /// Fill with values drawn uniformly from the closed interval `[lower, upper]`
    pub fn randomize(&mut self, lower: f64, upper: f64) -> Result<&mut Self> {
        self.randomize_with(&mut rand::thread_rng(), lower, upper)
    }

    /// Same as [`Matrix::randomize`] but with a caller supplied generator
    pub fn randomize_with<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        lower: f64,
        upper: f64,
    ) -> Result<&mut Self> {
        let distribution = uniform(lower, upper)?;
        self.data.mapv_inplace(|_| distribution.sample(rng));

        Ok(self)
    }

    /// Replace every element with `f(value, row, col)`
    pub fn map_in_place<F>(&mut self, mut f: F) -> &mut Self
    where
        F: FnMut(f64, usize, usize) -> f64,
    {
        for ((row, col), x) in self.data.indexed_iter_mut() {
            *x = f(*x, row, col);
        }

        self
    }

    /// Non-mutating counterpart of [`Matrix::map_in_place`]
    pub fn mapped<F>(&self, mut f: F) -> Matrix
    where
        F: FnMut(f64, usize, usize) -> f64,
    {
        Matrix {
            data: Array2::from_shape_fn(self.data.dim(), |(row, col)| {
                f(self.data[[row, col]], row, col)
            }),
        }
    }

    /// Matrix product. Requires `self.cols() == other.rows()`.
    pub fn dot(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols() != other.rows() {
            return Err(Error::shape(format!(
                "cannot multiply {:?} by {:?}: columns of the first must match rows of the second",
                self.shape(),
                other.shape()
            )));
        }

        Ok(Matrix {
            data: self.data.dot(&other.data),
        })
    }

    /// Element-wise product, in place
    pub fn multiply_in_place(&mut self, other: &Matrix) -> Result<&mut Self> {
        self.check_same_shape(other, "element-wise multiplication")?;
        self.data *= &other.data;

        Ok(self)
    }

    /// Multiply every element by `factor`, in place
    pub fn scale_in_place(&mut self, factor: f64) -> &mut Self {
        self.data *= factor;
        self
    }

    /// Element-wise product as a new matrix
    pub fn multiplied(&self, other: &Matrix) -> Result<Matrix> {
        self.check_same_shape(other, "element-wise multiplication")?;

        Ok(Matrix {
            data: &self.data * &other.data,
        })
    }

    /// Every element multiplied by `factor`, as a new matrix
    pub fn scaled(&self, factor: f64) -> Matrix {
        Matrix {
            data: &self.data * factor,
        }
    }

    /// Element-wise sum, in place
    pub fn add_in_place(&mut self, other: &Matrix) -> Result<&mut Self> {
        self.check_same_shape(other, "element-wise addition")?;
        self.data += &other.data;

        Ok(self)
    }

    /// Add `value` to every element, in place
    pub fn add_scalar_in_place(&mut self, value: f64) -> &mut Self {
        self.data += value;
        self
    }

    /// Element-wise sum as a new matrix
    pub fn added(&self, other: &Matrix) -> Result<Matrix> {
        self.check_same_shape(other, "element-wise addition")?;

        Ok(Matrix {
            data: &self.data + &other.data,
        })
    }

    /// `self - other`, element-wise, as a new matrix
    pub fn subtract(&self, other: &Matrix) -> Result<Matrix> {
        self.check_same_shape(other, "element-wise subtraction")?;

        Ok(Matrix {
            data: &self.data - &other.data,
        })
    }

    pub fn transpose(&self) -> Matrix {
        Matrix {
            data: self.data.t().to_owned(),
        }
    }

    fn check_same_shape(&self, other: &Matrix, op: &str) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(Error::shape(format!(
                "incompatible matrices for {}: {:?} and {:?}",
                op,
                self.shape(),
                other.shape()
            )));
        }

        Ok(())
    }
}

/// Closed-interval uniform distribution, rejecting bounds that do not form one
pub(crate) fn uniform(lower: f64, upper: f64) -> Result<Uniform<f64>> {
    if !(lower.is_finite() && upper.is_finite()) || upper < lower || !(upper - lower).is_finite() {
        return Err(Error::Range { lower, upper });
    }

    Ok(Uniform::new_inclusive(lower, upper))
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (idx, row) in self.data.outer_iter().enumerate() {
            if idx != 0 {
                write!(f, "\n ")?;
            }
            let cells: Vec<String> = row.iter().map(|x| x.to_string()).collect();
            write!(f, "[{}]", cells.join(", "))?;
        }
        write!(f, "]")
    }
}
