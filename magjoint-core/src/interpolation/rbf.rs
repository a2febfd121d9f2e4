//! Linear-kernel radial basis function interpolation
//!
//! ## Model
//!
//! For centers `x₁ … xₙ` in `ℝᵈ` and targets `y₁ … yₙ` in `ℝᵐ`:
//!
//! ```text
//! s(x) = Σᵢ cᵢ · φ(‖x - xᵢ‖) + Σⱼ dⱼ · pⱼ(x̂)        φ(r) = -r
//!
//! x̂ = (x - shift) / scale        (centers mapped into [-1, 1]ᵈ)
//! p  = [1]                      constant tail
//! p  = [1, x̂₁, …, x̂ᵈ]           affine tail
//! ```
//!
//! The coefficients solve the saddle-point system
//!
//! ```text
//! ┌ K   P ┐ ┌ c ┐   ┌ y ┐        Kᵢⱼ = φ(‖xᵢ - xⱼ‖)
//! └ Pᵀ  0 ┘ └ d ┘ = └ 0 ┘        Pᵢⱼ = pⱼ(x̂ᵢ)
//! ```
//!
//! There is no smoothing term, so `s(xᵢ) = yᵢ` at every center. The linear
//! kernel is conditionally positive definite of order 1: any tail containing
//! the constant makes the system nonsingular for distinct centers, and the
//! affine tail additionally needs centers that are affinely independent.
//!
//! ## Extrapolation
//!
//! Outside the convex hull of the centers the interpolant continues linearly
//! along the kernel and tail terms. Values there carry no accuracy guarantee
//! and will differ from other RBF implementations.

use nalgebra::DMatrix;

/// Polynomial tail choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PolynomialTail {
    /// Affine when the centers support it, constant otherwise
    #[default]
    Auto,
    /// Constant term only
    Constant,
    /// Constant plus one linear term per input dimension
    Affine,
}

/// Tail actually used by a fitted interpolant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailDegree {
    Constant,
    Affine,
}

/// Relative singular value below which the affine tail is rank deficient
const RANK_TOLERANCE: f64 = 1e-10;

/// Relative residual above which a solved system is treated as singular
const RESIDUAL_TOLERANCE: f64 = 1e-10;

/// Fitted linear-kernel interpolant
#[derive(Debug, Clone)]
pub struct RbfInterpolator {
    /// n × d
    centers: DMatrix<f64>,
    /// n × m
    kernel_weights: DMatrix<f64>,
    /// q × m
    tail_weights: DMatrix<f64>,
    shift: Vec<f64>,
    scale: Vec<f64>,
    degree: TailDegree,
}

impl RbfInterpolator {
    /// Fit `values` (n × m) at `centers` (n × d)
    ///
    /// Returns `None` when the system has no unique solution: duplicate
    /// centers, no centers, or an affine tail over affinely dependent
    /// centers. `Auto` retries with a constant tail before giving up.
    pub fn fit(centers: DMatrix<f64>, values: DMatrix<f64>, tail: PolynomialTail) -> Option<Self> {
        if centers.nrows() == 0 || centers.nrows() != values.nrows() {
            return None;
        }

        let (shift, scale) = domain_transform(&centers);
        let affine_ok = supports_affine_tail(&centers, &shift, &scale);
        match tail {
            PolynomialTail::Constant => solve(centers, &values, shift, scale, TailDegree::Constant),
            PolynomialTail::Affine if affine_ok => {
                solve(centers, &values, shift, scale, TailDegree::Affine)
            }
            PolynomialTail::Affine => None,
            PolynomialTail::Auto if affine_ok => {
                solve(centers.clone(), &values, shift.clone(), scale.clone(), TailDegree::Affine)
                    .or_else(|| solve(centers, &values, shift, scale, TailDegree::Constant))
            }
            PolynomialTail::Auto => solve(centers, &values, shift, scale, TailDegree::Constant),
        }
    }

    /// Interpolated value at `point` (length d), one entry per output
    pub fn evaluate(&self, point: &[f64]) -> Vec<f64> {
        let outputs = self.kernel_weights.ncols();
        let mut result = vec![0.0; outputs];

        for i in 0..self.centers.nrows() {
            let phi = kernel(distance(self.centers.row(i).iter().copied(), point.iter().copied()));
            for (k, out) in result.iter_mut().enumerate() {
                *out += self.kernel_weights[(i, k)] * phi;
            }
        }

        let monomials = monomials(point, &self.shift, &self.scale, self.degree);
        for (j, p) in monomials.iter().enumerate() {
            for (k, out) in result.iter_mut().enumerate() {
                *out += self.tail_weights[(j, k)] * p;
            }
        }

        result
    }

    /// Number of centers
    pub fn len(&self) -> usize {
        self.centers.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.nrows() == 0
    }

    /// Input dimension d
    pub fn dims(&self) -> usize {
        self.centers.ncols()
    }

    /// Output dimension m
    pub fn outputs(&self) -> usize {
        self.kernel_weights.ncols()
    }

    pub fn tail_degree(&self) -> TailDegree {
        self.degree
    }
}

fn solve(
    centers: DMatrix<f64>,
    values: &DMatrix<f64>,
    shift: Vec<f64>,
    scale: Vec<f64>,
    degree: TailDegree,
) -> Option<RbfInterpolator> {
    let n = centers.nrows();
    let m = values.ncols();
    let tail = tail_matrix(&centers, &shift, &scale, degree);
    let q = tail.ncols();

    let mut system = DMatrix::<f64>::zeros(n + q, n + q);
    for i in 0..n {
        for j in i + 1..n {
            let phi = kernel(distance(
                centers.row(i).iter().copied(),
                centers.row(j).iter().copied(),
            ));
            system[(i, j)] = phi;
            system[(j, i)] = phi;
        }
        for k in 0..q {
            system[(i, n + k)] = tail[(i, k)];
            system[(n + k, i)] = tail[(i, k)];
        }
    }

    let mut rhs = DMatrix::<f64>::zeros(n + q, m);
    rhs.rows_mut(0, n).copy_from(values);

    let solution = system.clone().lu().solve(&rhs)?;
    if solution.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let residual = (&system * &solution - &rhs).norm();
    if residual > RESIDUAL_TOLERANCE * rhs.norm().max(f64::MIN_POSITIVE) {
        return None;
    }

    Some(RbfInterpolator {
        kernel_weights: solution.rows(0, n).into_owned(),
        tail_weights: solution.rows(n, q).into_owned(),
        centers,
        shift,
        scale,
        degree,
    })
}

/// Linear kernel φ(r) = -r
fn kernel(r: f64) -> f64 {
    -r
}

fn distance(a: impl Iterator<Item = f64>, b: impl Iterator<Item = f64>) -> f64 {
    a.zip(b).map(|(x, y)| (x - y) * (x - y)).sum::<f64>().sqrt()
}

/// Per-dimension shift and scale mapping the centers' bounding box onto
/// [-1, 1]; flat dimensions keep scale 1
fn domain_transform(centers: &DMatrix<f64>) -> (Vec<f64>, Vec<f64>) {
    let mut shift = Vec::with_capacity(centers.ncols());
    let mut scale = Vec::with_capacity(centers.ncols());

    for column in centers.column_iter() {
        let min = column.min();
        let max = column.max();
        let half_range = (max - min) / 2.0;
        shift.push((max + min) / 2.0);
        scale.push(if half_range > 0.0 { half_range } else { 1.0 });
    }

    (shift, scale)
}

fn monomials(point: &[f64], shift: &[f64], scale: &[f64], degree: TailDegree) -> Vec<f64> {
    let mut out = vec![1.0];
    if degree == TailDegree::Affine {
        out.extend(
            point
                .iter()
                .zip(shift.iter().zip(scale.iter()))
                .map(|(x, (s, k))| (x - s) / k),
        );
    }
    out
}

fn tail_matrix(
    centers: &DMatrix<f64>,
    shift: &[f64],
    scale: &[f64],
    degree: TailDegree,
) -> DMatrix<f64> {
    let q = match degree {
        TailDegree::Constant => 1,
        TailDegree::Affine => centers.ncols() + 1,
    };

    let mut tail = DMatrix::<f64>::zeros(centers.nrows(), q);
    for i in 0..centers.nrows() {
        let row: Vec<f64> = centers.row(i).iter().copied().collect();
        for (j, p) in monomials(&row, shift, scale, degree).into_iter().enumerate() {
            tail[(i, j)] = p;
        }
    }
    tail
}

/// True when the affine tail over these centers has full column rank
fn supports_affine_tail(centers: &DMatrix<f64>, shift: &[f64], scale: &[f64]) -> bool {
    let q = centers.ncols() + 1;
    if centers.nrows() < q {
        return false;
    }

    let tail = tail_matrix(centers, shift, scale, TailDegree::Affine);
    let svd = tail.svd(false, false);
    let largest = svd.singular_values.max();
    svd.rank(RANK_TOLERANCE * largest.max(f64::MIN_POSITIVE)) == q
}
