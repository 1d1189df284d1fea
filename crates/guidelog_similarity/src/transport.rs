//! Transport distances between two point sets.
//!
//! Both strategies consume a [`CostMatrix`] whose rows are ground-truth edges
//! and whose columns are generated edges.
//!
//! - [`EarthMovers`] solves balanced optimal transport with uniform marginals
//!   exactly, as an integer min-cost flow (every row supplies `cols` units and
//!   every column demands `rows` units, so no fractional masses are needed).
//! - [`Assignment`] solves the rectangular linear assignment problem and
//!   reports the mean cost of the matched pairs.

use guidelog_foundation::Error;
use thiserror::Error;

// =============================================================================
// Errors
// =============================================================================

/// Failure of a transport strategy.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TransportError {
    /// One side of the problem has no points.
    #[error("cost matrix is empty")]
    Empty,

    /// A cost is NaN or infinite.
    #[error("non-finite cost at ({row}, {col})")]
    NonFiniteCost {
        /// Row of the offending cost.
        row: usize,
        /// Column of the offending cost.
        col: usize,
    },

    /// The solver hit its iteration limit.
    #[error("no convergence after {iterations} iterations")]
    NotConverged {
        /// Iterations performed.
        iterations: usize,
    },

    /// Data length does not match the declared shape.
    #[error("expected {expected} costs, got {actual}")]
    DimensionMismatch {
        /// `rows * cols`.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        Error::transport(err.to_string())
    }
}

// =============================================================================
// Cost Matrix
// =============================================================================

/// Dense row-major cost matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl CostMatrix {
    /// Creates a matrix from row-major data.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::DimensionMismatch`] if `data.len()` is not
    /// `rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, TransportError> {
        if data.len() != rows * cols {
            return Err(TransportError::DimensionMismatch {
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Creates a matrix by evaluating `cost(row, col)` for every cell.
    pub fn from_fn(rows: usize, cols: usize, mut cost: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                data.push(cost(row, col));
            }
        }
        Self { rows, cols, data }
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cost of cell `(row, col)`.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Returns the transposed matrix.
    #[must_use]
    pub fn transpose(&self) -> Self {
        Self::from_fn(self.cols, self.rows, |row, col| self.get(col, row))
    }

    /// Checks that the matrix is non-empty and every cost is finite.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Empty`] or [`TransportError::NonFiniteCost`].
    pub fn validate(&self) -> Result<(), TransportError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(TransportError::Empty);
        }
        match self.data.iter().position(|c| !c.is_finite()) {
            Some(pos) => Err(TransportError::NonFiniteCost {
                row: pos / self.cols,
                col: pos % self.cols,
            }),
            None => Ok(()),
        }
    }
}

// =============================================================================
// Strategy Trait
// =============================================================================

/// A way of turning a cost matrix into one distance.
pub trait TransportStrategy {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Computes the distance.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the matrix is unusable or the solver
    /// fails.
    fn distance(&self, costs: &CostMatrix) -> Result<f64, TransportError>;
}

// =============================================================================
// Earth Mover's Distance
// =============================================================================

/// Exact balanced optimal transport with uniform marginals.
///
/// Solved by successive shortest paths with Johnson potentials over the
/// bipartite network `source -> rows -> cols -> sink`. The returned value is
/// `sum(plan * cost)` with the plan normalized to total mass 1.
#[derive(Clone, Copy, Debug, Default)]
pub struct EarthMovers {
    max_iterations: Option<usize>,
}

impl EarthMovers {
    /// Creates a solver whose iteration limit scales with the problem size.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of augmenting paths.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }
}

impl TransportStrategy for EarthMovers {
    fn name(&self) -> &'static str {
        "emd"
    }

    fn distance(&self, costs: &CostMatrix) -> Result<f64, TransportError> {
        costs.validate()?;
        let (n1, n2) = (costs.rows(), costs.cols());
        let limit = self
            .max_iterations
            .unwrap_or(2 * (n1 * n2 + n1 + n2) + 1);
        let flow = FlowNetwork::new(costs).solve(limit)?;

        let mut total = 0.0;
        for row in 0..n1 {
            for col in 0..n2 {
                #[allow(clippy::cast_precision_loss)]
                let units = flow[row * n2 + col] as f64;
                total += units * costs.get(row, col);
            }
        }
        #[allow(clippy::cast_precision_loss)]
        let mass = (n1 * n2) as f64;
        Ok(total / mass)
    }
}

/// Residual state of the transport network.
struct FlowNetwork<'a> {
    costs: &'a CostMatrix,
    supply: Vec<u64>,
    demand: Vec<u64>,
    flow: Vec<u64>,
    potential: Vec<f64>,
}

impl<'a> FlowNetwork<'a> {
    fn new(costs: &'a CostMatrix) -> Self {
        let (n1, n2) = (costs.rows(), costs.cols());
        // Initial potentials are exact shortest distances on the acyclic
        // starting network, which keeps reduced costs non-negative even for
        // negative input costs.
        let mut potential = vec![0.0; n1 + n2 + 2];
        let mut sink = f64::INFINITY;
        for col in 0..n2 {
            let best = (0..n1)
                .map(|row| costs.get(row, col))
                .fold(f64::INFINITY, f64::min);
            potential[n1 + col] = best;
            sink = sink.min(best);
        }
        potential[n1 + n2 + 1] = sink;

        Self {
            costs,
            supply: vec![n2 as u64; n1],
            demand: vec![n1 as u64; n2],
            flow: vec![0; n1 * n2],
            potential,
        }
    }

    fn rows(&self) -> usize {
        self.costs.rows()
    }

    fn cols(&self) -> usize {
        self.costs.cols()
    }

    fn source(&self) -> usize {
        self.rows() + self.cols()
    }

    fn sink(&self) -> usize {
        self.rows() + self.cols() + 1
    }

    /// Pushes flow along shortest paths until all supply is routed.
    fn solve(mut self, limit: usize) -> Result<Vec<u64>, TransportError> {
        let mut iterations = 0;
        while self.supply.iter().any(|&s| s > 0) {
            if iterations >= limit {
                return Err(TransportError::NotConverged { iterations });
            }
            iterations += 1;

            let (dist, prev) = self.shortest_paths();
            let sink = self.sink();
            if !dist[sink].is_finite() {
                return Err(TransportError::NotConverged { iterations });
            }
            for (pot, d) in self.potential.iter_mut().zip(&dist) {
                *pot += d.min(dist[sink]);
            }
            self.augment(&prev);
        }
        Ok(self.flow)
    }

    fn reduced(&self, from: usize, to: usize, cost: f64) -> f64 {
        (cost + self.potential[from] - self.potential[to]).max(0.0)
    }

    /// Dense Dijkstra over the residual network.
    fn shortest_paths(&self) -> (Vec<f64>, Vec<usize>) {
        let (n1, n2) = (self.rows(), self.cols());
        let (source, sink) = (self.source(), self.sink());
        let nodes = n1 + n2 + 2;
        let mut dist = vec![f64::INFINITY; nodes];
        let mut prev = vec![usize::MAX; nodes];
        let mut done = vec![false; nodes];
        dist[source] = 0.0;

        loop {
            let Some(u) = (0..nodes)
                .filter(|&x| !done[x] && dist[x].is_finite())
                .min_by(|&a, &b| dist[a].total_cmp(&dist[b]))
            else {
                break;
            };
            done[u] = true;
            if u == sink {
                break;
            }

            let mut relax = |v: usize, weight: f64, dist: &mut Vec<f64>| {
                let candidate = dist[u] + weight;
                if candidate < dist[v] {
                    dist[v] = candidate;
                    prev[v] = u;
                }
            };

            if u == source {
                for row in (0..n1).filter(|&r| self.supply[r] > 0) {
                    relax(row, self.reduced(source, row, 0.0), &mut dist);
                }
            } else if u < n1 {
                for col in 0..n2 {
                    let v = n1 + col;
                    relax(v, self.reduced(u, v, self.costs.get(u, col)), &mut dist);
                }
            } else {
                let col = u - n1;
                for row in (0..n1).filter(|&r| self.flow[r * n2 + col] > 0) {
                    relax(row, self.reduced(u, row, -self.costs.get(row, col)), &mut dist);
                }
                if self.demand[col] > 0 {
                    relax(sink, self.reduced(u, sink, 0.0), &mut dist);
                }
            }
        }
        (dist, prev)
    }

    /// Collects the path ending at the sink as `(from, to)` hops.
    fn path(&self, prev: &[usize]) -> Vec<(usize, usize)> {
        let mut hops = Vec::new();
        let mut node = self.sink();
        while node != self.source() {
            let from = prev[node];
            hops.push((from, node));
            node = from;
        }
        hops.reverse();
        hops
    }

    fn augment(&mut self, prev: &[usize]) {
        let (n1, n2) = (self.rows(), self.cols());
        let hops = self.path(prev);

        let mut bottleneck = u64::MAX;
        for &(from, to) in &hops {
            if from == self.source() {
                bottleneck = bottleneck.min(self.supply[to]);
            } else if to == self.sink() {
                bottleneck = bottleneck.min(self.demand[from - n1]);
            } else if from >= n1 {
                bottleneck = bottleneck.min(self.flow[to * n2 + (from - n1)]);
            }
        }

        for &(from, to) in &hops {
            if from == self.source() {
                self.supply[to] -= bottleneck;
            } else if to == self.sink() {
                self.demand[from - n1] -= bottleneck;
            } else if from < n1 {
                self.flow[from * n2 + (to - n1)] += bottleneck;
            } else {
                self.flow[to * n2 + (from - n1)] -= bottleneck;
            }
        }
    }
}

// =============================================================================
// Linear Assignment
// =============================================================================

/// Rectangular linear assignment (Hungarian algorithm).
///
/// Matches `min(rows, cols)` pairs at minimum total cost and reports their
/// mean cost.
#[derive(Clone, Copy, Debug, Default)]
pub struct Assignment;

impl Assignment {
    /// Returns the optimal `(row, col)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Empty`] or [`TransportError::NonFiniteCost`].
    pub fn solve(costs: &CostMatrix) -> Result<Vec<(usize, usize)>, TransportError> {
        costs.validate()?;
        if costs.rows() > costs.cols() {
            let pairs = hungarian(&costs.transpose());
            return Ok(pairs.into_iter().map(|(r, c)| (c, r)).collect());
        }
        Ok(hungarian(costs))
    }
}

impl TransportStrategy for Assignment {
    fn name(&self) -> &'static str {
        "assignment"
    }

    fn distance(&self, costs: &CostMatrix) -> Result<f64, TransportError> {
        let pairs = Self::solve(costs)?;
        let total: f64 = pairs.iter().map(|&(r, c)| costs.get(r, c)).sum();
        #[allow(clippy::cast_precision_loss)]
        let matched = pairs.len() as f64;
        Ok(total / matched)
    }
}

/// Hungarian algorithm with potentials for `rows <= cols`. One-indexed
/// internally; column 0 is a virtual start.
fn hungarian(costs: &CostMatrix) -> Vec<(usize, usize)> {
    let (n, m) = (costs.rows(), costs.cols());
    let mut u = vec![0.0; n + 1];
    let mut v = vec![0.0; m + 1];
    let mut matched_row = vec![0usize; m + 1];
    let mut way = vec![0usize; m + 1];

    for row in 1..=n {
        matched_row[0] = row;
        let mut col0 = 0;
        let mut min_v = vec![f64::INFINITY; m + 1];
        let mut used = vec![false; m + 1];
        loop {
            used[col0] = true;
            let row0 = matched_row[col0];
            let mut delta = f64::INFINITY;
            let mut col1 = 0;
            for col in 1..=m {
                if used[col] {
                    continue;
                }
                let current = costs.get(row0 - 1, col - 1) - u[row0] - v[col];
                if current < min_v[col] {
                    min_v[col] = current;
                    way[col] = col0;
                }
                if min_v[col] < delta {
                    delta = min_v[col];
                    col1 = col;
                }
            }
            for col in 0..=m {
                if used[col] {
                    u[matched_row[col]] += delta;
                    v[col] -= delta;
                } else {
                    min_v[col] -= delta;
                }
            }
            col0 = col1;
            if matched_row[col0] == 0 {
                break;
            }
        }
        loop {
            let col1 = way[col0];
            matched_row[col0] = matched_row[col1];
            col0 = col1;
            if col0 == 0 {
                break;
            }
        }
    }

    let mut pairs: Vec<(usize, usize)> = (1..=m)
        .filter(|&col| matched_row[col] != 0)
        .map(|col| (matched_row[col] - 1, col - 1))
        .collect();
    pairs.sort_unstable();
    pairs
}
