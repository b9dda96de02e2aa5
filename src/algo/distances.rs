/*!
# All-Pairs Distances

Every lb-family algorithm needs exact pairwise distances over and over again, so they are
computed once by running a BFS from every node and stored in a dense [`DistanceMatrix`].

The matrix needs `n^2` entries and is the dominant memory consumer of the crate. The
[`DistanceOracle`] therefore owns it lazily: it is computed on demand, can be dropped
explicitly (releasing the allocation) and recomputed later. An optional memory limit is
checked *before* allocating.
*/

use std::time::Instant;

use log::{debug, info};

use super::*;
use crate::error::{CoverError, Result};

/// Dense `n x n` matrix of shortest-path distances of a connected graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<Distance>,
    diameter: Distance,
}

impl DistanceMatrix {
    /// Number of bytes the matrix of a graph with `n` nodes occupies
    pub fn required_bytes(n: NumNodes) -> usize {
        (n as usize)
            .saturating_mul(n as usize)
            .saturating_mul(std::mem::size_of::<Distance>())
    }

    /// Computes all pairwise distances by a BFS from every node.
    ///
    /// # Errors
    /// - [`CoverError::InvalidNetwork`] if the graph is empty or disconnected
    /// - [`CoverError::ResourceExhaustion`] if a distance does not fit into [`Distance`]
    pub fn compute<G>(graph: &G) -> Result<Self>
    where
        G: AdjacencyList,
    {
        let n = graph.len();
        if n == 0 {
            return Err(CoverError::InvalidNetwork("graph has no nodes".into()));
        }

        let mut data = vec![INFINITE_DISTANCE; n * n];
        let mut diameter = 0;

        for u in graph.vertices() {
            let row = &mut data[u as usize * n..(u as usize + 1) * n];
            let mut reached = 0;
            for (v, depth) in graph.bfs(u) {
                if depth >= INFINITE_DISTANCE as Depth {
                    return Err(CoverError::ResourceExhaustion(format!(
                        "distance {depth} exceeds the supported maximum of {}",
                        INFINITE_DISTANCE - 1
                    )));
                }
                row[v as usize] = depth as Distance;
                diameter = diameter.max(depth as Distance);
                reached += 1;
            }

            if reached != n {
                return Err(CoverError::InvalidNetwork(format!(
                    "graph is disconnected: node {u} reaches only {reached} of {n} nodes"
                )));
            }
        }

        Ok(Self { n, data, diameter })
    }

    /// Returns the number of nodes covered by the matrix
    pub fn number_of_nodes(&self) -> NumNodes {
        self.n as NumNodes
    }

    /// Returns the distance between `u` and `v`
    #[inline]
    pub fn distance(&self, u: Node, v: Node) -> Distance {
        self.data[u as usize * self.n + v as usize]
    }

    /// Returns the distances of `u` to all nodes
    #[inline]
    pub fn row(&self, u: Node) -> &[Distance] {
        &self.data[u as usize * self.n..(u as usize + 1) * self.n]
    }

    /// Returns the maximum distance between any two nodes
    pub fn diameter(&self) -> Distance {
        self.diameter
    }

    /// Returns an iterator over all nodes within distance `radius` of `center` in increasing order
    pub fn ball(&self, center: Node, radius: Distance) -> impl Iterator<Item = Node> + '_ {
        self.row(center)
            .iter()
            .enumerate()
            .filter_map(move |(v, &d)| (d <= radius).then_some(v as Node))
    }

    /// Returns *true* if `u` is within distance `bound` of every node in `members`
    #[inline]
    pub fn fits(&self, u: Node, members: &[Node], bound: Distance) -> bool {
        let row = self.row(u);
        members.iter().all(|&m| row[m as usize] <= bound)
    }

    /// Returns the sum of distances from `u` to all other nodes
    pub fn farness(&self, u: Node) -> u64 {
        self.row(u).iter().map(|&d| d as u64).sum()
    }
}

/// Lazily computed, droppable cache of a [`DistanceMatrix`].
///
/// The oracle remembers the diameter even after the matrix was dropped, as the
/// underlying graph of a network never changes.
#[derive(Clone, Debug, Default)]
pub struct DistanceOracle {
    matrix: Option<DistanceMatrix>,
    diameter: Option<Distance>,
    memory_limit: Option<usize>,
}

impl DistanceOracle {
    /// Creates an empty oracle without memory limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of bytes the distance matrix may occupy
    pub fn set_memory_limit(&mut self, bytes: Option<usize>) {
        self.memory_limit = bytes;
    }

    /// Sets the maximum number of bytes the distance matrix may occupy
    pub fn memory_limit(mut self, bytes: usize) -> Self {
        self.set_memory_limit(Some(bytes));
        self
    }

    /// Returns *true* if the distance matrix is currently held
    pub fn is_computed(&self) -> bool {
        self.matrix.is_some()
    }

    /// Computes the distance matrix unless it is already held.
    ///
    /// # Errors
    /// Fails with [`CoverError::ResourceExhaustion`] if the matrix would exceed the memory
    /// limit and with [`CoverError::InvalidNetwork`] if the graph is disconnected.
    pub fn ensure_computed<G>(&mut self, graph: &G) -> Result<&DistanceMatrix>
    where
        G: AdjacencyList,
    {
        let matrix = match self.matrix.take() {
            Some(matrix) => matrix,
            None => {
                let bytes = DistanceMatrix::required_bytes(graph.number_of_nodes());
                if let Some(limit) = self.memory_limit {
                    if bytes > limit {
                        return Err(CoverError::ResourceExhaustion(format!(
                            "distance matrix needs {bytes} bytes, limit is {limit} bytes"
                        )));
                    }
                }

                info!(
                    "Computing all-pairs distances of {} nodes ({bytes} bytes)",
                    graph.number_of_nodes()
                );
                let start = Instant::now();
                let matrix = DistanceMatrix::compute(graph)?;
                debug!(
                    "Distances computed in {:?}, diameter {}",
                    start.elapsed(),
                    matrix.diameter()
                );

                self.diameter = Some(matrix.diameter());
                matrix
            }
        };

        Ok(&*self.matrix.insert(matrix))
    }

    /// Releases the distance matrix. The allocation is freed immediately.
    pub fn drop(&mut self) {
        if self.matrix.take().is_some() {
            debug!("Dropped distance matrix");
        }
    }

    /// Returns the distance matrix if it is currently held
    pub fn get(&self) -> Option<&DistanceMatrix> {
        self.matrix.as_ref()
    }

    /// Returns the diameter of the graph.
    ///
    /// If the matrix is not held and the diameter is unknown, it is computed by a BFS from
    /// every node without materializing the matrix.
    pub fn diameter<G>(&mut self, graph: &G) -> Result<Distance>
    where
        G: AdjacencyList,
    {
        if let Some(diameter) = self.diameter {
            return Ok(diameter);
        }

        let mut diameter = 0;
        for u in graph.vertices() {
            let mut reached = 0;
            for (_, depth) in graph.bfs(u) {
                diameter = diameter.max(depth);
                reached += 1;
            }
            if reached != graph.len() {
                return Err(CoverError::InvalidNetwork("graph is disconnected".into()));
            }
        }

        let diameter = Distance::try_from(diameter).map_err(|_| {
            CoverError::ResourceExhaustion(format!("diameter {diameter} is too large"))
        })?;
        self.diameter = Some(diameter);
        Ok(diameter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gens::*;

    #[test]
    fn path_distances() {
        let graph = CsrGraph::path(6);
        let matrix = DistanceMatrix::compute(&graph).unwrap();

        assert_eq!(matrix.diameter(), 5);
        for u in 0..6 {
            for v in 0..6 {
                assert_eq!(matrix.distance(u, v), (u as i32 - v as i32).unsigned_abs() as Distance);
            }
        }
        assert_eq!(matrix.ball(2, 1).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(matrix.fits(2, &[0, 1, 3, 4], 2));
        assert!(!matrix.fits(2, &[0, 5], 2));
        assert_eq!(matrix.farness(0), 15);
    }

    #[test]
    fn disconnected() {
        let graph = CsrGraph::from_edges(4, [(0, 1), (2, 3)]);
        assert!(matches!(
            DistanceMatrix::compute(&graph),
            Err(CoverError::InvalidNetwork(_))
        ));
        assert!(matches!(
            DistanceOracle::new().diameter(&graph),
            Err(CoverError::InvalidNetwork(_))
        ));
    }

    #[test]
    fn oracle_lifecycle() {
        let graph = CsrGraph::grid(4, 5);
        let mut oracle = DistanceOracle::new();
        assert!(!oracle.is_computed());
        assert_eq!(oracle.diameter(&graph).unwrap(), 7);
        assert!(!oracle.is_computed());

        assert_eq!(oracle.ensure_computed(&graph).unwrap().distance(0, 19), 7);
        assert!(oracle.is_computed());

        oracle.drop();
        assert!(!oracle.is_computed());
        assert!(oracle.get().is_none());
        assert_eq!(oracle.diameter(&graph).unwrap(), 7);
    }

    #[test]
    fn memory_limit() {
        let graph = CsrGraph::cycle(100);
        let mut oracle = DistanceOracle::new().memory_limit(100 * 100);
        assert!(matches!(
            oracle.ensure_computed(&graph),
            Err(CoverError::ResourceExhaustion(_))
        ));
        assert!(!oracle.is_computed());

        oracle.set_memory_limit(Some(DistanceMatrix::required_bytes(100)));
        assert_eq!(oracle.ensure_computed(&graph).unwrap().diameter(), 50);
    }
}
