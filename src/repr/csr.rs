/*!
# Compressed Sparse Row (CSR) Graph Representation

CSR graphs store all adjacency lists in a single flattened array, with offset indices
marking the start of each vertex's neighbor list. This structure provides:

- **Compact storage** compared to adjacency arrays (`Vec<Vec<Node>>`).
- **Fast sequential access** to neighbors due to good cache locality, which matters for the
  `n` breadth-first searches needed to fill the distance matrix.
- **Higher construction cost**, but immutable and optimized for traversal.

Each undirected edge is stored twice (once per endpoint); neighbor lists are sorted.
*/

use itertools::Itertools;

use super::*;

/// Undirected **CSR graph** representation without self-loops or multi-edges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsrGraph {
    offsets: Vec<NumEdges>,
    nbs: Vec<Node>,
}

impl CsrGraph {
    /// Returns the sorted neighborhood of `u` as a slice
    /// ** Panics if `u >= n` **
    pub fn as_neighbors_slice(&self, u: Node) -> &[Node] {
        let u = u as usize;
        &self.nbs[self.offsets[u] as usize..self.offsets[u + 1] as usize]
    }
}

impl GraphNodeOrder for CsrGraph {
    fn number_of_nodes(&self) -> NumNodes {
        (self.offsets.len() - 1) as NumNodes
    }
}

impl GraphEdgeOrder for CsrGraph {
    fn number_of_edges(&self) -> NumEdges {
        (self.nbs.len() / 2) as NumEdges
    }
}

impl AdjacencyList for CsrGraph {
    fn neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.as_neighbors_slice(u).iter().copied()
    }

    fn degree_of(&self, u: Node) -> NumNodes {
        let u = u as usize;
        self.offsets[u + 1] - self.offsets[u]
    }
}

impl GraphFromScratch for CsrGraph {
    fn from_edges<I, E>(n: NumNodes, edges: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Edge>,
    {
        let mut edges = edges
            .into_iter()
            .map(|e| e.into().normalized())
            .filter(|e| !e.is_loop())
            .collect_vec();
        edges.sort_unstable();
        edges.dedup();

        // count degrees and compute prefix sums
        let mut offsets: Vec<NumEdges> = vec![0; n as usize + 1];
        for &Edge(u, v) in &edges {
            assert!(u < n && v < n, "Edge {u}-{v} out of range for {n} nodes");
            offsets[u as usize + 1] += 1;
            offsets[v as usize + 1] += 1;
        }
        for i in 1..offsets.len() {
            offsets[i] += offsets[i - 1];
        }

        let mut nbs = vec![INVALID_NODE; offsets[n as usize] as usize];
        let mut write_pos = offsets.clone();
        for &Edge(u, v) in &edges {
            nbs[write_pos[u as usize] as usize] = v;
            write_pos[u as usize] += 1;
            nbs[write_pos[v as usize] as usize] = u;
            write_pos[v as usize] += 1;
        }

        let mut graph = Self { offsets, nbs };
        for u in 0..n as usize {
            let (beg, end) = (graph.offsets[u] as usize, graph.offsets[u + 1] as usize);
            graph.nbs[beg..end].sort_unstable();
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    use super::*;

    #[test]
    fn from_edges_normalizes() {
        let graph = CsrGraph::from_edges(4, [(0, 1), (1, 0), (2, 2), (3, 1), (1, 2)]);

        assert_eq!(graph.number_of_nodes(), 4);
        assert_eq!(graph.number_of_edges(), 3);
        assert_eq!(graph.as_neighbors_slice(1), &[0, 2, 3]);
        assert_eq!(graph.degree_of(2), 1);
        assert_eq!(graph.as_neighbors_slice(3), &[1]);
        assert!(graph.as_neighbors_slice(2).binary_search(&2).is_err());
        assert_eq!(
            graph.ordered_edges(),
            vec![Edge(0, 1), Edge(1, 2), Edge(1, 3)]
        );
    }

    #[test]
    fn random_adjacency() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        for n in [10 as NumNodes, 20, 50] {
            for m_ub in [n * 2, n * 5] {
                let mut adj_matrix = vec![vec![false; n as usize]; n as usize];
                let edges = (0..m_ub)
                    .map(|_| (rng.random_range(0..n), rng.random_range(0..n)))
                    .collect_vec();
                for &(u, v) in &edges {
                    if u != v {
                        adj_matrix[u as usize][v as usize] = true;
                        adj_matrix[v as usize][u as usize] = true;
                    }
                }

                let graph = CsrGraph::from_edges(n, edges);
                for u in graph.vertices() {
                    let expected = (0..n).filter(|&v| adj_matrix[u as usize][v as usize]);
                    assert!(graph.neighbors_of(u).eq(expected));
                }
                assert_eq!(
                    graph.number_of_edges() as usize,
                    adj_matrix.iter().flatten().filter(|&&x| x).count() / 2
                );
            }
        }
    }
}
