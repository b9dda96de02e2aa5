use std::iter::FusedIterator;

use itertools::Itertools;

use super::*;

/// Connected components of undirected graphs
pub trait Connectivity: AdjacencyList + Traversal + Sized {
    /// Returns an iterator over the connected components of the graph
    fn connected_components(&self) -> ConnectedComponents<'_, Self> {
        ConnectedComponents::new(self)
    }

    /// Returns *true* if the graph has at least one node and all nodes are in one component
    fn is_connected(&self) -> bool {
        !self.is_empty() && self.bfs(0).count() == self.len()
    }

    /// Returns the nodes of the largest connected component (sorted increasingly).
    /// Ties are broken in favour of the component containing the smallest node.
    fn largest_connected_component(&self) -> Vec<Node> {
        let mut largest = self
            .connected_components()
            .fold(Vec::new(), |best, comp| {
                if comp.len() > best.len() { comp } else { best }
            });
        largest.sort_unstable();
        largest
    }
}

impl<G> Connectivity for G where G: AdjacencyList + Sized {}

/// Iterator over the connected components of a graph, each given as a list of nodes in BFS order
pub struct ConnectedComponents<'a, G>
where
    G: AdjacencyList,
{
    bfs: Option<BFS<'a, G>>,
}

impl<'a, G> ConnectedComponents<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self {
            bfs: (!graph.is_empty()).then(|| graph.bfs(0)),
        }
    }
}

impl<G> Iterator for ConnectedComponents<'_, G>
where
    G: AdjacencyList,
{
    type Item = Vec<Node>;

    fn next(&mut self) -> Option<Self::Item> {
        let bfs = self.bfs.as_mut()?;
        let cc = bfs.by_ref().map(|(u, _)| u).collect_vec();
        if cc.is_empty() {
            return None;
        }

        if !bfs.try_restart_at_unvisited() {
            self.bfs = None;
        }

        Some(cc)
    }
}

impl<G> FusedIterator for ConnectedComponents<'_, G> where G: AdjacencyList {}

#[cfg(test)]
mod test {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::gens::*;

    #[test]
    fn connected_components() {
        let graph = CsrGraph::from_edges(7, [(1, 2), (2, 3), (4, 5)]);

        let ccs = graph
            .connected_components()
            .map(|cc| cc.into_iter().sorted().collect_vec())
            .sorted()
            .collect_vec();
        assert_eq!(ccs, vec![vec![0], vec![1, 2, 3], vec![4, 5], vec![6]]);
        assert!(!graph.is_connected());
        assert_eq!(graph.largest_connected_component(), vec![1, 2, 3]);
    }

    #[test]
    fn connected_trees() {
        let rng = &mut Pcg64Mcg::seed_from_u64(1234);
        for n in [1, 2, 10, 500] {
            let graph = CsrGraph::random_tree(rng, n);
            assert!(graph.is_connected());
            assert_eq!(graph.connected_components().count(), 1);
            assert_eq!(graph.largest_connected_component().len(), n as usize);
        }
    }

    #[test]
    fn long_cycle() {
        let graph = CsrGraph::cycle(10_000);
        let ccs = graph.connected_components().collect_vec();
        assert_eq!(ccs.len(), 1);
        assert_eq!(ccs[0].len(), 10_000);
    }
}
