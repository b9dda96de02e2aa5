/*!
Breadth-first traversal and traversal-derived utilities.

This module provides:
- A lazy BFS iterator that yields every reached node together with its depth.
- Truncated searches (`max_depth`) used to compute balls of a given radius
  without touching the rest of the graph.
- A high-level `Traversal` trait that exposes these searches directly as
  methods on graph data structures.

Distances in unweighted graphs are exactly BFS depths, so all distance
computations of the crate are built on top of [`BFS`].
*/

use std::collections::VecDeque;

use super::*;

/// Depth of a node in a BFS tree; wide enough for arbitrarily long paths.
pub type Depth = u32;

/// Depth bound of an unrestricted search
pub const UNREACHED: Depth = Depth::MAX;

/// A BFS traversal iterator over the graph, visiting nodes in breadth-first
/// order from a given starting node and yielding `(node, depth)` pairs.
pub struct BFS<'a, G>
where
    G: AdjacencyList,
{
    graph: &'a G,
    visited: NodeBitSet,
    queue: VecDeque<(Node, Depth)>,
    max_depth: Depth,
}

impl<'a, G> BFS<'a, G>
where
    G: AdjacencyList,
{
    /// Creates a new traversal iterator starting from `start`.
    pub fn new(graph: &'a G, start: Node) -> Self {
        let mut visited = graph.vertex_bitset_unset();
        visited.insert(start as usize);
        Self {
            graph,
            visited,
            queue: VecDeque::from(vec![(start, 0)]),
            max_depth: UNREACHED,
        }
    }

    /// Nodes deeper than `depth` are neither yielded nor expanded.
    pub fn set_max_depth(&mut self, depth: Depth) {
        self.max_depth = depth;
    }

    /// Nodes deeper than `depth` are neither yielded nor expanded.
    pub fn max_depth(mut self, depth: Depth) -> Self {
        self.set_max_depth(depth);
        self
    }

    /// Returns *true* if the node was reached so far. With a depth limit, all nodes within
    /// the limit are marked once the search is exhausted.
    pub fn did_visit_node(&self, u: Node) -> bool {
        self.visited.contains(u as usize)
    }

    /// Tries to restart the search at an yet unvisited node and returns
    /// true iff successful. Requires that search came to a hold earlier,
    /// i.e. self.next() returned None
    pub fn try_restart_at_unvisited(&mut self) -> bool {
        assert!(self.queue.is_empty());
        match self.visited.zeroes().next() {
            None => false,
            Some(x) => {
                self.visited.insert(x);
                self.queue.push_back((x as Node, 0));
                true
            }
        }
    }
}

impl<G> Iterator for BFS<'_, G>
where
    G: AdjacencyList,
{
    type Item = (Node, Depth);

    fn next(&mut self) -> Option<Self::Item> {
        let (u, depth) = self.queue.pop_front()?;

        if depth < self.max_depth {
            for v in self.graph.neighbors_of(u) {
                if !self.visited.put(v as usize) {
                    self.queue.push_back((v, depth + 1));
                }
            }
        }

        Some((u, depth))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (
            self.queue.len(),
            Some(self.graph.len() - self.visited.count_ones(..) + self.queue.len()),
        )
    }
}

/// Provides convenient traversal methods directly on graphs
pub trait Traversal: AdjacencyList + Sized {
    /// Returns an iterator that traverses nodes reachable from `start`
    /// in **breadth-first search (BFS) order** together with their depth.
    ///
    /// # Examples
    /// ```
    /// use ucover::{prelude::*, algo::*};
    ///
    /// let g = CsrGraph::from_edges(3, [(0, 1), (1, 2)]);
    ///
    /// let order: Vec<_> = g.bfs(0).collect();
    /// assert_eq!(order, vec![(0, 0), (1, 1), (2, 2)]);
    /// ```
    fn bfs(&self, start: Node) -> BFS<'_, Self> {
        BFS::new(self, start)
    }

    /// Returns all nodes within distance `radius` of `center` (including `center`) in BFS order.
    ///
    /// # Examples
    /// ```
    /// use ucover::{prelude::*, algo::*};
    ///
    /// let g = CsrGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
    /// assert_eq!(g.ball(1, 1), vec![1, 0, 2]);
    /// ```
    fn ball(&self, center: Node, radius: Depth) -> Vec<Node> {
        self.bfs(center).max_depth(radius).map(|(u, _)| u).collect()
    }

    /// Returns the ball of `radius` around `center` as a bitset
    fn ball_as_bitset(&self, center: Node, radius: Depth) -> NodeBitSet {
        node_bitset_with(
            self.number_of_nodes(),
            self.bfs(center).max_depth(radius).map(|(u, _)| u),
        )
    }
}

impl<G> Traversal for G where G: AdjacencyList + Sized {}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;
    use crate::gens::*;

    #[test]
    fn bfs_depths_on_path() {
        let graph = CsrGraph::path(6);
        let mut depths = vec![0; 6];
        for (u, d) in graph.bfs(2) {
            depths[u as usize] = d;
        }
        assert_eq!(depths, vec![2, 1, 0, 1, 2, 3]);
        assert_eq!(graph.bfs(0).map(|(_, d)| d).max(), Some(5));
    }

    #[test]
    fn bfs_truncated() {
        let graph = CsrGraph::grid(5, 5);
        let ball = graph.ball(12, 1).into_iter().sorted().collect_vec();
        assert_eq!(ball, vec![7, 11, 12, 13, 17]);

        let ball = graph.ball_as_bitset(0, 2);
        assert_eq!(ball.ones().collect_vec(), vec![0, 1, 2, 5, 6, 10]);

        assert_eq!(graph.ball(3, 0), vec![3]);
    }

    #[test]
    fn bfs_restart() {
        let graph = CsrGraph::from_edges(5, [(0, 1), (3, 4)]);
        let mut bfs = graph.bfs(0);
        assert_eq!(bfs.by_ref().count(), 2);
        assert!(bfs.try_restart_at_unvisited());
        assert_eq!(bfs.by_ref().map(|(u, _)| u).collect_vec(), vec![2]);
        assert!(bfs.try_restart_at_unvisited());
        assert_eq!(bfs.by_ref().count(), 2);
        assert!(!bfs.try_restart_at_unvisited());
    }

    #[test]
    fn bfs_visited_within_depth() {
        let graph = CsrGraph::cycle(8);
        let mut bfs = graph.bfs(0).max_depth(2);
        assert_eq!(bfs.by_ref().count(), 5);
        assert!([0, 1, 2, 6, 7].iter().all(|&u| bfs.did_visit_node(u)));
        assert!([3, 4, 5].iter().all(|&u| !bfs.did_visit_node(u)));
    }
}
