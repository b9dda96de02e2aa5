/*!
# Subgraph Algorithms

Extracting vertex-induced subgraphs, most importantly the largest connected component of a
network that was read from a disconnected source.
*/

use super::*;

/// A trait for creating vertex-induced subgraphs from a graph.
pub trait Subgraph: Sized {
    /// Creates a **vertex-induced subgraph** restricted to the nodes in `vertices`.
    ///
    /// Node `vertices[i]` becomes node `i` in the new graph. The result contains the new
    /// graph and the mapping `new id -> old id` (which is just `vertices`).
    ///
    /// # Panics
    /// Panics if `vertices` contains a node twice or a node `>= n`.
    fn vertex_induced_as<GO>(&self, vertices: &[Node]) -> (GO, Vec<Node>)
    where
        GO: GraphFromScratch;
}

impl<G> Subgraph for G
where
    G: AdjacencyList,
{
    fn vertex_induced_as<GO>(&self, vertices: &[Node]) -> (GO, Vec<Node>)
    where
        GO: GraphFromScratch,
    {
        let mut new_id = vec![INVALID_NODE; self.len()];
        for (new, &old) in vertices.iter().enumerate() {
            assert_eq!(new_id[old as usize], INVALID_NODE);
            new_id[old as usize] = new as Node;
        }

        // Prevent moving the mapping into the closure
        let new_id = &new_id;
        let graph = GO::from_edges(
            vertices.len() as NumNodes,
            vertices.iter().flat_map(|&u| {
                self.neighbors_of(u).filter_map(move |v| {
                    let e = Edge(new_id[u as usize], new_id[v as usize]);
                    (e.1 != INVALID_NODE && e.is_normalized()).then_some(e)
                })
            }),
        );

        (graph, vertices.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn induced() {
        let graph = CsrGraph::from_edges(6, [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)]);
        let (sub, mapping) = graph.vertex_induced_as::<CsrGraph>(&[1, 2, 3, 5]);

        assert_eq!(sub.number_of_nodes(), 4);
        assert_eq!(sub.ordered_edges(), vec![Edge(0, 1), Edge(1, 2)]);
        assert_eq!(mapping, vec![1, 2, 3, 5]);
    }
}
