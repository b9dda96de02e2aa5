use rand::seq::SliceRandom;

use super::*;

/// Order in which nodes (or seeds) are processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeOrder {
    /// Uniformly random order
    #[default]
    Random,
    /// Decreasing degree, ties by node id
    LargestFirst,
    /// Increasing node id
    Natural,
}

impl NodeOrder {
    /// Returns all nodes of `graph` in this order
    pub fn nodes<G, R>(self, graph: &G, rng: &mut R) -> Vec<Node>
    where
        G: AdjacencyList,
        R: Rng,
    {
        let mut nodes: Vec<Node> = graph.vertices().collect();
        match self {
            NodeOrder::Random => nodes.shuffle(rng),
            NodeOrder::LargestFirst => {
                nodes.sort_by_key(|&u| (std::cmp::Reverse(graph.degree_of(u)), u))
            }
            NodeOrder::Natural => {}
        }
        nodes
    }
}

/// Greedy colouring of the nodes into boxes.
///
/// Nodes are processed in the configured [`NodeOrder`]; every node joins the lowest-indexed
/// box whose members are all within distance `lb - 1`, or opens a new box otherwise.
///
/// # Example
/// ```
/// use rand::SeedableRng;
/// use rand_pcg::Pcg64Mcg;
/// use ucover::{covering::*, gens::*, prelude::*};
///
/// let rng = &mut Pcg64Mcg::seed_from_u64(0);
/// let mut network = Network::new("path", CsrGraph::path(6)).unwrap();
/// network.ensure_distances().unwrap();
///
/// let greedy = Greedy::new().order(NodeOrder::Natural);
/// assert_eq!(greedy.cover(&network, 3, rng).unwrap().boxes(), vec![vec![0, 1, 2], vec![3, 4, 5]]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Greedy {
    order: NodeOrder,
}

impl Greedy {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the order in which nodes are coloured
    pub fn order(mut self, order: NodeOrder) -> Self {
        self.order = order;
        self
    }
}

impl BoxCovering for Greedy {
    const NAME: &'static str = "greedy";
    const FAMILY: Family = Family::Diameter;

    fn cover<R>(&self, network: &Network, size: u32, rng: &mut R) -> Result<Partition>
    where
        R: Rng,
    {
        check_box_size(size)?;
        let matrix = network.distances()?;
        let order = self.order.nodes(network, rng);
        let boxes = greedy_colouring(matrix, order, diameter_bound(size));
        Ok(boxes.into_partition(network.number_of_nodes()))
    }
}

/// Colours the nodes in the given order: each node joins the first box it fits into.
/// Returns the member lists of the boxes in order of creation.
pub(crate) fn greedy_colouring<I>(matrix: &DistanceMatrix, order: I, bound: Distance) -> Vec<Vec<Node>>
where
    I: IntoIterator<Item = Node>,
{
    let mut boxes: Vec<Vec<Node>> = Vec::new();
    for u in order {
        match boxes.iter_mut().find(|b| matrix.fits(u, b, bound)) {
            Some(b) => b.push(u),
            None => boxes.push(vec![u]),
        }
    }
    boxes
}

/// Orders nodes by increasing random key (ties by node id), the decoding used by the
/// random-key metaheuristics
pub(crate) fn order_by_keys(keys: &[f64]) -> Vec<Node> {
    let mut order: Vec<Node> = (0..keys.len() as Node).collect();
    order.sort_by(|&a, &b| keys[a as usize].total_cmp(&keys[b as usize]).then(a.cmp(&b)));
    order
}

/// Decodes random keys into boxes via [`greedy_colouring`]
pub(crate) fn decode_keys(matrix: &DistanceMatrix, keys: &[f64], bound: Distance) -> Vec<Vec<Node>> {
    greedy_colouring(matrix, order_by_keys(keys), bound)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::{gens::*, testing::test_covering};

    #[test]
    fn orders() {
        let graph = CsrGraph::star(4);
        let rng = &mut Pcg64Mcg::seed_from_u64(7);
        assert_eq!(NodeOrder::Natural.nodes(&graph, rng), vec![0, 1, 2, 3]);
        assert_eq!(NodeOrder::LargestFirst.nodes(&graph, rng)[0], 0);

        let mut random = NodeOrder::Random.nodes(&graph, rng);
        random.sort_unstable();
        assert_eq!(random, vec![0, 1, 2, 3]);
    }

    #[test]
    fn colouring_follows_order() {
        let matrix = DistanceMatrix::compute(&CsrGraph::path(6)).unwrap();
        assert_eq!(
            greedy_colouring(&matrix, [1, 3, 0, 5, 2, 4], 2),
            vec![vec![1, 3, 2], vec![0], vec![5, 4]]
        );
        assert_eq!(order_by_keys(&[0.5, -1.0, 0.5, 0.1]), vec![1, 3, 0, 2]);
    }

    test_covering!(greedy_random, Greedy::new());
    test_covering!(greedy_largest_first, Greedy::new().order(NodeOrder::LargestFirst));
}
