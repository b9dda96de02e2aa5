use rand::seq::SliceRandom;

use super::*;

/// Random sequential covering.
///
/// Repeatedly picks a uniformly random uncovered node as centre and turns the uncovered part
/// of its ball of radius `rb` into a new box. Uses BFS only, so it also works on disconnected
/// graphs (see [`random_sequential_covering`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RandomSequential;

impl RandomSequential {
    /// Shorthand for default
    pub fn new() -> Self {
        Self
    }
}

impl BoxCovering for RandomSequential {
    const NAME: &'static str = "random_sequential";
    const FAMILY: Family = Family::Radius;
    const DISTANCE_POLICY: DistancePolicy = DistancePolicy::Dropped;

    fn cover<R>(&self, network: &Network, size: u32, rng: &mut R) -> Result<Partition>
    where
        R: Rng,
    {
        check_box_size(size)?;
        Ok(random_sequential_covering(network.graph(), size, rng))
    }
}

/// Random sequential covering of an arbitrary, possibly disconnected graph with balls of
/// radius `radius`. Every box has its centre as designated centre.
///
/// # Example
/// ```
/// use rand::SeedableRng;
/// use rand_pcg::Pcg64Mcg;
/// use ucover::{covering::*, prelude::*};
///
/// let rng = &mut Pcg64Mcg::seed_from_u64(0);
/// let graph = CsrGraph::from_edges(5, [(0, 1), (1, 2), (3, 4)]);
///
/// let partition = random_sequential_covering(&graph, 1, rng);
/// assert!(partition.is_complete());
/// assert!(partition.number_of_boxes() >= 2);
/// ```
pub fn random_sequential_covering<G, R>(graph: &G, radius: u32, rng: &mut R) -> Partition
where
    G: AdjacencyList,
    R: Rng,
{
    let mut order: Vec<Node> = graph.vertices().collect();
    order.shuffle(rng);

    let mut covered = graph.vertex_bitset_unset();
    let mut partition = Partition::new(graph.number_of_nodes());

    for centre in order {
        if covered.contains(centre as usize) {
            continue;
        }

        let members: Vec<Node> = graph
            .bfs(centre)
            .max_depth(radius)
            .map(|(v, _)| v)
            .filter(|&v| !covered.put(v as usize))
            .collect();
        partition.add_box_with_centre(centre, members);
    }

    partition
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::{gens::*, testing::test_covering};

    #[test]
    fn four_cycle() {
        let graph = CsrGraph::cycle(4);
        for seed in 0..20 {
            let rng = &mut Pcg64Mcg::seed_from_u64(seed);
            let partition = random_sequential_covering(&graph, 1, rng);
            assert_eq!(partition.number_of_boxes(), 2);

            let centres = partition.centres().unwrap();
            assert_eq!(centres.len(), 2);
        }
    }

    #[test]
    fn disconnected() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);
        let graph = CsrGraph::from_edges(7, [(0, 1), (1, 2), (3, 4), (5, 6)]);

        let partition = random_sequential_covering(&graph, 5, rng);
        assert_eq!(partition.number_of_boxes(), 3);
        assert_eq!(
            partition.boxes().into_iter().sorted().collect_vec(),
            vec![vec![0, 1, 2], vec![3, 4], vec![5, 6]]
        );
    }

    test_covering!(random_sequential, RandomSequential::new());
}
