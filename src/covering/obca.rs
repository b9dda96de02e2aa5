use rand::seq::SliceRandom;

use super::*;

/// Optimal-boundary covering.
///
/// Local search on top of a [`Greedy`] covering. Each round
/// 1. shifts boundary nodes into an adjacent box that is at least as large as their own box
///    (if they fit), which concentrates nodes in few boxes, and
/// 2. dissolves boxes whose members can all be re-homed into other boxes.
///
/// Shifting strictly increases the sum of squared box sizes and dissolving strictly decreases
/// the number of boxes, so the search terminates; `max_rounds` bounds it additionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Obca {
    initial: Greedy,
    max_rounds: u32,
}

impl Default for Obca {
    fn default() -> Self {
        Self {
            initial: Greedy::default(),
            max_rounds: 100,
        }
    }
}

impl Obca {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the greedy colouring used as initial covering
    pub fn initial(mut self, initial: Greedy) -> Self {
        self.initial = initial;
        self
    }

    /// Sets the maximum number of improvement rounds
    pub fn max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }
}

impl BoxCovering for Obca {
    const NAME: &'static str = "obca";
    const FAMILY: Family = Family::Diameter;

    fn cover<R>(&self, network: &Network, size: u32, rng: &mut R) -> Result<Partition>
    where
        R: Rng,
    {
        check_box_size(size)?;
        let matrix = network.distances()?;
        let bound = diameter_bound(size);

        let initial = self.initial.cover(network, size, rng)?;
        let mut boxes = BoxAssignment::from_boxes(network.number_of_nodes(), initial.boxes());

        for _ in 0..self.max_rounds {
            let shifted = shift_boundary(network, matrix, &mut boxes, bound, rng);
            let dissolved = dissolve_boxes(matrix, &mut boxes, bound);
            if !shifted && !dissolved {
                break;
            }
        }

        Ok(boxes.to_partition())
    }
}

/// Moves boundary nodes into adjacent boxes that are at least as large as their own box.
/// Returns *true* if any node moved.
fn shift_boundary<R>(
    network: &Network,
    matrix: &DistanceMatrix,
    boxes: &mut BoxAssignment,
    bound: Distance,
    rng: &mut R,
) -> bool
where
    R: Rng,
{
    let mut order: Vec<Node> = network.vertices().collect();
    order.shuffle(rng);

    let mut shifted = false;
    for u in order {
        let source = boxes.box_of(u);
        let target = network
            .neighbors_of(u)
            .map(|v| boxes.box_of(v))
            .filter(|&c| {
                c != source
                    && boxes.members(c).len() >= boxes.members(source).len()
                    && boxes.fits(matrix, u, c, bound)
            })
            .max_by_key(|&c| (boxes.members(c).len(), std::cmp::Reverse(c)));

        if let Some(target) = target {
            boxes.move_node(u, target);
            shifted = true;
        }
    }

    shifted
}

/// Dissolves boxes (smallest first) whose members all fit into other boxes.
/// Returns *true* if any box was dissolved.
fn dissolve_boxes(matrix: &DistanceMatrix, boxes: &mut BoxAssignment, bound: Distance) -> bool {
    let mut order: Vec<BoxId> = boxes.non_empty_boxes().collect();
    order.sort_by_key(|&b| (boxes.members(b).len(), b));

    let mut dissolved = false;
    for b in order {
        let members = boxes.members(b).to_vec();
        if members.is_empty() || boxes.number_of_boxes() == 1 {
            continue;
        }

        // tentative moves, checked against the members already moved as well
        let mut moves: Vec<(Node, BoxId)> = Vec::with_capacity(members.len());
        for &u in &members {
            let target = boxes.non_empty_boxes().find(|&c| {
                c != b
                    && boxes.fits(matrix, u, c, bound)
                    && moves
                        .iter()
                        .all(|&(v, t)| t != c || matrix.distance(u, v) <= bound)
            });
            match target {
                Some(c) => moves.push((u, c)),
                None => break,
            }
        }

        if moves.len() == members.len() {
            for (u, c) in moves {
                boxes.move_node(u, c);
            }
            dissolved = true;
        }
    }

    dissolved
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::{gens::*, testing::test_covering};

    #[test]
    fn dissolves_redundant_box() {
        let matrix = DistanceMatrix::compute(&CsrGraph::path(6)).unwrap();
        let mut boxes = BoxAssignment::from_boxes(6, vec![vec![0, 1], vec![2], vec![3, 4, 5]]);

        assert!(dissolve_boxes(&matrix, &mut boxes, 2));
        assert_eq!(boxes.number_of_boxes(), 2);
        assert_eq!(boxes.box_of(2), 0);
    }

    #[test]
    fn never_worse_than_greedy() {
        let mut network = Network::new("flower", CsrGraph::flower(2, 2, 3)).unwrap();
        network.ensure_distances().unwrap();

        for lb in 2..6 {
            let greedy = Greedy::new()
                .cover(&network, lb, &mut Pcg64Mcg::seed_from_u64(lb as u64))
                .unwrap();
            let obca = Obca::new()
                .cover(&network, lb, &mut Pcg64Mcg::seed_from_u64(lb as u64))
                .unwrap();
            assert!(obca.number_of_boxes() <= greedy.number_of_boxes());
        }
    }

    test_covering!(obca, Obca::new());
}
