use super::*;

/// Shared state of the centre-based burning algorithms ([`Memb`], [`Remcc`], [`Mcwr`]).
///
/// For every node we keep its *excluded mass*: the number of uncovered nodes within
/// distance `radius`. Covering a node decrements the mass of all nodes in its ball, so the
/// masses are maintained in `O(n)` per covered node.
pub(crate) struct Burning<'a> {
    matrix: &'a DistanceMatrix,
    radius: Distance,
    covered: NodeBitSet,
    is_centre: NodeBitSet,
    mass: Vec<NumNodes>,
    uncovered: NumNodes,
    centres: Vec<Node>,
}

impl<'a> Burning<'a> {
    pub fn new(matrix: &'a DistanceMatrix, radius: u32) -> Self {
        let n = matrix.number_of_nodes();
        let radius = clamp_distance(radius);
        let mass = (0..n)
            .map(|u| matrix.ball(u, radius).count() as NumNodes)
            .collect();

        Self {
            matrix,
            radius,
            covered: node_bitset(n),
            is_centre: node_bitset(n),
            mass,
            uncovered: n,
            centres: Vec::new(),
        }
    }

    /// Returns *true* while some node is uncovered
    pub fn has_uncovered(&self) -> bool {
        self.uncovered > 0
    }

    /// Returns the excluded mass of `u`
    pub fn mass(&self, u: Node) -> NumNodes {
        self.mass[u as usize]
    }

    pub fn is_covered(&self, u: Node) -> bool {
        self.covered.contains(u as usize)
    }

    /// Turns `centre` into a centre and covers its ball. Returns the newly covered nodes.
    pub fn burn(&mut self, centre: Node) -> Vec<Node> {
        self.is_centre.insert(centre as usize);
        self.centres.push(centre);

        let newly: Vec<Node> = self
            .matrix
            .ball(centre, self.radius)
            .filter(|&v| !self.covered.put(v as usize))
            .collect();

        for &v in &newly {
            for w in self.matrix.ball(v, self.radius) {
                self.mass[w as usize] -= 1;
            }
        }
        self.uncovered -= newly.len() as NumNodes;

        newly
    }

    /// Returns the candidate maximising `score(u, mass(u))`; ties are broken uniformly at random.
    ///
    /// Candidates are non-centres with positive mass, or only uncovered nodes if
    /// `uncovered_only` is set. Returns `None` if there is no candidate.
    pub fn best_candidate<R, F>(&self, rng: &mut R, uncovered_only: bool, score: F) -> Option<Node>
    where
        R: Rng,
        F: Fn(Node, NumNodes) -> f64,
    {
        let mut best = None;
        let mut best_score = f64::NEG_INFINITY;
        let mut ties = 0u32;

        for u in self.candidates(uncovered_only) {
            let s = score(u, self.mass(u));
            if s > best_score {
                best_score = s;
                best = Some(u);
                ties = 1;
            } else if s == best_score {
                ties += 1;
                if rng.random_range(0..ties) == 0 {
                    best = Some(u);
                }
            }
        }

        best
    }

    /// Returns a uniformly random candidate (see [`Burning::best_candidate`])
    pub fn random_candidate<R>(&self, rng: &mut R, uncovered_only: bool) -> Option<Node>
    where
        R: Rng,
    {
        let mut chosen = None;
        for (seen, u) in self.candidates(uncovered_only).enumerate() {
            if rng.random_range(0..=seen) == 0 {
                chosen = Some(u);
            }
        }
        chosen
    }

    fn candidates(&self, uncovered_only: bool) -> impl Iterator<Item = Node> + '_ {
        (0..self.matrix.number_of_nodes()).filter(move |&u| {
            if uncovered_only {
                !self.is_covered(u)
            } else {
                !self.is_centre.contains(u as usize) && self.mass(u) > 0
            }
        })
    }

    /// Assigns every node to its nearest centre (lowest centre index on ties)
    pub fn into_nearest_centre_partition(self) -> Partition {
        let n = self.matrix.number_of_nodes();
        let mut boxes = vec![Vec::new(); self.centres.len()];
        for v in 0..n {
            let nearest = self
                .centres
                .iter()
                .enumerate()
                .min_by_key(|&(i, &c)| (self.matrix.distance(c, v), i))
                .map(|(i, _)| i);
            if let Some(i) = nearest {
                boxes[i].push(v);
            }
        }

        let mut partition = Partition::new(n);
        for (&centre, members) in self.centres.iter().zip(boxes) {
            partition.add_box_with_centre(centre, members);
        }
        partition.compact();
        partition
    }

    /// Returns the chosen centres in order
    pub fn centres(&self) -> &[Node] {
        &self.centres
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::gens::*;

    #[test]
    fn masses_shrink() {
        let matrix = DistanceMatrix::compute(&CsrGraph::path(5)).unwrap();
        let mut burning = Burning::new(&matrix, 1);
        assert_eq!((0..5).map(|u| burning.mass(u)).collect::<Vec<_>>(), vec![2, 3, 3, 3, 2]);

        assert_eq!(burning.burn(1), vec![0, 1, 2]);
        assert_eq!((0..5).map(|u| burning.mass(u)).collect::<Vec<_>>(), vec![0, 0, 1, 2, 2]);
        assert!(burning.has_uncovered());

        let rng = &mut Pcg64Mcg::seed_from_u64(0);
        let best = burning.best_candidate(rng, false, |_, m| m as f64).unwrap();
        assert!(best == 3 || best == 4);

        burning.burn(best);
        assert!(!burning.has_uncovered());
        let partition = burning.into_nearest_centre_partition();
        assert!(partition.is_complete());
        assert_eq!(partition.number_of_boxes(), 2);
    }
}
