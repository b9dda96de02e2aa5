use itertools::Itertools;
use log::debug;

use super::*;

/// Box covering by fuzzy c-medoids clustering.
///
/// 1. A radius-`(lb - 1) / 2` covering with random centres seeds the medoids. Its boxes have
///    diameter at most `lb - 1`, so it is a valid covering on its own.
/// 2. For `iterations` rounds, every node gets a soft membership in every cluster,
///    `u(i, k) ~ d(i, medoid_k)^(-2 / (m - 1))`, and each medoid moves to the member of its
///    cluster minimising `sum_i u(i, k)^m * d(i, medoid)`.
/// 3. Nodes (most decided first) are hardened into the box of the most likely cluster they
///    fit into; a node fitting nowhere opens a new box.
///
/// The smaller of the seed covering and the hardened covering is returned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fuzzy {
    m: f64,
    iterations: u32,
}

impl Default for Fuzzy {
    fn default() -> Self {
        Self {
            m: 2.0,
            iterations: 10,
        }
    }
}

impl Fuzzy {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fuzzifier (greater than 1)
    pub fn m(mut self, m: f64) -> Self {
        self.m = m;
        self
    }

    /// Sets the number of clustering rounds
    pub fn iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }
}

impl BoxCovering for Fuzzy {
    const NAME: &'static str = "fuzzy";
    const FAMILY: Family = Family::Diameter;
    const DISTANCE_POLICY: DistancePolicy = DistancePolicy::Private;

    fn cover<R>(&self, network: &Network, size: u32, rng: &mut R) -> Result<Partition>
    where
        R: Rng,
    {
        check_box_size(size)?;
        if !(self.m > 1.0 && self.m.is_finite()) {
            return Err(CoverError::InvalidParameter {
                name: "m",
                reason: format!("fuzzifier {} must be greater than 1", self.m),
            });
        }
        let matrix = network.distances()?;
        let n = network.number_of_nodes();
        let bound = diameter_bound(size);

        let mut seed = Burning::new(matrix, size.saturating_sub(1) / 2);
        let mut seed_boxes = Vec::new();
        while seed.has_uncovered() {
            let Some(centre) = seed.random_candidate(rng, true) else {
                break;
            };
            seed_boxes.push(seed.burn(centre));
        }

        let mut medoids = seed.centres().to_vec();
        let mut memberships = soft_memberships(matrix, &medoids, self.m);
        for round in 0..self.iterations {
            let updated = update_medoids(matrix, &medoids, &memberships, self.m);
            if updated == medoids {
                debug!("fuzzy: medoids stable after {round} rounds");
                break;
            }
            medoids = updated;
            memberships = soft_memberships(matrix, &medoids, self.m);
        }

        let hardened = harden(matrix, &memberships, medoids.len(), bound);
        debug!(
            "fuzzy: lb={size} seed {} boxes, hardened {} boxes",
            seed_boxes.len(),
            hardened.len()
        );

        Ok(if hardened.len() <= seed_boxes.len() {
            hardened.into_partition(n)
        } else {
            seed_boxes.into_partition(n)
        })
    }
}

/// Soft memberships: `result[i][k]` is the membership of node `i` in the cluster of `medoids[k]`
fn soft_memberships(matrix: &DistanceMatrix, medoids: &[Node], m: f64) -> Vec<Vec<f64>> {
    let exponent = -2.0 / (m - 1.0);
    (0..matrix.number_of_nodes())
        .map(|i| {
            let row = matrix.row(i);
            if let Some(k) = medoids.iter().position(|&c| row[c as usize] == 0) {
                let mut crisp = vec![0.0; medoids.len()];
                crisp[k] = 1.0;
                return crisp;
            }

            let weights = medoids
                .iter()
                .map(|&c| (row[c as usize] as f64).powf(exponent))
                .collect_vec();
            let total: f64 = weights.iter().sum();
            weights.into_iter().map(|w| w / total).collect()
        })
        .collect()
}

/// Index of the largest entry (first on ties)
fn most_likely(memberships: &[f64]) -> usize {
    memberships
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(bi, bv), (i, &v)| {
            if v > bv { (i, v) } else { (bi, bv) }
        })
        .0
}

/// Moves every medoid to the node of its cluster minimising the weighted distance sum
fn update_medoids(
    matrix: &DistanceMatrix,
    medoids: &[Node],
    memberships: &[Vec<f64>],
    m: f64,
) -> Vec<Node> {
    let mut clusters = vec![Vec::new(); medoids.len()];
    for (i, u) in memberships.iter().enumerate() {
        clusters[most_likely(u)].push(i as Node);
    }

    medoids
        .iter()
        .zip(clusters)
        .enumerate()
        .map(|(k, (&medoid, members))| {
            let cost = |c: Node| -> f64 {
                let row = matrix.row(c);
                memberships
                    .iter()
                    .enumerate()
                    .map(|(i, u)| u[k].powf(m) * row[i] as f64)
                    .sum()
            };

            let mut best = (cost(medoid), medoid);
            for c in members {
                let candidate = (cost(c), c);
                if candidate.0 < best.0 {
                    best = candidate;
                }
            }
            best.1
        })
        .collect()
}

/// Hardens soft memberships into boxes of diameter at most `bound`.
///
/// Nodes are processed by decreasing maximal membership. Each node joins the most likely
/// non-empty cluster box it fits into, else the most likely empty cluster box, else the first
/// additional box it fits into, else a new box.
fn harden(
    matrix: &DistanceMatrix,
    memberships: &[Vec<f64>],
    clusters: usize,
    bound: Distance,
) -> Vec<Vec<Node>> {
    let certainty = |i: usize| memberships[i][most_likely(&memberships[i])];
    let order = (0..memberships.len())
        .sorted_by(|&a, &b| certainty(b).total_cmp(&certainty(a)).then(a.cmp(&b)))
        .collect_vec();

    let mut boxes: Vec<Vec<Node>> = vec![Vec::new(); clusters];
    for i in order {
        let u = i as Node;
        let preference = (0..clusters)
            .sorted_by(|&a, &b| memberships[i][b].total_cmp(&memberships[i][a]).then(a.cmp(&b)))
            .collect_vec();

        let target = preference
            .iter()
            .copied()
            .find(|&k| !boxes[k].is_empty() && matrix.fits(u, &boxes[k], bound))
            .or_else(|| preference.iter().copied().find(|&k| boxes[k].is_empty()))
            .or_else(|| (clusters..boxes.len()).find(|&k| matrix.fits(u, &boxes[k], bound)));

        match target {
            Some(k) => boxes[k].push(u),
            None => boxes.push(vec![u]),
        }
    }

    boxes.retain(|b| !b.is_empty());
    boxes
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::{gens::*, testing::test_covering};

    #[test]
    fn memberships_sum_to_one() {
        let matrix = DistanceMatrix::compute(&CsrGraph::grid(4, 4)).unwrap();
        let memberships = soft_memberships(&matrix, &[0, 15], 2.0);

        for u in &memberships {
            assert!((u.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
        assert_eq!(memberships[0], vec![1.0, 0.0]);
        assert!(memberships[1][0] > memberships[1][1]);
        // node 3 and node 12 are equidistant to both corners
        assert!((memberships[3][0] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn hardening_respects_bound() {
        let matrix = DistanceMatrix::compute(&CsrGraph::path(5)).unwrap();
        let memberships = vec![vec![1.0]; 5];
        let boxes = harden(&matrix, &memberships, 1, 1);
        assert_eq!(boxes.len(), 3);
        for b in &boxes {
            for &u in b {
                assert!(matrix.fits(u, b, 1));
            }
        }
    }

    #[test]
    fn invalid_fuzzifier() {
        let rng = &mut Pcg64Mcg::seed_from_u64(0);
        let mut network = Network::new("path", CsrGraph::path(4)).unwrap();
        network.ensure_distances().unwrap();
        assert!(matches!(
            Fuzzy::new().m(1.0).cover(&network, 2, rng),
            Err(CoverError::InvalidParameter { name: "m", .. })
        ));
    }

    test_covering!(fuzzy, Fuzzy::new());
}
