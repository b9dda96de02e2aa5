use log::debug;

use super::*;

/// Temperature below which the annealing stops early
const MIN_TEMPERATURE: f64 = 1e-12;

/// Simulated annealing over box coverings.
///
/// Starts from a random greedy colouring. In each of `k3` cycles, a neighbour covering is
/// derived by splitting up to `k2` random nodes off into singleton boxes and then trying `k1`
/// times to move a random node into the box of a random neighbour it fits into. A neighbour
/// with `delta` more boxes is accepted with probability `exp(-delta / temp)` (always if it is
/// not worse); `temp` is multiplied by `cc` after every cycle. Only valid coverings are ever
/// formed, and the best one seen is returned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sa {
    k1: u32,
    k2: u32,
    k3: u32,
    temp: f64,
    cc: f64,
}

impl Default for Sa {
    fn default() -> Self {
        Self {
            k1: 50,
            k2: 2,
            k3: 200,
            temp: 1.0,
            cc: 0.97,
        }
    }
}

impl Sa {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of move attempts per cycle
    pub fn k1(mut self, k1: u32) -> Self {
        self.k1 = k1;
        self
    }

    /// Sets the maximum number of new singleton boxes per cycle
    pub fn k2(mut self, k2: u32) -> Self {
        self.k2 = k2;
        self
    }

    /// Sets the number of cycles
    pub fn k3(mut self, k3: u32) -> Self {
        self.k3 = k3;
        self
    }

    /// Sets the initial temperature
    pub fn temp(mut self, temp: f64) -> Self {
        self.temp = temp;
        self
    }

    /// Sets the cooling rate
    pub fn cc(mut self, cc: f64) -> Self {
        self.cc = cc;
        self
    }

    fn check_parameters(&self) -> Result<()> {
        check_positive("temp", self.temp)?;
        check_positive("cc", self.cc)?;
        if self.cc >= 1.0 {
            return Err(CoverError::InvalidParameter {
                name: "cc",
                reason: format!("cooling rate {} must be below 1", self.cc),
            });
        }
        Ok(())
    }
}

impl BoxCovering for Sa {
    const NAME: &'static str = "sa";
    const FAMILY: Family = Family::Diameter;

    fn cover<R>(&self, network: &Network, size: u32, rng: &mut R) -> Result<Partition>
    where
        R: Rng,
    {
        check_box_size(size)?;
        self.check_parameters()?;
        let matrix = network.distances()?;
        let bound = diameter_bound(size);
        let n = network.number_of_nodes();

        let initial = Greedy::new().cover(network, size, rng)?;
        let mut current = BoxAssignment::from_boxes(n, initial.boxes());
        let mut best = current.clone();
        let mut temp = self.temp;

        for cycle in 0..self.k3 {
            let mut candidate = current.clone();

            for _ in 0..self.k2 {
                let u = rng.random_range(0..n);
                if candidate.members(candidate.box_of(u)).len() > 1 {
                    candidate.open_box(u);
                }
            }

            for _ in 0..self.k1 {
                let u = rng.random_range(0..n);
                let degree = network.degree_of(u);
                if degree == 0 {
                    continue;
                }

                let Some(v) = network.neighbors_of(u).nth(rng.random_range(0..degree) as usize)
                else {
                    continue;
                };
                let target = candidate.box_of(v);
                if target != candidate.box_of(u) && candidate.fits(matrix, u, target, bound) {
                    candidate.move_node(u, target);
                }
            }

            let delta = candidate.number_of_boxes() as f64 - current.number_of_boxes() as f64;
            if delta <= 0.0 || rng.random::<f64>() < (-delta / temp).exp() {
                current = candidate;
                if current.number_of_boxes() < best.number_of_boxes() {
                    best = current.clone();
                }
            }

            temp *= self.cc;
            if temp < MIN_TEMPERATURE {
                debug!("sa: temperature underflow after {} cycles", cycle + 1);
                break;
            }
        }

        debug!(
            "sa: lb={size} boxes {} -> {}",
            initial.number_of_boxes(),
            best.number_of_boxes()
        );
        Ok(best.to_partition())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::{gens::*, testing::test_covering};

    #[test]
    fn parameters() {
        let rng = &mut Pcg64Mcg::seed_from_u64(0);
        let mut network = Network::new("path", CsrGraph::path(4)).unwrap();
        network.ensure_distances().unwrap();

        for sa in [Sa::new().cc(1.0), Sa::new().cc(0.0), Sa::new().temp(-1.0)] {
            assert!(matches!(
                sa.cover(&network, 2, rng),
                Err(CoverError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn never_worse_than_start() {
        let mut network = Network::new("grid", CsrGraph::grid(6, 6)).unwrap();
        network.ensure_distances().unwrap();

        for lb in 2..5 {
            let greedy = Greedy::new()
                .cover(&network, lb, &mut Pcg64Mcg::seed_from_u64(11))
                .unwrap();
            let sa = Sa::new()
                .k3(50)
                .cover(&network, lb, &mut Pcg64Mcg::seed_from_u64(11))
                .unwrap();
            assert!(sa.number_of_boxes() <= greedy.number_of_boxes());
        }
    }

    #[test]
    fn early_stop() {
        let rng = &mut Pcg64Mcg::seed_from_u64(1);
        let mut network = Network::new("cycle", CsrGraph::cycle(10)).unwrap();
        network.ensure_distances().unwrap();

        let partition = Sa::new().k3(u32::MAX).cc(1e-3).cover(&network, 3, rng).unwrap();
        assert!(partition.validate(&network, Family::Diameter, 3, "sa").is_ok());
    }

    test_covering!(sa, Sa::new().k3(40));
}
