use super::*;

/// Maximum-excluded-mass burning combined with random centre choice.
///
/// Centres are always uncovered nodes. With probability `p` the next centre is the uncovered
/// node with the most uncovered nodes within distance `rb` (as in [`Memb`]); otherwise it is a
/// uniformly random uncovered node (as in [`RandomSequential`]). The uncovered part of the
/// centre's ball becomes the new box.
///
/// `p = 1` always burns by excluded mass, `p = 0` is random sequential covering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mcwr {
    p: f64,
}

impl Default for Mcwr {
    fn default() -> Self {
        Self { p: 0.5 }
    }
}

impl Mcwr {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the probability of a maximum-excluded-mass centre
    pub fn p(mut self, p: f64) -> Self {
        self.p = p;
        self
    }
}

impl BoxCovering for Mcwr {
    const NAME: &'static str = "mcwr";
    const FAMILY: Family = Family::Radius;

    fn cover<R>(&self, network: &Network, size: u32, rng: &mut R) -> Result<Partition>
    where
        R: Rng,
    {
        check_box_size(size)?;
        check_probability("p", self.p)?;
        let matrix = network.distances()?;

        let mut partition = Partition::new(network.number_of_nodes());
        let mut burning = Burning::new(matrix, size);

        while burning.has_uncovered() {
            let centre = if rng.random_bool(self.p) {
                burning.best_candidate(rng, true, |_, mass| mass as f64)
            } else {
                burning.random_candidate(rng, true)
            };

            let Some(centre) = centre else { break };
            let members = burning.burn(centre);
            partition.add_box_with_centre(centre, members);
        }

        Ok(partition)
    }
}
