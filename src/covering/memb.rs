use super::*;

/// Maximum-excluded-mass burning.
///
/// Centres are chosen one after another until every node is covered by the ball of radius
/// `rb` around some centre. With probability `p`, the next centre is the non-centre whose
/// ball contains the most uncovered nodes (ties broken uniformly at random); otherwise it is
/// a uniformly random non-centre whose ball contains at least one uncovered node. Finally,
/// every node joins the box of its nearest centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Memb {
    p: f64,
}

impl Default for Memb {
    fn default() -> Self {
        Self { p: 1.0 }
    }
}

impl Memb {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the probability of choosing the centre with maximum excluded mass
    pub fn p(mut self, p: f64) -> Self {
        self.p = p;
        self
    }
}

impl BoxCovering for Memb {
    const NAME: &'static str = "memb";
    const FAMILY: Family = Family::Radius;

    fn cover<R>(&self, network: &Network, size: u32, rng: &mut R) -> Result<Partition>
    where
        R: Rng,
    {
        check_box_size(size)?;
        check_probability("p", self.p)?;
        let matrix = network.distances()?;

        let mut burning = Burning::new(matrix, size);
        while burning.has_uncovered() {
            let centre = if rng.random_bool(self.p) {
                burning.best_candidate(rng, false, |_, mass| mass as f64)
            } else {
                burning.random_candidate(rng, false)
            };

            // an uncovered node always has positive mass
            let Some(centre) = centre else { break };
            burning.burn(centre);
        }

        Ok(burning.into_nearest_centre_partition())
    }
}
