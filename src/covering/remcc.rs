use super::*;

/// Centre-based covering ranking centres by excluded mass times closeness centrality.
///
/// Like [`Memb`], but the next centre is always the non-centre maximising
/// `mass(u) * (n - 1) / farness(u)` (ties broken uniformly at random), which prefers central
/// nodes among those covering many uncovered nodes. Every node finally joins the box of its
/// nearest centre.
///
/// With [`Remcc::return_centres`], boxing mode reports the chosen centres alongside the count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Remcc {
    return_centres: bool,
}

impl Remcc {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }

    /// If set, boxing mode also reports the chosen centres
    pub fn return_centres(mut self, return_centres: bool) -> Self {
        self.return_centres = return_centres;
        self
    }

    /// Returns *true* if boxing mode reports the chosen centres
    pub fn returns_centres(&self) -> bool {
        self.return_centres
    }
}

impl BoxCovering for Remcc {
    const NAME: &'static str = "remcc";
    const FAMILY: Family = Family::Radius;

    fn cover<R>(&self, network: &Network, size: u32, rng: &mut R) -> Result<Partition>
    where
        R: Rng,
    {
        check_box_size(size)?;
        let matrix = network.distances()?;

        let others = network.number_of_nodes().saturating_sub(1) as f64;
        let closeness: Vec<f64> = network
            .vertices()
            .map(|u| match matrix.farness(u) {
                0 => 1.0,
                farness => others / farness as f64,
            })
            .collect();

        let mut burning = Burning::new(matrix, size);
        while burning.has_uncovered() {
            let Some(centre) = burning.best_candidate(rng, false, |u, mass| {
                mass as f64 * closeness[u as usize]
            }) else {
                break;
            };
            burning.burn(centre);
        }

        Ok(burning.into_nearest_centre_partition())
    }
}
