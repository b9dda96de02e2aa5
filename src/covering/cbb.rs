use super::*;

/// Compact box burning.
///
/// A box is grown from a candidate set that initially contains all uncovered nodes: a
/// candidate is taken (uniformly at random by default) and added to the box, and every
/// candidate at distance `>= lb` from it is discarded. Once no candidate is left, the box is
/// complete and the next box is burnt from the remaining uncovered nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cbb {
    order: NodeOrder,
}

impl Cbb {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how the next candidate is picked: [`NodeOrder::Random`] picks uniformly,
    /// [`NodeOrder::Natural`] the smallest id and [`NodeOrder::LargestFirst`] the highest degree.
    pub fn order(mut self, order: NodeOrder) -> Self {
        self.order = order;
        self
    }

    fn pick<R>(&self, network: &Network, candidates: &[Node], rng: &mut R) -> usize
    where
        R: Rng,
    {
        match self.order {
            NodeOrder::Random => rng.random_range(0..candidates.len()),
            NodeOrder::Natural => 0,
            NodeOrder::LargestFirst => candidates
                .iter()
                .enumerate()
                .max_by_key(|&(i, &u)| (network.degree_of(u), std::cmp::Reverse(i)))
                .map_or(0, |(i, _)| i),
        }
    }
}

impl BoxCovering for Cbb {
    const NAME: &'static str = "cbb";
    const FAMILY: Family = Family::Diameter;

    fn cover<R>(&self, network: &Network, size: u32, rng: &mut R) -> Result<Partition>
    where
        R: Rng,
    {
        check_box_size(size)?;
        let matrix = network.distances()?;
        let bound = diameter_bound(size);

        let mut partition = Partition::new(network.number_of_nodes());
        // kept sorted, so `Natural` picks the smallest id
        let mut uncovered: Vec<Node> = network.vertices().collect();

        while !uncovered.is_empty() {
            let mut candidates = uncovered.clone();
            let mut members = Vec::new();

            while !candidates.is_empty() {
                let u = candidates.remove(self.pick(network, &candidates, rng));
                let row = matrix.row(u);
                candidates.retain(|&v| row[v as usize] <= bound);
                members.push(u);
            }

            let in_box = node_bitset_with(network.number_of_nodes(), members.iter().copied());
            uncovered.retain(|&v| !in_box.contains(v as usize));
            partition.add_box(members);
        }

        Ok(partition)
    }
}
