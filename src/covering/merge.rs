use rand::seq::SliceRandom;

use super::*;

/// Merge covering.
///
/// Starts from singleton boxes and repeatedly merges adjacent boxes whose union still has
/// diameter at most `lb - 1`, until a full pass over all boxes (in random order) merges
/// nothing. Only uses truncated BFS on the graph, never the distance matrix.
///
/// The algorithm handles one box size per pass. To cover a range of sizes at once, reduce it
/// to its maximum with [`Merge::max_box_size`] and rerun for each further size of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Merge {
    max_passes: Option<u32>,
}

impl Merge {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops after at most `passes` passes over all boxes. Every prefix of passes yields a
    /// valid covering.
    pub fn max_passes(mut self, passes: u32) -> Self {
        self.max_passes = Some(passes);
        self
    }

    /// Returns the largest box size of a sweep, the only size a single pass supports
    pub fn max_box_size(sizes: &[u32]) -> Option<u32> {
        sizes.iter().copied().max()
    }
}

impl BoxCovering for Merge {
    const NAME: &'static str = "merge";
    const FAMILY: Family = Family::Diameter;
    const DISTANCE_POLICY: DistancePolicy = DistancePolicy::Dropped;

    fn cover<R>(&self, network: &Network, size: u32, rng: &mut R) -> Result<Partition>
    where
        R: Rng,
    {
        check_box_size(size)?;
        let graph = network.graph();
        let bound = size.saturating_sub(1) as Depth;
        let mut boxes = BoxAssignment::singletons(network.number_of_nodes());

        let mut passes = 0;
        loop {
            if self.max_passes.is_some_and(|max| passes >= max) {
                break;
            }
            passes += 1;

            let mut merged = false;
            let mut order: Vec<BoxId> = boxes.non_empty_boxes().collect();
            order.shuffle(rng);

            for b in order {
                if boxes.members(b).is_empty() {
                    continue;
                }

                let mut adjacent: Vec<BoxId> = boxes
                    .members(b)
                    .iter()
                    .flat_map(|&u| graph.neighbors_of(u))
                    .map(|v| boxes.box_of(v))
                    .filter(|&c| c != b)
                    .collect();
                adjacent.sort_unstable();
                adjacent.dedup();

                for c in adjacent {
                    if boxes.members(c).is_empty()
                        || !union_fits(graph, boxes.members(b), boxes.members(c), bound)
                    {
                        continue;
                    }

                    for u in boxes.members(c).to_vec() {
                        boxes.move_node(u, b);
                    }
                    merged = true;
                }
            }

            if !merged {
                break;
            }
        }

        Ok(boxes.to_partition())
    }
}

/// Returns *true* if every node of `left` is within `bound` of every node of `right`
fn union_fits<G>(graph: &G, left: &[Node], right: &[Node], bound: Depth) -> bool
where
    G: AdjacencyList,
{
    let (sources, targets) = if left.len() <= right.len() {
        (left, right)
    } else {
        (right, left)
    };

    sources.iter().all(|&u| {
        let mut bfs = graph.bfs(u).max_depth(bound);
        bfs.by_ref().for_each(drop);
        targets.iter().all(|&v| bfs.did_visit_node(v))
    })
}
