/*!
# Random Spanning Trees

Generates random trees by attaching every node `u > 0` to a uniformly chosen node of
`0..u` after shuffling node ids. Trees are the sparsest connected networks and make good
stress tests for covering algorithms, as their diameter grows quickly.

# Examples

```
use ucover::gens::*;

let mut rng = rand::rng();
let edges = Mst::new().nodes(5).generate(&mut rng);

assert_eq!(edges.len(), 4); // Always n-1 edges
```
*/

use rand::{Rng, seq::SliceRandom};
use rand_distr::{Distribution, Uniform};

use super::*;

/// Generator for a random spanning tree
#[derive(Debug, Copy, Clone, Default)]
pub struct Mst {
    n: NumNodes,
}

impl Mst {
    /// Creates a new generator with `n = 0`
    pub fn new() -> Self {
        Self::default()
    }
}

impl NumNodesGen for Mst {
    fn nodes(mut self, n: NumNodes) -> Self {
        self.n = n;
        self
    }
}

impl GraphGenerator for Mst {
    fn stream<R>(&self, rng: &mut R) -> impl Iterator<Item = Edge>
    where
        R: Rng,
    {
        let mut ids: Vec<Node> = (0..self.n).collect();
        ids.shuffle(rng);

        let mut edges = Vec::with_capacity(self.n.saturating_sub(1) as usize);
        for u in 1..self.n {
            // Uniform::new only fails for empty ranges, which `0..u` never is for `u >= 1`
            if let Ok(parent) = Uniform::new(0, u) {
                let p = parent.sample(rng);
                edges.push(Edge(ids[p as usize], ids[u as usize]));
            }
        }

        edges.into_iter()
    }
}
