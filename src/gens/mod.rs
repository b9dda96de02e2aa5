/*!
# Graph Generators

Small, deterministic and random network generators. They are mostly used to create test
instances with known box-covering properties:

- paths, cycles, grids, stars and cliques (see [`Substructures`]),
- `(u,v)`-flowers, the canonical fractal networks (see [`Substructures::flower`]),
- uniformly random trees (see [`Mst`]).

All generators are available for every graph type implementing [`GraphFromScratch`].
*/

use rand::Rng;

use crate::prelude::*;

mod mst;
mod substructures;

pub use mst::*;
pub use substructures::*;

/// Trait for generators that allow setting the number of nodes.
pub trait NumNodesGen {
    /// Sets the number of nodes in the graph generator.
    fn nodes(self, n: NumNodes) -> Self;
}

/// General trait for a configurable random edge generator.
pub trait GraphGenerator {
    /// Generates a list of random edges.
    fn generate<R>(&self, rng: &mut R) -> Vec<Edge>
    where
        R: Rng,
    {
        self.stream(rng).collect()
    }

    /// Creates a lazy iterator (stream) over generated edges.
    fn stream<R>(&self, rng: &mut R) -> impl Iterator<Item = Edge>
    where
        R: Rng;
}

/// Trait for building random graph instances
pub trait RandomGraph: Sized {
    /// Creates a uniformly random spanning tree with `n` nodes
    fn random_tree<R>(rng: &mut R, n: NumNodes) -> Self
    where
        R: Rng;
}

impl<G> RandomGraph for G
where
    G: GraphFromScratch,
{
    fn random_tree<R>(rng: &mut R, n: NumNodes) -> Self
    where
        R: Rng,
    {
        Self::from_edges(n, Mst::new().nodes(n).generate(rng))
    }
}
