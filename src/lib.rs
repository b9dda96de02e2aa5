/*!
`ucover` computes **box coverings** of networks: partitions of the nodes into boxes of
bounded distance, used to estimate the fractal (box) dimension of a network from how the
number of boxes scales with the box size.

# Representation

We represent **nodes** as `u32` in the range `0..n` where `n` is the number of nodes in the network.
For **edges**, we use a simple tuple-struct `Edge(Node, Node)`. Networks are undirected,
unweighted and connected; they are stored as a [`CsrGraph`](crate::repr::CsrGraph) and
wrapped into a [`Network`](crate::network::Network) that owns a lazily computed, droppable
all-pairs distance matrix.

### Box sizes

Algorithms belong to one of two families:

- **lb** ([`Family::Diameter`](crate::covering::Family::Diameter)): every two nodes of a box
  have distance at most `lb - 1`.
- **rb** ([`Family::Radius`](crate::covering::Family::Radius)): every box has a centre and
  all its members are within distance `rb` of the centre.

The families are not interchangeable; every algorithm declares its family.

# Design

All covering algorithms are provided as configurable structs that one can alter to their needs
using the *Builder* / *Setter* pattern before calling the configured algorithm on a network.
For name-based selection, they are collected in the [`Algorithm`](crate::covering::Algorithm)
enum. Randomness is always passed explicitly as an `rng` argument, so seeding a
`rand_pcg::Pcg64Mcg` makes every run reproducible.

# Usage

There are *5* core submodules you probably want to interact with:
- [`prelude`] includes definitions for nodes, edges, basic graph operations, networks and the covering types,
- [`covering`] includes all box-covering algorithms and the [`Partition`](crate::covering::Partition) they produce,
- [`bench`] includes the benchmark harness that times algorithms and writes/reads log files,
- [`algo`] includes graph algorithms such as BFS (`graph.bfs(start_node)`), connected components and all-pairs distances,
- [`gens`] includes generators for paths, grids, flowers and random trees.

In most use-cases, `use ucover::prelude::*;` suffices for your needs.

```rust
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use ucover::prelude::*;

let rng = &mut Pcg64Mcg::seed_from_u64(1);
let graph = CsrGraph::from_edges(6, [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)]);
let mut network = Network::new("path", graph).unwrap();

let algorithm: Algorithm = "cbb".parse().unwrap();
let covering = algorithm.run(&mut network, 1, true, rng).unwrap();
assert_eq!(covering.number_of_boxes(), 6);
```
*/

pub mod algo;
pub mod bench;
pub mod covering;
pub mod edge;
pub mod error;
pub mod gens;
pub mod io;
pub mod network;
pub mod node;
pub mod ops;
pub mod repr;
#[cfg(test)]
pub(crate) mod testing;
pub mod utils;

pub use edge::*;
pub use node::*;

/// `ucover::prelude` includes definitions for nodes and edges, all basic graph operation traits,
/// the graph representation, networks and the covering algorithm interface.
pub mod prelude {
    pub use super::{
        covering::{Algorithm, BoxCovering, Covering, DistancePolicy, Family, Partition},
        edge::*,
        error::{CoverError, Result},
        network::Network,
        node::*,
        ops::*,
        repr::*,
    };
}
