/*!
# Graph Representations

Box covering works on static graphs that are queried far more often than they are built,
so the only representation is the undirected [`CsrGraph`]: adjacency lists flattened into a
single buffer with per-node offsets.
*/

use crate::{ops::*, *};

mod csr;

pub use csr::*;
