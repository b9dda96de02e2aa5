/*!
# Graph Algorithms

This module provides the graph algorithms the covering algorithms are built on.
All algorithms are re-exported at the top level of this module, so you can simply do:
```rust
use ucover::algo::*;
```
and gain access to traversal, connectivity, subgraph extraction and all-pairs distances.
If possible, algorithms are provided as **iterators**, making it easy to consume results lazily.
*/

mod connectivity;
mod distances;
mod subgraph;
mod traversal;

use crate::prelude::*;

pub use connectivity::*;
pub use distances::*;
pub use subgraph::*;
pub use traversal::*;
