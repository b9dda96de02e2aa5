/*!
# Deterministic Networks

Constructors for networks with a fixed structure. Their distances are known in closed
form, which makes them the backbone of the covering tests:

- a path of `n` nodes has diameter `n - 1`,
- a cycle of `n` nodes has diameter `n / 2`,
- a `r x c` grid has diameter `r + c - 2`,
- the `(u,v)`-flower of generation `g` has fractal dimension `ln(u + v) / ln(u)` for `u <= v`.

# Example

```rust
use ucover::{prelude::*, gens::*};

let g = CsrGraph::path(4);
assert_eq!(g.ordered_edges(), vec![Edge(0, 1), Edge(1, 2), Edge(2, 3)]);
```
*/

use itertools::Itertools;

use super::*;

/// Constructors for deterministic networks
pub trait Substructures: Sized {
    /// Path `0 - 1 - ... - (n-1)`
    fn path(n: NumNodes) -> Self;

    /// Cycle `0 - 1 - ... - (n-1) - 0`
    fn cycle(n: NumNodes) -> Self;

    /// Grid with `rows x cols` nodes; node `r * cols + c` sits in row `r` and column `c`
    fn grid(rows: NumNodes, cols: NumNodes) -> Self;

    /// Star with center `0` and `n - 1` leaves
    fn star(n: NumNodes) -> Self;

    /// Complete graph on `n` nodes
    fn complete(n: NumNodes) -> Self;

    /// `(u,v)`-flower after `generations` generations.
    ///
    /// Generation `1` is a cycle of `u + v` nodes. In every further generation, each edge is
    /// replaced by two parallel paths of lengths `u` and `v`.
    ///
    /// # Panics
    /// Panics if `u == 0`, `v < u` or `u + v < 3`.
    fn flower(u: NumNodes, v: NumNodes, generations: u32) -> Self;
}

impl<G> Substructures for G
where
    G: GraphFromScratch,
{
    fn path(n: NumNodes) -> Self {
        Self::from_edges(n, (1..n).map(|u| Edge(u - 1, u)))
    }

    fn cycle(n: NumNodes) -> Self {
        Self::from_edges(
            n,
            (1..n)
                .map(|u| Edge(u - 1, u))
                .chain((n > 2).then(|| Edge(n - 1, 0))),
        )
    }

    fn grid(rows: NumNodes, cols: NumNodes) -> Self {
        let id = move |r: NumNodes, c: NumNodes| r * cols + c;
        Self::from_edges(
            rows * cols,
            (0..rows).cartesian_product(0..cols).flat_map(|(r, c)| {
                let right = (c + 1 < cols).then(|| Edge(id(r, c), id(r, c + 1)));
                let down = (r + 1 < rows).then(|| Edge(id(r, c), id(r + 1, c)));
                right.into_iter().chain(down)
            }),
        )
    }

    fn star(n: NumNodes) -> Self {
        Self::from_edges(n, (1..n).map(|u| Edge(0, u)))
    }

    fn complete(n: NumNodes) -> Self {
        Self::from_edges(n, (0..n).tuple_combinations().map(|(u, v)| Edge(u, v)))
    }

    fn flower(u: NumNodes, v: NumNodes, generations: u32) -> Self {
        assert!(u >= 1 && v >= u && u + v >= 3);

        let mut n = u + v;
        let mut edges = (0..n).map(|x| Edge(x, (x + 1) % n)).collect_vec();

        for _ in 1..generations {
            let mut next = Vec::with_capacity(edges.len() * (u + v) as usize);
            for Edge(a, b) in edges {
                for len in [u, v] {
                    let mut prev = a;
                    for _ in 1..len {
                        next.push(Edge(prev, n));
                        prev = n;
                        n += 1;
                    }
                    next.push(Edge(prev, b));
                }
            }
            edges = next;
        }

        Self::from_edges(n, edges)
    }
}
