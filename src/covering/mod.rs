/*!
# Box Covering

This module contains all box-covering algorithms. Each algorithm is a configuration struct
implementing [`BoxCovering`]; the [`Algorithm`] enum wraps them for selection by name.

| Name                | Struct               | Family   | Distances |
|---------------------|----------------------|----------|-----------|
| `greedy`            | [`Greedy`]           | lb       | shared    |
| `cbb`               | [`Cbb`]              | lb       | shared    |
| `merge`             | [`Merge`]            | lb       | none      |
| `memb`              | [`Memb`]             | rb       | shared    |
| `random_sequential` | [`RandomSequential`] | rb       | none      |
| `remcc`             | [`Remcc`]            | rb       | shared    |
| `mcwr`              | [`Mcwr`]             | rb       | shared    |
| `obca`              | [`Obca`]             | lb       | shared    |
| `sa`                | [`Sa`]               | lb       | shared    |
| `de`                | [`De`]               | lb       | shared    |
| `pso`               | [`Pso`]              | lb       | shared    |
| `fuzzy`             | [`Fuzzy`]            | lb       | private   |

Algorithms that need exact distances read them from the network's distance matrix and fail
with [`CoverError::DistancesNotComputed`] if it is not held; [`Algorithm::run`] computes it on
demand.

# Example

```rust
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use ucover::{covering::*, gens::*, prelude::*};

let rng = &mut Pcg64Mcg::seed_from_u64(3);
let mut network = Network::new("grid", CsrGraph::grid(4, 4)).unwrap();
network.ensure_distances().unwrap();

let partition = Greedy::new().cover(&network, 3, rng).unwrap();
assert!(partition.validate(&network, Family::Diameter, 3, "greedy").is_ok());
```
*/

use std::{fmt::Display, str::FromStr};

use rand::Rng;

use crate::{
    algo::*,
    error::{CoverError, Result, check_positive, check_probability},
    prelude::*,
};

mod assignment;
mod burning;
mod cbb;
mod de;
mod fuzzy;
mod greedy;
mod mcwr;
mod memb;
mod merge;
mod obca;
mod partition;
mod pso;
mod random_sequential;
mod remcc;
mod sa;

pub(crate) use assignment::*;
pub(crate) use burning::*;
pub use cbb::*;
pub use de::*;
pub use fuzzy::*;
pub use greedy::*;
pub use mcwr::*;
pub use memb::*;
pub use merge::*;
pub use obca::*;
pub use partition::*;
pub use pso::*;
pub use random_sequential::*;
pub use remcc::*;
pub use sa::*;

/// The two non-interchangeable kinds of box-size parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// `lb`: every two members of a box have distance at most `lb - 1`
    Diameter,
    /// `rb`: every member of a box is within distance `rb` of the box's centre
    Radius,
}

/// How an algorithm uses the network's distance matrix, and therefore how the benchmark
/// harness treats the matrix around the timed region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistancePolicy {
    /// The matrix is computed once before timing; its cost is accounted for by the time offset
    Shared,
    /// The algorithm works on the graph only; the matrix is dropped before timing
    Dropped,
    /// The matrix is recomputed inside the timed region and dropped afterwards
    Private,
}

/// Result of a covering run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Covering {
    /// Only the number of boxes (boxing mode)
    Count(NumNodes),
    /// The number of boxes and the chosen centres
    Centres { count: NumNodes, centres: Vec<Node> },
    /// The full partition
    Partition(Partition),
}

impl Covering {
    /// Returns the number of boxes of the covering
    pub fn number_of_boxes(&self) -> NumNodes {
        match self {
            Covering::Count(count) => *count,
            Covering::Centres { count, .. } => *count,
            Covering::Partition(partition) => partition.number_of_boxes(),
        }
    }

    /// Returns the partition if the covering carries one
    pub fn partition(&self) -> Option<&Partition> {
        match self {
            Covering::Partition(partition) => Some(partition),
            _ => None,
        }
    }
}

/// A box-covering algorithm
pub trait BoxCovering {
    /// Name used for lookup and for naming log files
    const NAME: &'static str;

    /// Family of the box-size parameter
    const FAMILY: Family;

    /// Usage of the distance matrix
    const DISTANCE_POLICY: DistancePolicy = DistancePolicy::Shared;

    /// Computes a covering of `network` with box size `size`.
    ///
    /// The returned partition is compacted: box ids are `0..k` without gaps.
    ///
    /// # Errors
    /// - [`CoverError::InvalidBoxSize`] if `size == 0`
    /// - [`CoverError::InvalidParameter`] if the configuration is out of range
    /// - [`CoverError::DistancesNotComputed`] if the algorithm needs the distance matrix and
    ///   the network does not hold it
    fn cover<R>(&self, network: &Network, size: u32, rng: &mut R) -> Result<Partition>
    where
        R: Rng;
}

/// Returns [`CoverError::InvalidBoxSize`] for a box size of `0`
pub fn check_box_size(size: u32) -> Result<()> {
    if size == 0 {
        Err(CoverError::InvalidBoxSize { size })
    } else {
        Ok(())
    }
}

/// All covering algorithms with their configuration
#[derive(Debug, Clone, PartialEq)]
pub enum Algorithm {
    Greedy(Greedy),
    Cbb(Cbb),
    Merge(Merge),
    Memb(Memb),
    RandomSequential(RandomSequential),
    Remcc(Remcc),
    Mcwr(Mcwr),
    Obca(Obca),
    Sa(Sa),
    De(De),
    Pso(Pso),
    Fuzzy(Fuzzy),
}

/// Evaluates `$body` with `$inner` bound to the configuration of `$algo`
macro_rules! dispatch {
    ($algo:expr, $inner:ident => $body:expr) => {
        match $algo {
            Algorithm::Greedy($inner) => $body,
            Algorithm::Cbb($inner) => $body,
            Algorithm::Merge($inner) => $body,
            Algorithm::Memb($inner) => $body,
            Algorithm::RandomSequential($inner) => $body,
            Algorithm::Remcc($inner) => $body,
            Algorithm::Mcwr($inner) => $body,
            Algorithm::Obca($inner) => $body,
            Algorithm::Sa($inner) => $body,
            Algorithm::De($inner) => $body,
            Algorithm::Pso($inner) => $body,
            Algorithm::Fuzzy($inner) => $body,
        }
    };
}

fn name_of<A: BoxCovering>(_: &A) -> &'static str {
    A::NAME
}

fn family_of<A: BoxCovering>(_: &A) -> Family {
    A::FAMILY
}

fn policy_of<A: BoxCovering>(_: &A) -> DistancePolicy {
    A::DISTANCE_POLICY
}

impl Algorithm {
    /// Names of all algorithms in the order of [`Algorithm::all`]
    pub const NAMES: [&'static str; 12] = [
        Greedy::NAME,
        Cbb::NAME,
        Merge::NAME,
        Memb::NAME,
        RandomSequential::NAME,
        Remcc::NAME,
        Mcwr::NAME,
        Obca::NAME,
        Sa::NAME,
        De::NAME,
        Pso::NAME,
        Fuzzy::NAME,
    ];

    /// Returns the algorithm registered under `name` with its default configuration.
    ///
    /// # Errors
    /// Fails with [`CoverError::UnknownAlgorithm`] if no algorithm has this name.
    pub fn from_name(name: &str) -> Result<Self> {
        Ok(match name {
            Greedy::NAME => Algorithm::Greedy(Greedy::default()),
            Cbb::NAME => Algorithm::Cbb(Cbb::default()),
            Merge::NAME => Algorithm::Merge(Merge::default()),
            Memb::NAME => Algorithm::Memb(Memb::default()),
            RandomSequential::NAME => Algorithm::RandomSequential(RandomSequential::default()),
            Remcc::NAME => Algorithm::Remcc(Remcc::default()),
            Mcwr::NAME => Algorithm::Mcwr(Mcwr::default()),
            Obca::NAME => Algorithm::Obca(Obca::default()),
            Sa::NAME => Algorithm::Sa(Sa::default()),
            De::NAME => Algorithm::De(De::default()),
            Pso::NAME => Algorithm::Pso(Pso::default()),
            Fuzzy::NAME => Algorithm::Fuzzy(Fuzzy::default()),
            _ => return Err(CoverError::UnknownAlgorithm(name.to_string())),
        })
    }

    /// Returns all algorithms with their default configuration
    pub fn all() -> impl Iterator<Item = Algorithm> {
        Self::NAMES
            .into_iter()
            .filter_map(|name| Self::from_name(name).ok())
    }

    /// Returns the name of the algorithm
    pub fn name(&self) -> &'static str {
        dispatch!(self, a => name_of(a))
    }

    /// Returns the family of the box-size parameter
    pub fn family(&self) -> Family {
        dispatch!(self, a => family_of(a))
    }

    /// Returns how the algorithm uses the distance matrix
    pub fn distance_policy(&self) -> DistancePolicy {
        dispatch!(self, a => policy_of(a))
    }

    /// Computes a covering of `network` without preparing distances and without validation.
    /// See [`BoxCovering::cover`].
    pub fn cover<R>(&self, network: &Network, size: u32, rng: &mut R) -> Result<Partition>
    where
        R: Rng,
    {
        dispatch!(self, a => a.cover(network, size, rng))
    }

    /// Checks `partition` against the distance bound of this algorithm's family
    pub fn validate(&self, network: &Network, size: u32, partition: &Partition) -> Result<()> {
        partition.validate(network, self.family(), size, self.name())
    }

    /// Turns a validated partition into the requested output.
    ///
    /// In boxing mode only the count is reported, or the count and the centres for
    /// [`Remcc::return_centres`]; otherwise the full partition is returned.
    pub fn report(&self, partition: Partition, boxing: bool) -> Covering {
        if !boxing {
            return Covering::Partition(partition);
        }

        match (self, partition.centres()) {
            (Algorithm::Remcc(remcc), Some(centres)) if remcc.returns_centres() => {
                Covering::Centres {
                    count: partition.number_of_boxes(),
                    centres: centres.to_vec(),
                }
            }
            _ => Covering::Count(partition.number_of_boxes()),
        }
    }

    /// Computes the distance matrix if needed, runs the algorithm, validates its partition and
    /// reports either the box count (`boxing == true`) or the full partition.
    ///
    /// # Errors
    /// Propagates all errors of [`BoxCovering::cover`] and the distance computation, and fails
    /// with [`CoverError::PartitionValidation`] if the algorithm produced an invalid covering.
    pub fn run<R>(
        &self,
        network: &mut Network,
        size: u32,
        boxing: bool,
        rng: &mut R,
    ) -> Result<Covering>
    where
        R: Rng,
    {
        check_box_size(size)?;
        if self.distance_policy() != DistancePolicy::Dropped {
            network.ensure_distances()?;
        }

        let partition = self.cover(network, size, rng)?;
        self.validate(network, size, &partition)?;
        Ok(self.report(partition, boxing))
    }
}

impl FromStr for Algorithm {
    type Err = CoverError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(&s.to_lowercase())
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

macro_rules! impl_from_config {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Algorithm {
                fn from(config: $variant) -> Self {
                    Algorithm::$variant(config)
                }
            }
        )*
    };
}

impl_from_config!(
    Greedy,
    Cbb,
    Merge,
    Memb,
    RandomSequential,
    Remcc,
    Mcwr,
    Obca,
    Sa,
    De,
    Pso,
    Fuzzy
);

/// Bound on the distance of two members of a box of diameter-bound `lb`
pub(crate) fn diameter_bound(lb: u32) -> Distance {
    clamp_distance(lb.saturating_sub(1))
}
