use log::debug;

use super::*;

/// Differential evolution over random-key encodings.
///
/// Every individual is a vector of `n` real keys; it is decoded into a covering by
/// [greedy colouring](Greedy) the nodes in increasing key order, so every individual
/// represents a valid covering. For each of `gn` generations and each individual `x_i`, a
/// mutant is built from three further distinct individuals:
///
/// - `dual_new = false`: `x_r1 + F * (x_r2 - x_r3)`
/// - `dual_new = true`: `x_i + F * (x_best - x_i) + F * (x_r1 - x_r2)`
///
/// A trial vector takes each key from the mutant with probability `cr` (and at least one key)
/// and from `x_i` otherwise. It replaces `x_i` if it decodes to at most as many boxes.
///
/// The first individual encodes a random greedy order and the others are uniform, so the
/// result never has more boxes than [`Greedy`] with that order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct De {
    num_p: u32,
    gn: u32,
    big_f: f64,
    cr: f64,
    dual_new: bool,
    memory_limit: Option<usize>,
}

impl Default for De {
    fn default() -> Self {
        Self {
            num_p: 10,
            gn: 30,
            big_f: 0.5,
            cr: 0.9,
            dual_new: false,
            memory_limit: None,
        }
    }
}

impl De {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the population size (at least 4)
    pub fn num_p(mut self, num_p: u32) -> Self {
        self.num_p = num_p;
        self
    }

    /// Sets the number of generations
    pub fn gn(mut self, gn: u32) -> Self {
        self.gn = gn;
        self
    }

    /// Sets the scale `F` of difference vectors
    pub fn big_f(mut self, big_f: f64) -> Self {
        self.big_f = big_f;
        self
    }

    /// Sets the crossover probability
    pub fn cr(mut self, cr: f64) -> Self {
        self.cr = cr;
        self
    }

    /// Selects the mutation variant
    pub fn dual_new(mut self, dual_new: bool) -> Self {
        self.dual_new = dual_new;
        self
    }

    /// Limits the number of bytes the population may occupy
    pub fn memory_limit(mut self, bytes: usize) -> Self {
        self.memory_limit = Some(bytes);
        self
    }

    fn check_parameters(&self, n: NumNodes) -> Result<()> {
        if self.num_p < 4 {
            return Err(CoverError::InvalidParameter {
                name: "num_p",
                reason: format!("population of {} is smaller than 4", self.num_p),
            });
        }
        check_positive("big_f", self.big_f)?;
        check_probability("cr", self.cr)?;
        check_population_memory(self.num_p, n, self.memory_limit)
    }
}

impl BoxCovering for De {
    const NAME: &'static str = "de";
    const FAMILY: Family = Family::Diameter;

    fn cover<R>(&self, network: &Network, size: u32, rng: &mut R) -> Result<Partition>
    where
        R: Rng,
    {
        check_box_size(size)?;
        let n = network.number_of_nodes();
        self.check_parameters(n)?;
        let matrix = network.distances()?;
        let bound = diameter_bound(size);
        let num_p = self.num_p as usize;
        let f = self.big_f;

        let mut population = initial_keys(rng, network, num_p);
        let mut fitness: Vec<usize> = population
            .iter()
            .map(|keys| decode_keys(matrix, keys, bound).len())
            .collect();

        for generation in 0..self.gn {
            let best = argmin(&fitness);

            for i in 0..num_p {
                let [r1, r2, r3] = distinct_indices(rng, num_p, i);
                let (x, a, b, c) = (&population[i], &population[r1], &population[r2], &population[r3]);
                let x_best = &population[best];

                let forced = rng.random_range(0..n as usize);
                let trial: Vec<f64> = (0..n as usize)
                    .map(|j| {
                        if j == forced || rng.random_bool(self.cr) {
                            if self.dual_new {
                                x[j] + f * (x_best[j] - x[j]) + f * (a[j] - b[j])
                            } else {
                                a[j] + f * (b[j] - c[j])
                            }
                        } else {
                            x[j]
                        }
                    })
                    .collect();

                let trial_fitness = decode_keys(matrix, &trial, bound).len();
                if trial_fitness <= fitness[i] {
                    population[i] = trial;
                    fitness[i] = trial_fitness;
                }
            }

            debug!(
                "de: generation {generation} best {}",
                fitness.iter().min().copied().unwrap_or_default()
            );
        }

        let best = argmin(&fitness);
        Ok(decode_keys(matrix, &population[best], bound).into_partition(n))
    }
}

/// Returns `n` keys drawn uniformly from `[0, 1)`
fn random_keys<R>(rng: &mut R, n: NumNodes) -> Vec<f64>
where
    R: Rng,
{
    (0..n).map(|_| rng.random::<f64>()).collect()
}

/// Returns keys that decode to `order`: its `i`-th node gets key `i / n`
pub(crate) fn keys_of_order(order: &[Node]) -> Vec<f64> {
    let n = order.len() as f64;
    let mut keys = vec![0.0; order.len()];
    for (i, &u) in order.iter().enumerate() {
        keys[u as usize] = i as f64 / n;
    }
    keys
}

/// Returns `count` key vectors: the first encodes a random [`NodeOrder`], the rest are uniform
pub(crate) fn initial_keys<R>(rng: &mut R, network: &Network, count: usize) -> Vec<Vec<f64>>
where
    R: Rng,
{
    let n = network.number_of_nodes();
    let mut keys = Vec::with_capacity(count);
    if count > 0 {
        keys.push(keys_of_order(&NodeOrder::Random.nodes(network, rng)));
    }
    keys.extend((1..count).map(|_| random_keys(rng, n)));
    keys
}

/// Index of the smallest value (first on ties)
pub(crate) fn argmin(values: &[usize]) -> usize {
    values
        .iter()
        .enumerate()
        .min_by_key(|&(i, &v)| (v, i))
        .map_or(0, |(i, _)| i)
}

/// Returns [`CoverError::ResourceExhaustion`] if `vectors` key vectors over `n` nodes exceed `limit` bytes
pub(crate) fn check_population_memory(
    vectors: u32,
    n: NumNodes,
    limit: Option<usize>,
) -> Result<()> {
    let required = (vectors as usize)
        .saturating_mul(n as usize)
        .saturating_mul(std::mem::size_of::<f64>());
    match limit {
        Some(limit) if required > limit => Err(CoverError::ResourceExhaustion(format!(
            "population needs {required} bytes, limit is {limit} bytes"
        ))),
        _ => Ok(()),
    }
}

/// Draws three distinct indices from `0..len`, all different from `exclude`
fn distinct_indices<R>(rng: &mut R, len: usize, exclude: usize) -> [usize; 3]
where
    R: Rng,
{
    let mut picked = [exclude; 3];
    for k in 0..3 {
        picked[k] = loop {
            let r = rng.random_range(0..len);
            if r != exclude && !picked[..k].contains(&r) {
                break r;
            }
        };
    }
    picked
}
