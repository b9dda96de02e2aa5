use log::debug;

use super::*;

/// Particle-swarm optimisation over random-key encodings.
///
/// Each of the `pop` particles has a position (random keys, decoded like in [`De`]) and a
/// velocity. The first particle starts at a random greedy order, so the swarm best never has
/// more boxes than [`Greedy`] with that order. In each of `gmax` iterations, velocities are updated as
/// `w * v + c1 * r1 * (personal_best - x) + c2 * r2 * (swarm_best - x)` with fresh uniform
/// `r1, r2` per key, and positions move by their velocity. The decoded covering of the swarm
/// best is reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pso {
    pop: u32,
    gmax: u32,
    w: f64,
    c1: f64,
    c2: f64,
    memory_limit: Option<usize>,
}

impl Default for Pso {
    fn default() -> Self {
        Self {
            pop: 10,
            gmax: 30,
            w: 0.7,
            c1: 1.5,
            c2: 1.5,
            memory_limit: None,
        }
    }
}

impl Pso {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of particles
    pub fn pop(mut self, pop: u32) -> Self {
        self.pop = pop;
        self
    }

    /// Sets the number of iterations
    pub fn gmax(mut self, gmax: u32) -> Self {
        self.gmax = gmax;
        self
    }

    /// Sets the inertia weight
    pub fn w(mut self, w: f64) -> Self {
        self.w = w;
        self
    }

    /// Sets the cognitive coefficient
    pub fn c1(mut self, c1: f64) -> Self {
        self.c1 = c1;
        self
    }

    /// Sets the social coefficient
    pub fn c2(mut self, c2: f64) -> Self {
        self.c2 = c2;
        self
    }

    /// Limits the number of bytes the swarm may occupy
    pub fn memory_limit(mut self, bytes: usize) -> Self {
        self.memory_limit = Some(bytes);
        self
    }

    fn check_parameters(&self, n: NumNodes) -> Result<()> {
        check_positive("pop", self.pop)?;
        for (name, value) in [("w", self.w), ("c1", self.c1), ("c2", self.c2)] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(CoverError::InvalidParameter {
                    name,
                    reason: format!("{value} must be a non-negative number"),
                });
            }
        }
        // positions, velocities and personal bests
        check_population_memory(self.pop.saturating_mul(3), n, self.memory_limit)
    }
}

struct Particle {
    position: Vec<f64>,
    velocity: Vec<f64>,
    best_position: Vec<f64>,
    best_fitness: usize,
}

impl BoxCovering for Pso {
    const NAME: &'static str = "pso";
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

        let mut swarm: Vec<Particle> = initial_keys(rng, network, self.pop as usize)
            .into_iter()
            .map(|position| {
                let best_fitness = decode_keys(matrix, &position, bound).len();
                Particle {
                    velocity: vec![0.0; n as usize],
                    best_position: position.clone(),
                    position,
                    best_fitness,
                }
            })
            .collect();

        let fitness: Vec<usize> = swarm.iter().map(|p| p.best_fitness).collect();
        let leader = argmin(&fitness);
        let mut swarm_best = swarm[leader].best_position.clone();
        let mut swarm_best_fitness = swarm[leader].best_fitness;

        for iteration in 0..self.gmax {
            for particle in swarm.iter_mut() {
                for j in 0..n as usize {
                    let r1: f64 = rng.random();
                    let r2: f64 = rng.random();
                    particle.velocity[j] = self.w * particle.velocity[j]
                        + self.c1 * r1 * (particle.best_position[j] - particle.position[j])
                        + self.c2 * r2 * (swarm_best[j] - particle.position[j]);
                    particle.position[j] += particle.velocity[j];
                }

                let fitness = decode_keys(matrix, &particle.position, bound).len();
                if fitness <= particle.best_fitness {
                    particle.best_fitness = fitness;
                    particle.best_position.clone_from(&particle.position);
                }
                if fitness < swarm_best_fitness {
                    swarm_best_fitness = fitness;
                    swarm_best.clone_from(&particle.position);
                }
            }

            debug!("pso: iteration {iteration} best {swarm_best_fitness}");
        }

        Ok(decode_keys(matrix, &swarm_best, bound).into_partition(n))
    }
}
