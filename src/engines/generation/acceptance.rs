use rand::Rng;

/// Metropolis rule deciding whether a proposed genome replaces the current one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetropolisCriterion {
    /// Temperature-like scale of tolerated fitness losses; small values
    /// approach greedy hill-climbing
    pub q: f64,
}

impl MetropolisCriterion {
    pub fn new(q: f64) -> Self {
        Self { q }
    }

    /// Probability of accepting a move from `previous_fitness` to `new_fitness`.
    pub fn acceptance_probability(&self, previous_fitness: f64, new_fitness: f64) -> f64 {
        let fitness_diff = new_fitness - previous_fitness;
        if fitness_diff > 0.0 {
            1.0
        } else {
            (fitness_diff / self.q).exp()
        }
    }

    pub fn accepts<R: Rng + ?Sized>(&self, rng: &mut R, previous_fitness: f64, new_fitness: f64) -> bool {
        if new_fitness > previous_fitness {
            return true;
        }
        rng.gen::<f64>() < self.acceptance_probability(previous_fitness, new_fitness)
    }
}

/// Accept fitness gains, accept a loss with probability `exp(diff / q)`.
pub fn accept_mutation<R: Rng + ?Sized>(
    rng: &mut R,
    previous_fitness: f64,
    new_fitness: f64,
    q: f64,
) -> bool {
    MetropolisCriterion::new(q).accepts(rng, previous_fitness, new_fitness)
}
