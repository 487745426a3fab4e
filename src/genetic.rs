//! Genetic algorithm for the TSP.
//!
//! This module implements a generational evolutionary search:
//! - Tiered replicated-list parent selection
//! - Order crossover preserving the closed-tour invariant
//! - Swap mutation on interior positions
//! - Worst-suffix replenishment with fresh random tours
//!
//! All randomness flows through a seeded generator owned by [`Evolution`],
//! so a fixed seed and configuration reproduce a run exactly.

use crate::instance::TspInstance;
use crate::population::Population;
use crate::tour::Tour;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

/// Attempt cap for distinctness rejection loops (parent selection, cut-point
/// draws, mutation index choice). Exceeding it is a descriptive error rather
/// than an unbounded spin.
const MAX_RETRIES: usize = 100_000;

/// Genetic algorithm configuration
#[derive(Debug, Clone)]
pub struct GaConfig {
    /// Population size, constant across generations
    pub population_size: usize,
    /// Number of generations to run; no early stopping
    pub num_generations: usize,
    /// Fixed start (and end) node of every tour, 0-based
    pub start_node: usize,
    /// Fraction of the ranked population replaced by fresh random tours each
    /// generation (the costliest suffix)
    pub new_gene_rate: f64,
    /// Breed operations per generation; each writes two offspring over the
    /// current worst slots
    pub breed_count: usize,
    /// Fraction of the population mutated each generation
    pub mutation_rate: f64,
    /// Random seed
    pub seed: u64,
}

impl Default for GaConfig {
    fn default() -> Self {
        GaConfig {
            population_size: 50,
            num_generations: 200,
            start_node: 0,
            new_gene_rate: 0.3,
            breed_count: 10,
            mutation_rate: 0.1,
            seed: 42,
        }
    }
}

impl GaConfig {
    /// Validate the configuration against an instance dimension. Invalid
    /// settings are reported here rather than silently corrupting the run.
    pub fn validate(&self, dimension: usize) -> Result<(), String> {
        if self.population_size < 2 {
            return Err(format!(
                "Population size must be at least 2, got {}",
                self.population_size
            ));
        }
        if self.start_node >= dimension {
            return Err(format!(
                "Start node {} out of range for {} nodes",
                self.start_node, dimension
            ));
        }
        if !(0.0..=1.0).contains(&self.new_gene_rate) {
            return Err(format!(
                "New-gene rate must be within [0, 1], got {}",
                self.new_gene_rate
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(format!(
                "Mutation rate must be within [0, 1], got {}",
                self.mutation_rate
            ));
        }
        if self.breed_count * 2 > self.population_size {
            return Err(format!(
                "Breed count {} exceeds half the population size {}: offspring \
                 slots would collide with the preserved elite",
                self.breed_count, self.population_size
            ));
        }
        if self.breed_count > 0 && dimension < 3 {
            return Err(format!(
                "Crossover needs at least 3 nodes, instance has {}",
                dimension
            ));
        }
        Ok(())
    }
}

/// Draw two distinct, not-yet-consumed positions uniformly from the
/// replicated candidate list and mark them consumed. Returns the population
/// indices the two positions refer to.
///
/// Positions, not population indices, are tracked: the same tour appears at
/// several positions via tier replication, and each replicated copy may be
/// used at most once per generation.
pub fn select_parents(
    candidates: &[usize],
    consumed: &mut HashSet<usize>,
    rng: &mut impl Rng,
) -> Result<(usize, usize), String> {
    let first = pick_unconsumed(candidates.len(), consumed, rng)?;
    let second = pick_unconsumed(candidates.len(), consumed, rng)?;

    Ok((candidates[first], candidates[second]))
}

/// Draw one not-yet-consumed list position and mark it consumed
fn pick_unconsumed(
    len: usize,
    consumed: &mut HashSet<usize>,
    rng: &mut impl Rng,
) -> Result<usize, String> {
    if consumed.len() >= len {
        return Err(format!(
            "All {} candidate positions already consumed this generation",
            len
        ));
    }

    let mut attempts = 0;
    loop {
        let position = rng.gen_range(0..len);
        if consumed.insert(position) {
            return Ok(position);
        }
        attempts += 1;
        if attempts > MAX_RETRIES {
            return Err(format!(
                "Parent selection exhausted {} retries: {} of {} candidate \
                 positions already consumed",
                MAX_RETRIES,
                consumed.len(),
                len
            ));
        }
    }
}

/// Order crossover: exchange a slice between the two parent interiors and
/// fill the remainder of each offspring from its own parent in original
/// relative order, split at the lower cut point. Both offspring keep the
/// closed-tour invariant structurally.
pub fn order_crossover(
    instance: &TspInstance,
    parent1: &Tour,
    parent2: &Tour,
    rng: &mut impl Rng,
) -> Result<(Tour, Tour), String> {
    let interior1 = parent1.interior();
    let interior2 = parent2.interior();
    let len = interior1.len();

    if len < 2 {
        return Err(format!(
            "Crossover needs interiors of at least 2 nodes, got {}",
            len
        ));
    }

    // Two distinct cut positions; equal draws are re-drawn.
    let mut attempts = 0;
    let (start_point, end_point) = loop {
        let a = rng.gen_range(0..len);
        let b = rng.gen_range(0..len);
        if a != b {
            break (a.min(b), a.max(b));
        }
        attempts += 1;
        if attempts > MAX_RETRIES {
            return Err(format!(
                "Cut-point draw exhausted {} retries for interior length {}",
                MAX_RETRIES, len
            ));
        }
    };

    let start_node = parent1.start_node();
    let child1 = assemble_offspring(interior1, interior2, start_point, end_point, start_node);
    let child2 = assemble_offspring(interior2, interior1, start_point, end_point, start_node);

    let child1 = Tour::from_nodes(instance, child1);
    let child2 = Tour::from_nodes(instance, child2);

    debug_assert!(child1.is_valid(instance.dimension, start_node));
    debug_assert!(child2.is_valid(instance.dimension, start_node));

    Ok((child1, child2))
}

/// Build one offspring sequence: the middle segment comes from the donor's
/// interior slice `[start_point, end_point)`, the filler is the receiver's
/// interior minus the segment nodes, split at `start_point`.
fn assemble_offspring(
    receiver: &[usize],
    donor: &[usize],
    start_point: usize,
    end_point: usize,
    start_node: usize,
) -> Vec<usize> {
    let middle = &donor[start_point..end_point];
    let segment: HashSet<usize> = middle.iter().copied().collect();

    let filler: Vec<usize> = receiver
        .iter()
        .copied()
        .filter(|node| !segment.contains(node))
        .collect();

    let mut child = Vec::with_capacity(receiver.len() + 2);
    child.push(start_node);
    child.extend_from_slice(&filler[..start_point]);
    child.extend_from_slice(middle);
    child.extend_from_slice(&filler[start_point..]);
    child.push(start_node);

    child
}

/// Mutate `floor(rate * len)` distinct tours in place, swapping two distinct
/// interior positions of each. Swapping interior elements cannot add or drop
/// a node, so the permutation invariant is preserved.
pub fn swap_mutation(
    population: &mut Population,
    instance: &TspInstance,
    mutation_rate: f64,
    rng: &mut impl Rng,
) -> Result<(), String> {
    // Interiors of fewer than 2 nodes have no distinct positions to swap.
    if instance.dimension < 3 {
        return Ok(());
    }

    let rate = mutation_rate.clamp(0.0, 1.0);
    let count = (population.len() as f64 * rate).floor() as usize;

    let mut chosen: HashSet<usize> = HashSet::new();
    let mut attempts = 0;

    while chosen.len() < count {
        let index = rng.gen_range(0..population.len());
        if !chosen.insert(index) {
            attempts += 1;
            if attempts > MAX_RETRIES {
                return Err(format!(
                    "Mutation index choice exhausted {} retries ({} of {} needed)",
                    MAX_RETRIES,
                    chosen.len(),
                    count
                ));
            }
            continue;
        }

        // Interior positions run from 1 to dimension - 1 in the full
        // sequence; the fixed endpoints are never touched.
        let i = rng.gen_range(1..instance.dimension);
        let j = loop {
            let j = rng.gen_range(1..instance.dimension);
            if j != i {
                break j;
            }
            attempts += 1;
            if attempts > MAX_RETRIES {
                return Err(format!(
                    "Mutation position draw exhausted {} retries",
                    MAX_RETRIES
                ));
            }
        };

        population.get_mut(index).swap_interior(instance, i, j);
    }

    Ok(())
}

/// Best solution found by a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionSummary {
    /// The best tour, as 1-based external node identifiers
    pub tour: Vec<usize>,
    /// Total cost of the best tour
    pub cost: u64,
    /// Generations executed
    pub generations: usize,
    /// Computation time in seconds
    pub computation_time: f64,
    /// Algorithm that produced this solution
    pub algorithm: String,
}

impl std::fmt::Display for SolutionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution ({})", self.algorithm)?;
        writeln!(f, "  Cost: {}", self.cost)?;
        writeln!(f, "  Generations: {}", self.generations)?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)?;
        writeln!(f, "  Tour: {:?}", self.tour)
    }
}

/// The generational evolution loop
pub struct Evolution {
    config: GaConfig,
    instance: TspInstance,
    population: Population,
    best_tour: Tour,
    best_cost: u64,
    generation: usize,
    rng: ChaCha8Rng,
}

impl Evolution {
    /// Create the orchestrator: validate the configuration, seed the
    /// generator, and build the initial ranked population. The best member of
    /// the initial population seeds the best-so-far state.
    pub fn new(instance: TspInstance, config: GaConfig) -> Result<Self, String> {
        config.validate(instance.dimension)?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut population = Population::new(
            &instance,
            config.population_size,
            config.start_node,
            &mut rng,
        )?;
        population.rank();

        let best_tour = population.best().clone();
        let best_cost = best_tour.cost();

        Ok(Evolution {
            config,
            instance,
            population,
            best_tour,
            best_cost,
            generation: 0,
            rng,
        })
    }

    /// Run one generation: replenish, re-rank, breed, mutate, re-rank, and
    /// update the best-so-far on strict improvement.
    fn evolve(&mut self) -> Result<(), String> {
        // Replace the costliest suffix with fresh random tours. The
        // new-gene rate is the replaced fraction, so the preserved fraction
        // is its complement.
        self.population.introduce_new_genes(
            &self.instance,
            1.0 - self.config.new_gene_rate,
            &mut self.rng,
        )?;

        self.population.rank();
        let candidates = self.population.candidate_indices();
        let mut consumed: HashSet<usize> = HashSet::new();

        // Offspring overwrite the current worst slots, filled inward from
        // the tail. Config validation keeps these clear of the elite prefix.
        let last = self.population.len() - 1;
        for breed in 0..self.config.breed_count {
            let (first, second) = select_parents(&candidates, &mut consumed, &mut self.rng)?;
            let (child1, child2) = order_crossover(
                &self.instance,
                self.population.get(first),
                self.population.get(second),
                &mut self.rng,
            )?;

            self.population.set(last - 2 * breed, child1);
            self.population.set(last - 2 * breed - 1, child2);
        }

        swap_mutation(
            &mut self.population,
            &self.instance,
            self.config.mutation_rate,
            &mut self.rng,
        )?;

        self.population.rank();
        let generation_best = self.population.best();
        if generation_best.cost() < self.best_cost {
            self.best_tour = generation_best.clone();
            self.best_cost = generation_best.cost();
        }

        self.generation += 1;
        Ok(())
    }

    /// Run the full generation count and return the best solution found
    pub fn run(&mut self) -> Result<SolutionSummary, String> {
        let start = Instant::now();

        for _ in 0..self.config.num_generations {
            self.evolve()?;

            println!(
                "[GA] Gen {}  best cost {}  tour {:?}",
                self.generation,
                self.best_cost,
                self.best_tour.nodes()
            );
        }

        Ok(SolutionSummary {
            tour: self.best_tour.nodes().iter().map(|&n| n + 1).collect(),
            cost: self.best_cost,
            generations: self.generation,
            computation_time: start.elapsed().as_secs_f64(),
            algorithm: "GeneticAlgorithm".to_string(),
        })
    }

    /// Best tour found so far
    pub fn best_tour(&self) -> &Tour {
        &self.best_tour
    }

    /// Cost of the best tour found so far
    pub fn best_cost(&self) -> u64 {
        self.best_cost
    }

    /// Generations executed so far
    pub fn current_generation(&self) -> usize {
        self.generation
    }
}
