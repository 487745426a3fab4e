//! Population of candidate tours.
//!
//! The population has a fixed size for the whole run. Order is meaningful
//! only immediately after [`Population::rank`]; between ranking steps it is
//! unspecified and must not be relied upon.

use crate::instance::TspInstance;
use crate::tour::Tour;
use rand::Rng;

/// Tier boundaries for the replicated candidate list: the best 30% of ranked
/// positions are replicated four times, the middle 40% three times, the worst
/// 30% once. Uniform draws from the replicated list approximate
/// roulette-wheel selection without computing fitness weights.
const ELITE_TIER: f64 = 0.3;
const MIDDLE_TIER: f64 = 0.7;
const ELITE_COPIES: usize = 4;
const MIDDLE_COPIES: usize = 3;

/// A fixed-size collection of tours sharing one start node and cost matrix
#[derive(Debug, Clone)]
pub struct Population {
    tours: Vec<Tour>,
    start_node: usize,
}

impl Population {
    /// Create a population of `size` random tours
    pub fn new(
        instance: &TspInstance,
        size: usize,
        start_node: usize,
        rng: &mut impl Rng,
    ) -> Result<Self, String> {
        if size == 0 {
            return Err("Population size must be at least 1".to_string());
        }
        if start_node >= instance.dimension {
            return Err(format!(
                "Start node {} out of range for {} nodes",
                start_node, instance.dimension
            ));
        }

        let mut tours = Vec::with_capacity(size);
        for _ in 0..size {
            tours.push(Tour::random(instance, start_node, rng)?);
        }

        Ok(Population { tours, start_node })
    }

    /// Number of tours; constant across generations
    pub fn len(&self) -> usize {
        self.tours.len()
    }

    /// Shared start node of every member tour
    pub fn start_node(&self) -> usize {
        self.start_node
    }

    /// Get a tour by index. Out-of-range access is a programming error.
    pub fn get(&self, index: usize) -> &Tour {
        assert!(index < self.tours.len(), "tour index {} out of range", index);
        &self.tours[index]
    }

    /// Mutable access to a tour by index
    pub fn get_mut(&mut self, index: usize) -> &mut Tour {
        assert!(index < self.tours.len(), "tour index {} out of range", index);
        &mut self.tours[index]
    }

    /// Replace the tour at `index`
    pub fn set(&mut self, index: usize, tour: Tour) {
        assert!(index < self.tours.len(), "tour index {} out of range", index);
        self.tours[index] = tour;
    }

    /// Sort all tours ascending by cost. Stable, so equal-cost order is
    /// deterministic for a given input order.
    pub fn rank(&mut self) {
        self.tours.sort_by_key(|tour| tour.cost());
    }

    /// Best (lowest-cost) tour. Only meaningful right after [`rank`].
    ///
    /// [`rank`]: Population::rank
    pub fn best(&self) -> &Tour {
        &self.tours[0]
    }

    /// Replace the costliest suffix of a ranked population with fresh random
    /// tours. `save_rate` is the fraction of ranked positions preserved:
    /// every index at or above `floor(len * save_rate)` is regenerated, so
    /// 1.0 replaces nothing and 0.0 replaces everything. Rates outside [0, 1]
    /// are clamped.
    pub fn introduce_new_genes(
        &mut self,
        instance: &TspInstance,
        save_rate: f64,
        rng: &mut impl Rng,
    ) -> Result<(), String> {
        let save_rate = save_rate.clamp(0.0, 1.0);
        let save_index = (self.tours.len() as f64 * save_rate).floor() as usize;

        for index in save_index..self.tours.len() {
            self.tours[index] = Tour::random(instance, self.start_node, rng)?;
        }

        Ok(())
    }

    /// Build the replicated candidate list over a ranked population: a list
    /// of population indices where better-ranked positions appear more often.
    pub fn candidate_indices(&self) -> Vec<usize> {
        let n = self.tours.len();
        let elite_end = (n as f64 * ELITE_TIER).floor() as usize;
        let middle_end = (n as f64 * MIDDLE_TIER).floor() as usize;

        let mut candidates = Vec::with_capacity(n * ELITE_COPIES);

        for index in 0..elite_end {
            for _ in 0..ELITE_COPIES {
                candidates.push(index);
            }
        }
        for index in elite_end..middle_end {
            for _ in 0..MIDDLE_COPIES {
                candidates.push(index);
            }
        }
        for index in middle_end..n {
            candidates.push(index);
        }

        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn test_instance() -> TspInstance {
        TspInstance::from_matrix(
            "test",
            vec![
                vec![0, 1, 2, 3, 7],
                vec![1, 0, 4, 5, 2],
                vec![2, 4, 0, 6, 3],
                vec![3, 5, 6, 0, 9],
                vec![7, 2, 3, 9, 0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_new_population_holds_valid_tours() {
        let instance = test_instance();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let population = Population::new(&instance, 12, 0, &mut rng).unwrap();

        assert_eq!(population.len(), 12);
        for i in 0..population.len() {
            assert!(population.get(i).is_valid(instance.dimension, 0));
        }
    }

    #[test]
    fn test_new_rejects_bad_start_node() {
        let instance = test_instance();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!(Population::new(&instance, 10, 5, &mut rng).is_err());
    }

    #[test]
    fn test_rank_sorts_ascending_by_cost() {
        let instance = test_instance();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut population = Population::new(&instance, 20, 0, &mut rng).unwrap();

        population.rank();

        for i in 1..population.len() {
            assert!(population.get(i - 1).cost() <= population.get(i).cost());
        }
        assert_eq!(population.best().cost(), population.get(0).cost());
    }

    #[test]
    fn test_introduce_new_genes_preserves_elite_prefix() {
        let instance = test_instance();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut population = Population::new(&instance, 10, 0, &mut rng).unwrap();
        population.rank();

        let save_rate = 0.5;
        let save_index = (population.len() as f64 * save_rate).floor() as usize;
        let elite_before: Vec<Vec<usize>> = (0..save_index)
            .map(|i| population.get(i).nodes().to_vec())
            .collect();

        population
            .introduce_new_genes(&instance, save_rate, &mut rng)
            .unwrap();

        for (i, before) in elite_before.iter().enumerate() {
            assert_eq!(population.get(i).nodes(), &before[..]);
        }
        for i in save_index..population.len() {
            assert!(population.get(i).is_valid(instance.dimension, 0));
        }
    }

    #[test]
    fn test_introduce_new_genes_clamps_rate() {
        let instance = test_instance();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut population = Population::new(&instance, 6, 0, &mut rng).unwrap();
        population.rank();

        let before: Vec<Vec<usize>> = (0..population.len())
            .map(|i| population.get(i).nodes().to_vec())
            .collect();

        // Above 1.0 clamps to 1.0: nothing is replaced.
        population
            .introduce_new_genes(&instance, 2.0, &mut rng)
            .unwrap();
        for (i, b) in before.iter().enumerate() {
            assert_eq!(population.get(i).nodes(), &b[..]);
        }
    }

    #[test]
    fn test_candidate_indices_tier_replication() {
        let instance = test_instance();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut population = Population::new(&instance, 10, 0, &mut rng).unwrap();
        population.rank();

        let candidates = population.candidate_indices();

        // 10 tours: elite 0..3 x4, middle 3..7 x3, worst 7..10 x1.
        assert_eq!(candidates.len(), 3 * 4 + 4 * 3 + 3);
        assert_eq!(candidates.iter().filter(|&&i| i == 0).count(), 4);
        assert_eq!(candidates.iter().filter(|&&i| i == 3).count(), 3);
        assert_eq!(candidates.iter().filter(|&&i| i == 9).count(), 1);
    }

    #[test]
    #[should_panic]
    fn test_get_out_of_range_panics() {
        let instance = test_instance();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let population = Population::new(&instance, 4, 0, &mut rng).unwrap();
        population.get(4);
    }
}
