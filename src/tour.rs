//! Tour representation and construction.
//!
//! A tour is a candidate solution: a closed route visiting every node exactly
//! once, starting and ending at a fixed start node, together with its total
//! cost under the instance's cost matrix.

use crate::instance::TspInstance;
use rand::Rng;

/// Attempt cap for the rejection-sampling loop that fills a random interior.
/// Exceeding it indicates a pathological instance, not a transient condition.
const MAX_DRAW_ATTEMPTS: usize = 100_000;

/// A closed tour `[start, p_1, .., p_{n-1}, start]` with its cached cost
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour {
    nodes: Vec<usize>,
    cost: u64,
}

impl Tour {
    /// Build a uniformly random tour by rejection sampling: draw candidate
    /// nodes uniformly and accept each one not already in the sequence, until
    /// the interior holds every non-start node.
    pub fn random(
        instance: &TspInstance,
        start_node: usize,
        rng: &mut impl Rng,
    ) -> Result<Self, String> {
        let n = instance.dimension;
        assert!(start_node < n, "start node {} out of range 0..{}", start_node, n);

        let mut nodes = Vec::with_capacity(n + 1);
        nodes.push(start_node);

        let mut seen = vec![false; n];
        seen[start_node] = true;

        let mut attempts = 0;
        while nodes.len() < n {
            let candidate = rng.gen_range(0..n);
            if !seen[candidate] {
                seen[candidate] = true;
                nodes.push(candidate);
            } else {
                attempts += 1;
                if attempts > MAX_DRAW_ATTEMPTS {
                    return Err(format!(
                        "Random tour construction exceeded {} draw attempts (dimension {})",
                        MAX_DRAW_ATTEMPTS, n
                    ));
                }
            }
        }

        nodes.push(start_node);
        let cost = instance.tour_cost(&nodes);

        Ok(Tour { nodes, cost })
    }

    /// Build a tour from an explicit node sequence. The caller guarantees the
    /// sequence is a valid closed tour; cost is computed here.
    pub fn from_nodes(instance: &TspInstance, nodes: Vec<usize>) -> Self {
        let cost = instance.tour_cost(&nodes);
        Tour { nodes, cost }
    }

    /// Full node sequence, including the closing start node
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Interior sequence: every node except the leading/trailing start node
    pub fn interior(&self) -> &[usize] {
        &self.nodes[1..self.nodes.len() - 1]
    }

    /// The fixed start (and end) node of the tour
    pub fn start_node(&self) -> usize {
        self.nodes[0]
    }

    /// Cached total cost of the tour
    pub fn cost(&self) -> u64 {
        self.cost
    }

    /// Swap two interior positions and refresh the cached cost. Positions are
    /// indices into the full sequence and must lie strictly between the fixed
    /// endpoints.
    pub fn swap_interior(&mut self, instance: &TspInstance, i: usize, j: usize) {
        let last = self.nodes.len() - 1;
        assert!(i > 0 && i < last, "position {} is not interior", i);
        assert!(j > 0 && j < last, "position {} is not interior", j);

        self.nodes.swap(i, j);
        self.cost = instance.tour_cost(&self.nodes);
    }

    /// Check the tour invariant: starts and ends at `start_node`, has length
    /// dimension + 1, and its interior is a permutation of all other nodes.
    pub fn is_valid(&self, dimension: usize, start_node: usize) -> bool {
        if self.nodes.len() != dimension + 1 {
            return false;
        }
        if self.nodes[0] != start_node || self.nodes[dimension] != start_node {
            return false;
        }

        let mut seen = vec![false; dimension];
        seen[start_node] = true;
        for &node in self.interior() {
            if node >= dimension || seen[node] {
                return false;
            }
            seen[node] = true;
        }

        seen.into_iter().all(|s| s)
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
                vec![0, 1, 2, 3],
                vec![1, 0, 4, 5],
                vec![2, 4, 0, 6],
                vec![3, 5, 6, 0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_random_tour_is_valid_permutation() {
        let instance = test_instance();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for start in 0..instance.dimension {
            for _ in 0..20 {
                let tour = Tour::random(&instance, start, &mut rng).unwrap();
                assert!(tour.is_valid(instance.dimension, start));
                assert_eq!(tour.nodes().len(), instance.dimension + 1);
            }
        }
    }

    #[test]
    fn test_cost_cached_at_construction() {
        let instance = test_instance();
        let tour = Tour::from_nodes(&instance, vec![0, 1, 2, 3, 0]);

        assert_eq!(tour.cost(), 14);
        assert_eq!(tour.cost(), instance.tour_cost(tour.nodes()));
    }

    #[test]
    fn test_swap_interior_preserves_node_set_and_refreshes_cost() {
        let instance = test_instance();
        let mut tour = Tour::from_nodes(&instance, vec![0, 1, 2, 3, 0]);

        tour.swap_interior(&instance, 1, 3);

        assert_eq!(tour.nodes(), &[0, 3, 2, 1, 0]);
        assert!(tour.is_valid(instance.dimension, 0));
        assert_eq!(tour.cost(), instance.tour_cost(tour.nodes()));
    }

    #[test]
    #[should_panic]
    fn test_swap_endpoint_position_panics() {
        let instance = test_instance();
        let mut tour = Tour::from_nodes(&instance, vec![0, 1, 2, 3, 0]);
        tour.swap_interior(&instance, 0, 2);
    }

    #[test]
    fn test_is_valid_rejects_duplicates_and_wrong_endpoints() {
        let instance = test_instance();

        let duplicated = Tour::from_nodes(&instance, vec![0, 1, 1, 3, 0]);
        assert!(!duplicated.is_valid(instance.dimension, 0));

        let open = Tour::from_nodes(&instance, vec![0, 1, 2, 3, 1]);
        assert!(!open.is_valid(instance.dimension, 0));
    }
}
