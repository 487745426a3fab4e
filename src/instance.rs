//! Module for parsing and representing TSP cost-matrix instances.
//!
//! An instance file contains one whitespace-separated row of non-negative
//! integers per node, forming an N x N cost matrix. Node identifiers are
//! 1-based in files and on the command line; everything internal is 0-based.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Represents a complete TSP instance backed by an integer cost matrix
#[derive(Debug, Clone)]
pub struct TspInstance {
    /// Name of the instance
    pub name: String,
    /// Number of nodes
    pub dimension: usize,
    /// Cost matrix, indexed [from][to] with 0-based node indices
    matrix: Vec<Vec<u64>>,
}

impl TspInstance {
    /// Parse a TSP instance from a cost-matrix file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let file = File::open(&path)
            .map_err(|e| format!("Cannot open file: {}", e))?;
        let reader = BufReader::new(file);

        let mut matrix: Vec<Vec<u64>> = Vec::new();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Read error: {}", e))?;
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            let row = line
                .split_whitespace()
                .map(|tok| {
                    tok.parse::<u64>().map_err(|_| {
                        format!("Invalid cost '{}' on line {}", tok, line_no + 1)
                    })
                })
                .collect::<Result<Vec<u64>, String>>()?;

            matrix.push(row);
        }

        let name = path
            .as_ref()
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unnamed")
            .to_string();

        Self::from_matrix(name, matrix)
    }

    /// Build an instance from an in-memory matrix, validating its shape
    pub fn from_matrix(name: impl Into<String>, matrix: Vec<Vec<u64>>) -> Result<Self, String> {
        let dimension = matrix.len();

        if dimension < 2 {
            return Err(format!(
                "Instance must have at least 2 nodes, got {}",
                dimension
            ));
        }

        for (i, row) in matrix.iter().enumerate() {
            if row.len() != dimension {
                return Err(format!(
                    "Matrix is not square: row {} has {} entries, expected {}",
                    i + 1,
                    row.len(),
                    dimension
                ));
            }
        }

        Ok(TspInstance {
            name: name.into(),
            dimension,
            matrix,
        })
    }

    /// Get the cost of traveling between two nodes (0-based indices)
    #[inline]
    pub fn cost(&self, i: usize, j: usize) -> u64 {
        self.matrix[i][j]
    }

    /// Total cost of a tour given as a node sequence, summed over consecutive
    /// pairs. A closed tour stored as `[start, .., start]` already carries its
    /// closing edge, so no wrap-around term is added here.
    pub fn tour_cost(&self, tour: &[usize]) -> u64 {
        tour.windows(2).map(|pair| self.cost(pair[0], pair[1])).sum()
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> InstanceStatistics {
        let mut costs: Vec<u64> = Vec::new();
        for i in 0..self.dimension {
            for j in 0..self.dimension {
                if i != j {
                    costs.push(self.cost(i, j));
                }
            }
        }

        let min_cost = costs.iter().copied().min().unwrap_or(0);
        let max_cost = costs.iter().copied().max().unwrap_or(0);
        let avg_cost = costs.iter().sum::<u64>() as f64 / costs.len() as f64;

        InstanceStatistics {
            name: self.name.clone(),
            dimension: self.dimension,
            min_cost,
            max_cost,
            avg_cost,
        }
    }
}

/// Statistics about a TSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub dimension: usize,
    pub min_cost: u64,
    pub max_cost: u64,
    pub avg_cost: f64,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Nodes: {}", self.dimension)?;
        writeln!(f, "  Min cost: {}", self.min_cost)?;
        writeln!(f, "  Max cost: {}", self.max_cost)?;
        writeln!(f, "  Avg cost: {:.2}", self.avg_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_instance(name: &str, contents: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("tsp-ga-solver-tests");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_from_file_parses_matrix() {
        let path = write_temp_instance(
            "ok.txt",
            "0 1 2 3\n1 0 4 5\n\n2 4 0 6\n3 5 6 0\n",
        );

        let instance = TspInstance::from_file(&path).unwrap();

        // Blank lines are skipped; the matrix shape and entries survive.
        assert_eq!(instance.dimension, 4);
        assert_eq!(instance.cost(1, 2), 4);
        assert_eq!(instance.name, "ok");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_from_file_rejects_non_numeric_entry() {
        let path = write_temp_instance("bad-entry.txt", "0 1\nx 0\n");

        let err = TspInstance::from_file(&path).unwrap_err();
        assert!(err.contains("Invalid cost 'x'"));
        assert!(err.contains("line 2"));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_from_file_rejects_negative_entry() {
        let path = write_temp_instance("negative.txt", "0 1\n-1 0\n");

        let err = TspInstance::from_file(&path).unwrap_err();
        assert!(err.contains("Invalid cost '-1'"));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_from_file_rejects_missing_file() {
        let path = std::env::temp_dir().join("tsp-ga-solver-does-not-exist.txt");

        let err = TspInstance::from_file(&path).unwrap_err();
        assert!(err.contains("Cannot open file"));
    }

    #[test]
    fn test_from_file_rejects_ragged_rows() {
        let path = write_temp_instance("ragged.txt", "0 1 2\n1 0\n2 3 0\n");

        let err = TspInstance::from_file(&path).unwrap_err();
        assert!(err.contains("not square"));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_from_matrix_accepts_square() {
        let instance = TspInstance::from_matrix(
            "test",
            vec![vec![0, 1], vec![1, 0]],
        )
        .unwrap();

        assert_eq!(instance.dimension, 2);
        assert_eq!(instance.cost(0, 1), 1);
    }

    #[test]
    fn test_from_matrix_rejects_non_square() {
        let result = TspInstance::from_matrix(
            "bad",
            vec![vec![0, 1, 2], vec![1, 0], vec![2, 3, 0]],
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_from_matrix_rejects_too_small() {
        assert!(TspInstance::from_matrix("empty", vec![]).is_err());
        assert!(TspInstance::from_matrix("single", vec![vec![0]]).is_err());
    }

    #[test]
    fn test_tour_cost_matches_manual_sum() {
        let instance = TspInstance::from_matrix(
            "test",
            vec![
                vec![0, 1, 2, 3],
                vec![1, 0, 4, 5],
                vec![2, 4, 0, 6],
                vec![3, 5, 6, 0],
            ],
        )
        .unwrap();

        // 0 -> 1 -> 2 -> 3 -> 0 : 1 + 4 + 6 + 3
        assert_eq!(instance.tour_cost(&[0, 1, 2, 3, 0]), 14);
        // 0 -> 2 -> 1 -> 3 -> 0 : 2 + 4 + 5 + 3
        assert_eq!(instance.tour_cost(&[0, 2, 1, 3, 0]), 14);
    }
}
