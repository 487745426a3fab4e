//! Genetic TSP Solver - Command Line Interface
//!
//! Solves cost-matrix TSP instances with a generational genetic algorithm.

use clap::{Parser, Subcommand};
use tsp_ga_solver::genetic::{Evolution, GaConfig};
use tsp_ga_solver::instance::TspInstance;

use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tsp-ga-solver")]
#[command(version = "1.0")]
#[command(about = "A genetic algorithm solver for cost-matrix TSP instances")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve an instance with the genetic algorithm
    Solve {
        /// Path to the cost-matrix file
        #[arg(short, long)]
        instance: PathBuf,

        /// Population size
        #[arg(short, long, default_value = "50")]
        population_size: usize,

        /// Start node (1-based, as written in the instance file)
        #[arg(long, default_value = "1")]
        start_node: usize,

        /// Number of generations
        #[arg(short, long, default_value = "200")]
        generations: usize,

        /// Fraction of the population replaced by fresh random tours each generation
        #[arg(long, default_value = "0.3")]
        new_gene_rate: f64,

        /// Breed operations per generation (each writes two offspring)
        #[arg(long, default_value = "10")]
        breed_count: usize,

        /// Fraction of the population mutated each generation
        #[arg(long, default_value = "0.1")]
        mutation_rate: f64,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Output solution to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze an instance
    Analyze {
        /// Path to the cost-matrix file
        #[arg(short, long)]
        instance: PathBuf,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            instance,
            population_size,
            start_node,
            generations,
            new_gene_rate,
            breed_count,
            mutation_rate,
            seed,
            output,
            verbose,
        } => {
            solve_instance(
                &instance,
                population_size,
                start_node,
                generations,
                new_gene_rate,
                breed_count,
                mutation_rate,
                seed,
                output,
                verbose,
            );
        }

        Commands::Analyze { instance } => {
            analyze_instance(&instance);
        }
    }
}

fn solve_instance(
    path: &PathBuf,
    population_size: usize,
    start_node: usize,
    generations: usize,
    new_gene_rate: f64,
    breed_count: usize,
    mutation_rate: f64,
    seed: u64,
    output: Option<PathBuf>,
    verbose: bool,
) {
    println!("Loading instance from {:?}...", path);

    let instance = match TspInstance::from_file(path) {
        Ok(inst) => inst,
        Err(e) => {
            eprintln!("Error loading instance: {}", e);
            std::process::exit(1);
        }
    };

    log::info!(
        "Loaded instance '{}' with {} nodes",
        instance.name,
        instance.dimension
    );

    if verbose {
        println!("{}", instance.statistics());
    }

    // Node identifiers are 1-based on the command line.
    if start_node == 0 {
        eprintln!("Error: start node is 1-based and must be at least 1");
        std::process::exit(1);
    }

    let config = GaConfig {
        population_size,
        num_generations: generations,
        start_node: start_node - 1,
        new_gene_rate,
        breed_count,
        mutation_rate,
        seed,
    };

    let mut evolution = match Evolution::new(instance, config) {
        Ok(evolution) => evolution,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    println!("Solving with genetic algorithm...");

    let solution = match evolution.run() {
        Ok(solution) => solution,
        Err(e) => {
            eprintln!("Run failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("\n{}", solution);

    if let Some(output_path) = output {
        match serde_json::to_string_pretty(&solution) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&output_path, json) {
                    eprintln!("Error writing solution to {:?}: {}", output_path, e);
                } else {
                    println!("Solution written to {:?}", output_path);
                }
            }
            Err(e) => eprintln!("Error serializing solution: {}", e),
        }
    }
}

fn analyze_instance(path: &PathBuf) {
    let instance = match TspInstance::from_file(path) {
        Ok(inst) => inst,
        Err(e) => {
            eprintln!("Error loading instance: {}", e);
            std::process::exit(1);
        }
    };

    println!("{}", instance.statistics());
}
