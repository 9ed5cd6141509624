//! tinyspice command-line interface.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use tinyspice_core::Circuit;
use tinyspice_solver::{solve_dc, DcParams, DcSolution};

#[derive(Parser)]
#[command(name = "tinyspice")]
#[command(about = "An educational SPICE-class DC circuit simulator", long_about = None)]
#[command(version)]
struct Cli {
    /// Input netlist file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Maximum Newton-Raphson iterations
    #[arg(long, default_value_t = 100)]
    max_iter: usize,

    /// Absolute convergence tolerance
    #[arg(long, default_value_t = 1e-9)]
    tol_abs: f64,

    /// Relative convergence tolerance
    #[arg(long, default_value_t = 1e-6)]
    tol_rel: f64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let circuit = tinyspice_parser::parse_file(&cli.input)
        .with_context(|| format!("failed to parse netlist: {}", cli.input.display()))?;

    if cli.verbose {
        print_summary(&circuit);
        println!();
    }

    let params = DcParams {
        max_iter: cli.max_iter,
        tol_abs: cli.tol_abs,
        tol_rel: cli.tol_rel,
    };
    let solution = solve_dc(&circuit, &params).context("DC analysis failed")?;

    if !solution.converged {
        anyhow::bail!(
            "DC analysis did not converge within {} iterations",
            params.max_iter
        );
    }

    if cli.verbose {
        println!("Converged in {} iteration(s)", solution.iterations);
        println!();
    }

    print_solution(&circuit, &solution);
    Ok(())
}

fn print_summary(circuit: &Circuit) {
    println!("Circuit summary:");
    println!("  Nodes: {} (including ground)", circuit.num_nodes());
    println!("  Devices: {}", circuit.num_devices());
    println!("  MNA variables: {}", circuit.num_vars());
    println!("  Extra variables: {}", circuit.num_extra_vars());
}

fn print_solution(circuit: &Circuit, solution: &DcSolution) {
    println!("DC solution:");
    for node in circuit.nodes() {
        match node.var_index() {
            None => println!("  V({}) = 0.000000 V  [ground]", node.name()),
            Some(i) => println!("  V({}) = {:.6} V", node.name(), solution.value(i)),
        }
    }
    for device in circuit.devices() {
        if let Some(k) = device.extra_var().index() {
            println!("  I({}) = {:.6} A", device.name(), solution.value(k));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_solve_print_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "* divider").unwrap();
        writeln!(file, "V1 vpos 0 5").unwrap();
        writeln!(file, "R1 vpos mid 1k").unwrap();
        writeln!(file, "R2 mid 0 1k").unwrap();
        file.flush().unwrap();

        let circuit = tinyspice_parser::parse_file(file.path()).unwrap();
        let solution = solve_dc(&circuit, &DcParams::default()).unwrap();
        assert!(solution.converged);

        print_summary(&circuit);
        print_solution(&circuit, &solution);

        let mid = circuit.get_node("mid").unwrap();
        assert!((solution.voltage(circuit.var_index(mid)) - 2.5).abs() < 1e-6);
    }
}
