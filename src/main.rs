use clap::Parser;
use std::fs;
use std::time::Duration;

use qlab::unitary::{dense_unitary, sparse_unitary, DENSE_DIM_LIMIT, SPARSE_EPS};
use qlab::{Circuit, SimEvent, Simulator};

const QLAB_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "qlab", version = QLAB_VERSION,
    about = "qlab - a layered quantum-circuit simulator for teaching tools.\n\
             Use 'qlab help <command>' for more information on a specific command.",
    long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Runs a circuit description (.json) to completion and prints the
    /// final probabilities and measurement outcomes.
    Run {
        /// Circuit .json file path
        circuit: String,
        /// Seed for reproducible measurement draws; entropy-backed when omitted.
        #[arg(long)]
        seed: Option<u64>,
        /// Delay between layers in milliseconds, for watching a run unfold.
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,
        /// Enable debug mode: print the state norm after every layer.
        #[arg(long)]
        debug: bool,
    },
    /// Prints the whole-circuit unitary, dense or as sparse row,col,re,im lines.
    Unitary {
        /// Circuit .json file path
        circuit: String,
        /// Magnitude floor for sparse entries.
        #[arg(long, default_value_t = SPARSE_EPS)]
        eps: f64,
        /// Force the sparse listing even for small registers.
        #[arg(long)]
        sparse: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Run {
            circuit,
            seed,
            delay_ms,
            debug,
        } => cmd_run(&circuit, seed, delay_ms, debug),
        Commands::Unitary {
            circuit,
            eps,
            sparse,
        } => cmd_unitary(&circuit, eps, sparse),
    };
    if let Err(e) = outcome {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn load_circuit(path: &str) -> Result<Circuit, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)?;
    Ok(Circuit::from_json(&json)?)
}

fn cmd_run(
    path: &str,
    seed: Option<u64>,
    delay_ms: u64,
    debug_mode: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let circuit = load_circuit(path)?;
    let mut sim = match seed {
        Some(s) => Simulator::with_seed(circuit, s),
        None => Simulator::new(circuit),
    };
    sim.on(Box::new(move |event: &SimEvent| {
        if let SimEvent::AfterStep { layer, state } = event {
            let norm: f64 = state.probabilities().iter().sum();
            if debug_mode {
                println!("layer {} done, norm {:.9}", layer, norm);
            }
            log::debug!("layer {} done, norm {:.9}", layer, norm);
        }
    }));

    loop {
        let more = sim.step();
        if delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(delay_ms));
        }
        if !more {
            break;
        }
    }

    let n = sim.state().num_qubits();
    println!("final state ({} qubits):", n);
    for (i, p) in sim.state().probabilities().iter().enumerate() {
        if *p > 1e-9 {
            println!("{:0width$b}: prob {:.6}", i, p, width = n);
        }
    }

    for (li, layer) in sim.circuit().layers().iter().enumerate() {
        for el in layer {
            if let Some(r) = el.result {
                println!("measurement in layer {} ({:?}): {}", li, el.kind, r);
            }
        }
    }
    Ok(())
}

fn cmd_unitary(path: &str, eps: f64, sparse: bool) -> Result<(), Box<dyn std::error::Error>> {
    let circuit = load_circuit(path)?;
    let dim = 1usize << circuit.num_qubits();
    if sparse || dim > DENSE_DIM_LIMIT {
        println!("row,col,re,im");
        for e in sparse_unitary(&circuit, eps) {
            println!("{},{},{},{}", e.row, e.col, e.re, e.im);
        }
    } else {
        let u = dense_unitary(&circuit);
        for r in 0..dim {
            let row: Vec<String> = (0..dim)
                .map(|c| format!("{:+.4}{:+.4}i", u[[r, c]].re, u[[r, c]].im))
                .collect();
            println!("{}", row.join("  "));
        }
    }
    Ok(())
}
