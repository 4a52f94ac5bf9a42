use std::fs;
use std::process::ExitCode;

use clap::Parser as ClapParser;

use hexcast::env::{DefaultEnvironment, VmConfig};
use hexcast::hexgrid::HexPattern;
use hexcast::iota::Iota;
use hexcast::registry;
use hexcast::vm::Vm;

mod repl;

/// Run a Hex pattern script, or drop into an interactive REPL if no file is
/// given.
#[derive(ClapParser, Debug)]
#[command(name = "hexcast", version, about)]
struct Cli {
    /// Path to a newline-separated pattern script (`dir,angles` per line).
    /// With no path, starts the REPL.
    script: Option<String>,

    /// Print every resolved CastResult as it happens.
    #[arg(short, long)]
    verbose: bool,

    /// Ceiling on frame-steps taken per run; 0 means unbounded.
    #[arg(long, default_value_t = 100_000)]
    max_steps: u64,

    /// Name of the caster entity `Mind's Reflection` returns.
    #[arg(long, default_value = "Caster")]
    caster: String,
}

fn main() -> ExitCode {
    hexcast::init_tracing();
    let cli = Cli::parse();

    let config = VmConfig {
        max_steps: if cli.max_steps == 0 { None } else { Some(cli.max_steps) },
        caster_name: cli.caster.clone(),
    };

    match cli.script {
        Some(path) => run_script(&path, &config, cli.verbose),
        None => {
            repl::Repl::new(config).run();
            ExitCode::SUCCESS
        }
    }
}

fn run_script(path: &str, config: &VmConfig, verbose: bool) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: could not read {path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut iotas = Vec::new();
    for (lineno, line) in source.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match HexPattern::parse(line) {
            Ok(shape) => match registry::lookup(&shape) {
                Some(iota) => iotas.push(iota),
                None => {
                    eprintln!("line {}: no built-in action has shape {line}", lineno + 1);
                    return ExitCode::FAILURE;
                }
            },
            Err(e) => {
                eprintln!("line {}: {e}", lineno + 1);
                return ExitCode::FAILURE;
            }
        }
    }

    let mut vm = Vm::new();
    let mut env = DefaultEnvironment::new(config.caster_name.clone());
    let results = vm.run_bounded(&mut env, iotas, config.max_steps);

    if verbose {
        for r in &results {
            println!("{:?} {} -> {}", r.resolution_type, r.cast, r.sound);
        }
    }

    let mut had_mishap = false;
    for r in &results {
        if let Some(m) = &r.mishap {
            eprintln!("mishap: {m}");
            had_mishap = true;
        }
    }

    print_stack(&vm.stack);
    if had_mishap {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_stack(stack: &[Iota]) {
    println!("stack ({} value(s), top last):", stack.len());
    for iota in stack {
        println!("  {iota}");
    }
}
