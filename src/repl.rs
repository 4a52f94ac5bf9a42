//! REPL (Read-Eval-Print-Loop) for hexcast.
//!
//! Interactive shell for casting patterns one at a time against a
//! persistent `Vm`.

use std::io::{self, Write};

use hexcast::env::{DefaultEnvironment, VmConfig};
use hexcast::hexgrid::HexPattern;
use hexcast::registry;
use hexcast::vm::Vm;

/// Interactive REPL for hexcast.
pub struct Repl {
    config: VmConfig,
    vm: Vm,
    env: DefaultEnvironment,
    history: Vec<String>,
}

impl Repl {
    pub fn new(config: VmConfig) -> Self {
        let env = DefaultEnvironment::new(config.caster_name.clone());
        Repl {
            config,
            vm: Vm::new(),
            env,
            history: Vec::new(),
        }
    }

    /// Run the interactive REPL until EOF or `:quit`.
    pub fn run(&mut self) {
        println!("hexcast REPL");
        println!("Type a pattern as `dir,angles` (e.g. `west,qqq`), :help for commands, :quit to exit");
        println!();

        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut input = String::new();

        loop {
            print!("hex> ");
            let _ = stdout.flush();

            input.clear();
            match stdin.read_line(&mut input) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }

            let line = input.trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with(':') {
                if self.handle_command(line) {
                    break;
                }
                continue;
            }

            self.eval(line);
            self.history.push(line.to_string());
        }

        println!("\nGoodbye!");
    }

    /// Handle a `:`-prefixed command. Returns `true` if the REPL should quit.
    fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            ":quit" | ":q" => return true,
            ":help" | ":h" => {
                println!("Commands:");
                println!("  :quit, :q     Exit the REPL");
                println!("  :help, :h     Show this help");
                println!("  :stack, :s    Show the current stack");
                println!("  :reset        Reset the VM to a fresh state");
                println!("  :history      Show command history");
                println!();
                println!("Enter a Hex pattern (`dir,angles`) to cast it.");
            }
            ":stack" | ":s" => self.show_stack(),
            ":reset" => {
                self.vm = Vm::new();
                self.env = DefaultEnvironment::new(self.config.caster_name.clone());
                println!("VM reset.");
            }
            ":history" => {
                for (i, line) in self.history.iter().enumerate() {
                    println!("{}: {}", i + 1, line);
                }
            }
            _ => println!("Unknown command: {cmd}"),
        }
        false
    }

    /// Parse and cast one pattern line against the persistent VM.
    fn eval(&mut self, line: &str) {
        let shape = match HexPattern::parse(line) {
            Ok(shape) => shape,
            Err(e) => {
                println!("parse error: {e}");
                return;
            }
        };

        let iota = match registry::lookup(&shape) {
            Some(iota) => iota,
            None => {
                println!("no built-in action has shape {shape}");
                return;
            }
        };

        let results = self
            .vm
            .run_bounded(&mut self.env, [iota], self.config.max_steps);
        for r in &results {
            if let Some(m) = &r.mishap {
                println!("mishap: {m}");
            }
        }

        self.show_stack();
    }

    fn show_stack(&self) {
        if self.vm.stack.is_empty() {
            println!("stack: (empty)");
        } else {
            println!("stack:");
            for iota in &self.vm.stack {
                println!("  {iota}");
            }
        }
    }
}
