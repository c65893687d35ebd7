use std::io;
use std::process;

use chrono::Local;
use clap::Parser;
use crossterm::{cursor, execute, terminal};
use tracing::warn;

use sbat::cli::{self, CliArgs};
use sbat::config::{resolve_script_dir, Config};
use sbat::script::{Host, Interpreter, Invocation, LogLevel, Program};

/// Host for terminal use: script log lines go to stdout, warnings and errors
/// to stderr, `EXE` runs through `sh -c`.
struct ConsoleHost {
    runtime: tokio::runtime::Handle,
}

impl Host for ConsoleHost {
    fn log(&mut self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Info => println!("{message}"),
            LogLevel::Warning => eprintln!("warning: {message}"),
            LogLevel::Error => eprintln!("error: {message}"),
        }
    }

    fn execute(&mut self, command: &str) {
        let result = self.runtime.block_on(
            tokio::process::Command::new("sh")
                .arg("-c")
                .arg(command)
                .output(),
        );
        match result {
            Ok(out) => {
                let combined = [out.stdout.as_slice(), out.stderr.as_slice()].concat();
                for line in String::from_utf8_lossy(&combined).lines() {
                    println!("{line}");
                }
                if !out.status.success() {
                    warn!(command, status = %out.status, "EXE command failed");
                }
            }
            Err(e) => self.log(LogLevel::Error, &format!("EXE {command}: {e}")),
        }
    }

    fn clear_log(&mut self) {
        if let Err(e) = execute!(
            io::stdout(),
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0)
        ) {
            warn!(error = %e, "cannot clear terminal");
        }
    }
}

#[tokio::main]
async fn main() {
    cli::init_logging();
    let args = CliArgs::parse();

    let invocation = Invocation::parse(&args.invocation_text());
    let name = invocation.script_name();

    // ── Locate the program ────────────────────────────────────────────────────
    let config = Config::new(resolve_script_dir(args.dir.as_deref()))
        .with_environment(args.environment(Local::now().naive_local()));
    if let Err(e) = config.ensure_script_dir() {
        eprintln!("sbat: cannot create {}: {e}", config.script_dir.display());
        process::exit(1);
    }
    let path = config.script_path(&name);
    let source = match tokio::fs::read_to_string(&path).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("sbat: Simple Batch program \"{name}\" not found ({}): {e}", path.display());
            process::exit(1);
        }
    };
    let program = Program::new(&source);

    // ── Run ───────────────────────────────────────────────────────────────────
    // The interpreter is synchronous; EXE blocks on the runtime handle.
    let runtime = tokio::runtime::Handle::current();
    let environment = config.environment.clone();
    let seed = args.seed;
    let result = tokio::task::spawn_blocking(move || {
        let mut host = ConsoleHost { runtime };
        let mut interp = Interpreter::new(&mut host).with_environment(environment);
        if let Some(seed) = seed {
            interp = interp.with_seed(seed);
        }
        interp.run(&program, &invocation)
    })
    .await;

    match result {
        Ok(Ok(report)) => {
            println!(
                "Execution of Simple Batch Program \"{name}\" completed in {} ms",
                report.elapsed.as_millis()
            );
            if args.dump_memory {
                println!("{}", report.memory.dump());
            }
        }
        Ok(Err(e)) => {
            eprintln!("sbat: {name}: {e}");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("sbat: interpreter task failed: {e}");
            process::exit(1);
        }
    }
}
