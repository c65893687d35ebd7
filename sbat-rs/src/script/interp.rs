//! Simple Batch executor.
//!
//! An [`Interpreter`] is built around a [`Host`] and runs a [`Program`] for
//! one [`Invocation`] at a time.  Every run gets its own [`Memory`], program
//! counter, echo flag and random source, so runs never observe each other.
//!
//! Almost every command follows one addressing rule: a command with arity `k`
//! takes up to `k` explicit operands; when one is missing the register
//! supplies the leading operand, and an extra token after the operands names
//! the destination slot (the register when absent).

use std::time::{Duration, Instant};

use tracing::{debug, info, trace, warn};

use super::command::Command;
use super::escape::{self, EscapeMode};
use super::expand::{substitute, Subst};
use super::host::{Host, LogLevel};
use super::line::{self, Line};
use super::ops::{self, OpResult};
use super::rng::Rng;
use super::value::Value;
use crate::error::{ErrorKind, Result, ScriptError};
use crate::memory::{Environment, Memory, ARG_SLOTS};

// ── Program ───────────────────────────────────────────────────────────────────

/// The lines of a script, escaped, tokenized and classified once at load time.
#[derive(Debug, Clone)]
pub struct Program {
    lines: Vec<String>,
    parsed: Vec<Option<Line>>,
    commands: Vec<Option<Command>>,
}

impl Program {
    pub fn new(source: &str) -> Self {
        Self::from_lines(source.lines())
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        let parsed: Vec<Option<Line>> = lines
            .iter()
            .map(|l| line::tokenize(&escape::process(l, EscapeMode::Script)))
            .collect();
        let commands = parsed
            .iter()
            .map(|l| l.as_ref().and_then(|l| Command::lookup(&l.command)))
            .collect();
        Self {
            lines,
            parsed,
            commands,
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Source text of a line (0-based).
    pub fn source(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Tokenized form of a line; `None` when the line is not a command.
    pub fn line(&self, index: usize) -> Option<&Line> {
        self.parsed.get(index).and_then(Option::as_ref)
    }

    /// Command kind of a line; `None` for non-command lines and unknown keywords.
    pub fn command(&self, index: usize) -> Option<Command> {
        self.commands.get(index).copied().flatten()
    }

    fn is_command(&self, index: usize, command: Command) -> bool {
        self.command(index) == Some(command)
    }
}

// ── Invocation ────────────────────────────────────────────────────────────────

/// The arguments a script is started with: slot 0 is the script name (always
/// Text), slots 1-9 are optional values.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    args: Vec<Value>,
}

impl Invocation {
    /// Parse a host command line such as `HELLO, #Ada Lovelace#, 3`.
    pub fn parse(text: &str) -> Self {
        let escaped = escape::process(text, EscapeMode::Invocation);
        let tokens = line::split_args(&escaped, ARG_SLOTS);
        let name = tokens.first().map(String::as_str).unwrap_or("");
        let mut args = vec![Value::from_token(name, true)];
        args.extend(tokens.iter().skip(1).map(|t| Value::from_token(t, false)));
        Self { args }
    }

    /// Build an invocation directly; arguments past the ninth are dropped.
    pub fn new(script: impl Into<String>, args: impl IntoIterator<Item = Value>) -> Self {
        let mut all = vec![Value::Text(script.into())];
        all.extend(args.into_iter().take(ARG_SLOTS - 1));
        Self { args: all }
    }

    pub fn script_name(&self) -> String {
        self.args.first().map(Value::render).unwrap_or_default()
    }

    /// All supplied arguments, script name first.
    pub fn args(&self) -> &[Value] {
        &self.args
    }
}

// ── RunReport ─────────────────────────────────────────────────────────────────

/// What a completed run leaves behind.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub elapsed: Duration,
    /// Number of lines visited, including skipped and repeated ones.
    pub lines_executed: usize,
    /// Final memory, for inspection or [`Memory::dump`].
    pub memory: Memory,
}

// ── Interpreter ───────────────────────────────────────────────────────────────

/// The Simple Batch interpreter.
pub struct Interpreter<'h, H: Host + ?Sized> {
    host: &'h mut H,
    environment: Environment,
    seed: Option<u64>,
}

impl<'h, H: Host + ?Sized> Interpreter<'h, H> {
    pub fn new(host: &'h mut H) -> Self {
        Self {
            host,
            environment: Environment::default(),
            seed: None,
        }
    }

    /// Environment snapshot copied into slots 101-106 at the start of each run.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Fix the `RANDOM` seed; each run restarts from it.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run `program` to completion.  A fatal error aborts the run.
    pub fn run(&mut self, program: &Program, invocation: &Invocation) -> Result<RunReport> {
        let started = Instant::now();
        let script = invocation.script_name();
        info!(script = %script, args = ?&invocation.args()[1..], "executing Simple Batch program");

        let mut run = Run {
            program,
            memory: Memory::new(invocation.args(), &self.environment),
            echo: true,
            rng: self.seed.map(Rng::new).unwrap_or_else(Rng::from_clock),
            host: &mut *self.host,
        };
        let steps = run.execute()?;

        let elapsed = started.elapsed();
        info!(script = %script, elapsed_ms = elapsed.as_millis() as u64, steps, "execution completed");
        Ok(RunReport {
            elapsed,
            lines_executed: steps,
            memory: run.memory,
        })
    }
}

// ── Run state ─────────────────────────────────────────────────────────────────

/// What the program counter does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Next,
    /// Continue after the given line.
    Jump(usize),
    Halt,
}

type Step = std::result::Result<Flow, ErrorKind>;

struct Run<'a, H: Host + ?Sized> {
    program: &'a Program,
    memory: Memory,
    echo: bool,
    rng: Rng,
    host: &'a mut H,
}

impl<H: Host + ?Sized> Run<'_, H> {
    fn execute(&mut self) -> Result<usize> {
        let program = self.program;
        let mut pc = 0;
        let mut steps = 0;
        while pc < program.len() {
            steps += 1;
            let Some(line) = program.line(pc) else {
                trace!(line = pc + 1, "skipping non-command line");
                pc += 1;
                continue;
            };
            let flow = self
                .step(pc, line, program.command(pc))
                .map_err(|kind| ScriptError::new(pc + 1, line.command.to_ascii_uppercase(), kind))?;
            match flow {
                Flow::Next => pc += 1,
                Flow::Jump(target) => pc = target + 1,
                Flow::Halt => break,
            }
        }
        Ok(steps)
    }

    fn step(&mut self, pc: usize, line: &Line, command: Option<Command>) -> Step {
        let Some(command) = command else {
            warn!(line = pc + 1, command = %line.command, "unknown command");
            self.host.log(
                LogLevel::Error,
                &format!("\"{}\" is not a recognized Simple Batch command.", line.command),
            );
            return Ok(Flow::Next);
        };

        let args: Vec<Value> = line.args.iter().map(|t| Value::from_token(t, false)).collect();
        debug!(line = pc + 1, command = command.name(), argc = args.len(), "dispatch");
        let flow = self.dispatch(command, &args, pc)?;

        if self.echo {
            self.host.echo(&echo_line(&line.command, &args));
        }
        Ok(flow)
    }

    fn dispatch(&mut self, command: Command, args: &[Value], pc: usize) -> Step {
        use Subst::{Composite, Native};

        match command {
            Command::Var => {
                let (value, name) = match args {
                    [] => return Err(ErrorKind::ArgumentCount { given: 0 }),
                    [name] => (Value::Int(0), name),
                    [value, name, ..] => (self.resolve(value, Native)?, name),
                };
                self.memory.declare(&name.render(), value)?;
                Ok(Flow::Next)
            }
            Command::Set => {
                require(args, 1)?;
                self.unary(args, Native, |a| Ok(a.clone()))
            }
            Command::Stc => {
                require(args, 1)?;
                self.unary(args, Composite, |a| Ok(ops::to_text(a)))
            }

            Command::ToInt => self.unary(args, Native, ops::floor),
            Command::Rnd => self.unary(args, Native, ops::round),
            Command::Ceil => self.unary(args, Native, ops::ceil),
            Command::Char => self.unary(args, Native, ops::char_of),
            Command::Parse => self.unary(args, Composite, ops::parse_number),
            Command::Str => self.unary(args, Native, |a| Ok(ops::to_text(a))),
            Command::Hex => self.unary(args, Native, ops::hex),
            Command::Bin => self.unary(args, Native, ops::bin),

            Command::Add => self.binary(args, ops::add),
            Command::Sub => self.binary(args, ops::sub),
            Command::Mul => self.binary(args, ops::mul),
            Command::Div => self.binary(args, ops::div),
            Command::Mod => self.binary(args, ops::modulo),
            Command::Random => match args.len() {
                0 | 1 => {
                    let value = Value::Float(self.rng.unit());
                    self.store(args, 0, value)
                }
                _ => {
                    let [lo, hi] = self.operands(args, [Native, Native])?;
                    let value = ops::random_range(&lo, &hi, &mut self.rng)?;
                    self.store(args, 2, value)
                }
            },

            Command::Shl => self.binary(args, ops::shl),
            Command::Shr => self.binary(args, ops::shr),
            Command::INot => self.unary(args, Native, ops::inot),
            Command::IAnd => self.binary(args, ops::iand),
            Command::IOr => self.binary(args, ops::ior),
            Command::IXor => self.binary(args, ops::ixor),

            Command::IsTrue => self.unary(args, Native, |a| Ok(ops::is_true(a))),
            Command::IsFalse => self.unary(args, Native, |a| Ok(ops::is_false(a))),
            Command::And => self.binary(args, |a, b| Ok(ops::and(a, b))),
            Command::Or => self.binary(args, |a, b| Ok(ops::or(a, b))),
            Command::Xor => self.binary(args, |a, b| Ok(ops::xor(a, b))),

            Command::StrGet => {
                let [text, index] = self.operands(args, [Composite, Native])?;
                let value = ops::str_get(&text, &index)?;
                self.store(args, 2, value)
            }
            Command::StrLen => self.unary(args, Composite, |a| Ok(ops::str_len(a))),
            Command::SubStr => {
                let [text, start, length] = self.operands(args, [Composite, Native, Native])?;
                let value = ops::sub_str(&text, &start, &length)?;
                self.store(args, 3, value)
            }

            Command::IsEq => self.binary(args, |a, b| Ok(ops::is_eq(a, b))),
            Command::IsLt => self.binary(args, ops::is_lt),
            Command::IsGt => self.binary(args, ops::is_gt),
            Command::TypInt => self.unary(args, Native, |a| Ok(ops::typ_int(a))),
            Command::TypFlt => self.unary(args, Native, |a| Ok(ops::typ_flt(a))),
            Command::TypStr => self.unary(args, Native, |a| Ok(ops::typ_str(a))),

            Command::If => {
                let [cond] = self.operands(args, [Native])?;
                if cond.is_true() {
                    return Ok(Flow::Next);
                }
                // Without a later ENDIF the condition is ignored.
                let endif = (pc..self.program.len()).find(|&i| self.program.is_command(i, Command::EndIf));
                Ok(endif.map_or(Flow::Next, Flow::Jump))
            }
            Command::Goto => {
                let [target] = self.operands(args, [Composite])?;
                let target = target.render();
                match self.find_label(&target)? {
                    Some(i) => Ok(Flow::Jump(i)),
                    None => {
                        debug!(line = pc + 1, label = %target, "no matching POS");
                        Ok(Flow::Next)
                    }
                }
            }
            Command::EndIf | Command::Pos | Command::Rem => Ok(Flow::Next),
            Command::Quit => Ok(Flow::Halt),

            Command::Exe => {
                let text = self.text_arg(args)?;
                self.host.execute(&text);
                Ok(Flow::Next)
            }
            Command::Log => self.log(args, LogLevel::Info),
            Command::LogW => self.log(args, LogLevel::Warning),
            Command::LogE => self.log(args, LogLevel::Error),
            Command::Echo => {
                require(args, 1)?;
                self.echo = self.resolve(&args[0], Native)?.is_true();
                Ok(Flow::Next)
            }
            Command::Cls => {
                self.host.clear_log();
                Ok(Flow::Next)
            }
        }
    }

    // ── Addressing ────────────────────────────────────────────────────────────

    fn resolve(&self, value: &Value, mode: Subst) -> std::result::Result<Value, ErrorKind> {
        substitute(value, mode, &self.memory)
    }

    /// Collect `N` operands.  Explicit arguments fill the trailing positions;
    /// if one is missing the register fills the first.
    fn operands<const N: usize>(
        &self,
        args: &[Value],
        modes: [Subst; N],
    ) -> std::result::Result<[Value; N], ErrorKind> {
        let given = args.len().min(N);
        if given + 1 < N {
            return Err(ErrorKind::ArgumentCount { given: args.len() });
        }
        let skip = N - given;
        let mut out: [Value; N] = std::array::from_fn(|_| Value::default());
        if skip == 1 {
            out[0] = self.memory.register().clone();
        }
        for (j, arg) in args.iter().take(given).enumerate() {
            out[skip + j] = self.resolve(arg, modes[skip + j])?;
        }
        Ok(out)
    }

    /// Write a result to the slot named by `args[arity]`, or the register.
    fn store(&mut self, args: &[Value], arity: usize, value: Value) -> Step {
        match args.get(arity) {
            None => self.memory.set_register(value),
            Some(dest) => match self.resolve(dest, Subst::Native)? {
                Value::Int(address) => self.memory.store(address, value)?,
                other => {
                    return Err(ErrorKind::Type(format!(
                        "destination address must be an Integer, not {}",
                        other.type_name()
                    )))
                }
            },
        }
        Ok(Flow::Next)
    }

    fn unary(&mut self, args: &[Value], mode: Subst, op: impl FnOnce(&Value) -> OpResult) -> Step {
        let [a] = self.operands(args, [mode])?;
        let value = op(&a)?;
        self.store(args, 1, value)
    }

    fn binary(&mut self, args: &[Value], op: impl FnOnce(&Value, &Value) -> OpResult) -> Step {
        let [a, b] = self.operands(args, [Subst::Native, Subst::Native])?;
        let value = op(&a, &b)?;
        self.store(args, 2, value)
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn text_arg(&self, args: &[Value]) -> std::result::Result<String, ErrorKind> {
        require(args, 1)?;
        Ok(self.resolve(&args[0], Subst::Composite)?.render())
    }

    fn log(&mut self, args: &[Value], level: LogLevel) -> Step {
        let text = self.text_arg(args)?;
        self.host.log(level, &text);
        Ok(Flow::Next)
    }

    /// First `POS` line, from the top of the program, whose label renders
    /// equal to `target`.
    fn find_label(&self, target: &str) -> std::result::Result<Option<usize>, ErrorKind> {
        for i in 0..self.program.len() {
            if !self.program.is_command(i, Command::Pos) {
                continue;
            }
            let Some(token) = self.program.line(i).and_then(|l| l.args.first()) else {
                continue;
            };
            let label = self.resolve(&Value::from_token(token, false), Subst::Composite)?;
            if label.render() == target {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }
}

fn require(args: &[Value], n: usize) -> std::result::Result<(), ErrorKind> {
    if args.len() < n {
        Err(ErrorKind::ArgumentCount { given: args.len() })
    } else {
        Ok(())
    }
}

/// `CMD a, b, "c d"`: text containing whitespace is re-quoted.
fn echo_line(command: &str, args: &[Value]) -> String {
    let mut out = command.to_owned();
    for (i, arg) in args.iter().enumerate() {
        out.push_str(if i == 0 { " " } else { ", " });
        match arg {
            Value::Text(s) if s.chars().any(char::is_whitespace) => {
                out.push('"');
                out.push_str(s);
                out.push('"');
            }
            other => out.push_str(&other.render()),
        }
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::host::BufferHost;

    fn run_with(src: &str, invocation: &str) -> (Result<RunReport>, BufferHost) {
        let mut host = BufferHost::new();
        let result = Interpreter::new(&mut host)
            .with_seed(42)
            .run(&Program::new(src), &Invocation::parse(invocation));
        (result, host)
    }

    fn run(src: &str) -> (RunReport, BufferHost) {
        let (result, host) = run_with(src, "TEST");
        (result.expect("run failed"), host)
    }

    fn fails(src: &str) -> ScriptError {
        run_with(src, "TEST").0.expect_err("run should fail")
    }

    fn register(src: &str) -> Value {
        run(src).0.memory.register().clone()
    }

    fn info(host: &BufferHost) -> Vec<&str> {
        host.lines(LogLevel::Info)
    }

    #[test]
    fn empty_program() {
        let (report, host) = run("");
        assert_eq!(report.lines_executed, 0);
        assert!(host.log.is_empty());
    }

    #[test]
    fn addressing_rule() {
        assert_eq!(register("SET 10\nADD 5"), Value::Int(15));
        assert_eq!(register("SET 10\nADD 5,3"), Value::Int(8));
        let (report, _) = run("SET 10\nADD 5,3,20");
        assert_eq!(report.memory.register(), &Value::Int(10));
        assert_eq!(report.memory.get(20), Some(&Value::Int(8)));
    }

    #[test]
    fn destination_by_address_reference() {
        let (report, _) = run("VAR total\nADD 2,3,%&total%\nLOG %total%");
        assert_eq!(report.memory.get(10), Some(&Value::Int(5)));
    }

    #[test]
    fn binary_without_operands_is_fatal() {
        let err = fails("ADD");
        assert_eq!(err.line, 1);
        assert_eq!(err.command, "ADD");
        assert_eq!(err.kind, ErrorKind::ArgumentCount { given: 0 });
    }

    #[test]
    fn unary_defaults_to_register() {
        assert_eq!(register("SET 2.7\nTOINT"), Value::Int(2));
        assert_eq!(register("SET 255\nHEX"), Value::Text("FF".into()));
        assert_eq!(register("SET \"hello\"\nSTRLEN"), Value::Int(5));
        assert_eq!(register("SET -1\nISTRUE"), Value::Int(1));
        assert_eq!(register("SET -1.0\nISTRUE"), Value::Int(0));
    }

    #[test]
    fn write_to_read_only_slot_is_fatal() {
        assert_eq!(fails("ADD 1,2,3").kind, ErrorKind::ReadOnlySlot(3));
        assert_eq!(fails("SET 1,101").kind, ErrorKind::ReadOnlySlot(101));
        assert!(matches!(fails("SET 1,\"x\"").kind, ErrorKind::Type(_)));
    }

    #[test]
    fn sub_text_is_type_error() {
        let err = fails("REM\nSUB \"a\",1");
        assert_eq!(err.line, 2);
        assert!(matches!(err.kind, ErrorKind::Type(_)));
        assert!(err.to_string().contains("Text and Integer"));
    }

    #[test]
    fn text_concat_and_repeat() {
        assert_eq!(register("ADD \"n=\",3"), Value::Text("n=3".into()));
        assert_eq!(register("MUL \"ab\",2"), Value::Text("abab".into()));
        assert!(matches!(fails("MUL \"ab\",0").kind, ErrorKind::Range(_)));
    }

    #[test]
    fn modulo_semantics() {
        assert_eq!(register("MOD -7,3"), Value::Int(-1));
        assert_eq!(register("MOD -7.0,3"), Value::Float(2.0));
    }

    #[test]
    fn string_commands() {
        assert_eq!(register("STRGET \"ABC\",2"), Value::Int(67));
        assert_eq!(register("SET \"ABC\"\nSTRGET 0"), Value::Int(65));
        assert_eq!(register("SUBSTR \"Hello\",1,3"), Value::Text("ell".into()));
        assert_eq!(register("SET \"Hello\"\nSUBSTR 0,2"), Value::Text("He".into()));
        assert_eq!(fails("SUBSTR 1").kind, ErrorKind::ArgumentCount { given: 1 });
        assert!(matches!(fails("SUBSTR \"Hi\",1,5").kind, ErrorKind::Range(_)));
    }

    #[test]
    fn conversions() {
        assert_eq!(register("PARSE \"42\""), Value::Int(42));
        assert_eq!(register("PARSE \"4.5\""), Value::Float(4.5));
        assert!(matches!(fails("PARSE \"abc\"").kind, ErrorKind::InvalidNumber(_)));
        assert_eq!(register("CHAR 65"), Value::Text("A".into()));
        assert_eq!(register("STR 2.5"), Value::Text("2.5".into()));
        assert_eq!(register("BIN 6"), Value::Text("110".into()));
        assert_eq!(register("RND 2.5"), Value::Int(2));
        assert_eq!(register("CEIL 2.1"), Value::Int(3));
        assert_eq!(register("FLR 2.9"), Value::Int(2));
    }

    #[test]
    fn stc_stores_text() {
        assert_eq!(register("STC 5"), Value::Text("5".into()));
        assert_eq!(register("STC \"a%1b\""), Value::Text("a0b".into()));
    }

    #[test]
    fn relational_and_type_tests() {
        assert_eq!(register("ISEQ 1,1.0"), Value::Int(1));
        assert_eq!(register("ISEQ \"1\",1"), Value::Int(1));
        assert_eq!(register("ISLT 1,2"), Value::Int(1));
        assert_eq!(register("ISGT 1,2"), Value::Int(0));
        assert!(matches!(fails("ISGT \"a\",2").kind, ErrorKind::Type(_)));
        assert_eq!(register("TYPFLT 1.5"), Value::Int(1));
        assert_eq!(register("TYPSTR 1.5"), Value::Int(0));
    }

    #[test]
    fn random_commands() {
        assert!(matches!(register("RANDOM"), Value::Float(x) if (0.0..1.0).contains(&x)));
        let (report, _) = run("RANDOM 30");
        assert!(matches!(report.memory.get(30), Some(Value::Float(_))));
        assert!(matches!(register("RANDOM 1,3"), Value::Int(n) if (1..3).contains(&n)));
        assert!(matches!(register("RANDOM 1,3.0"), Value::Float(_)));
    }

    #[test]
    fn seeded_runs_repeat() {
        assert_eq!(register("RANDOM 0,1000000"), register("RANDOM 0,1000000"));
    }

    #[test]
    fn if_false_skips_to_endif() {
        let (_, host) = run("ECHO 0\nIF 0\nLOG \"a\"\nENDIF\nLOG \"b\"");
        assert_eq!(info(&host), vec!["b"]);
    }

    #[test]
    fn if_true_falls_through() {
        let (_, host) = run("ECHO 0\nIF 1\nLOG \"a\"\nENDIF\nLOG \"b\"");
        assert_eq!(info(&host), vec!["a", "b"]);
    }

    #[test]
    fn if_without_endif_falls_through() {
        let (_, host) = run("ECHO 0\nIF 0\nLOG \"a\"");
        assert_eq!(info(&host), vec!["a"]);
    }

    #[test]
    fn if_uses_register_and_float_truthiness() {
        let (_, host) = run("ECHO 0\nSET -0.5\nIF\nLOG \"a\"\nENDIF\nLOG \"b\"");
        assert_eq!(info(&host), vec!["b"]);
    }

    #[test]
    fn goto_jumps_to_label() {
        let (_, host) = run("ECHO 0\nGOTO \"X\"\nLOG \"skipped\"\nPOS \"X\"\nLOG \"reached\"");
        assert_eq!(info(&host), vec!["reached"]);
    }

    #[test]
    fn goto_missing_label_is_noop() {
        let (_, host) = run("ECHO 0\nGOTO \"Y\"\nLOG \"next\"\nPOS \"X\"");
        assert_eq!(info(&host), vec!["next"]);
    }

    #[test]
    fn goto_backwards_loop() {
        let src = "ECHO 0\nVAR 0,i\nPOS \"top\"\nADD %i%,1,%&i%\nISLT %i%,3\nIF\nGOTO \"top\"\nENDIF\nLOG \"i=%i%\"";
        let (_, host) = run(src);
        assert_eq!(info(&host), vec!["i=3"]);
    }

    #[test]
    fn goto_register_label_and_numeric_label() {
        let (_, host) = run("ECHO 0\nSET 7\nGOTO\nLOG \"no\"\nPOS 7\nLOG \"yes\"");
        assert_eq!(info(&host), vec!["yes"]);
    }

    #[test]
    fn quit_halts() {
        let (_, host) = run("ECHO 0\nLOG \"a\"\nQUIT\nLOG \"b\"");
        assert_eq!(info(&host), vec!["a"]);
    }

    #[test]
    fn unknown_command_is_reported_and_skipped() {
        let (_, host) = run("ECHO 0\nFROB 1\nLOG \"after\"");
        assert_eq!(
            host.lines(LogLevel::Error),
            vec!["\"FROB\" is not a recognized Simple Batch command."]
        );
        assert_eq!(info(&host), vec!["after"]);
    }

    #[test]
    fn unparsable_lines_are_skipped() {
        let (report, host) = run("ECHO 0\n\n# not a command\n   \nLOG \"ok\"");
        assert_eq!(report.lines_executed, 5);
        assert_eq!(info(&host), vec!["ok"]);
    }

    #[test]
    fn commands_are_case_insensitive() {
        assert_eq!(register("set 4\nadd 1"), Value::Int(5));
    }

    #[test]
    fn log_levels_and_host_effects() {
        let (_, host) = run("ECHO 0\nLOGW \"careful\"\nLOGE \"broken\"\nEXE \"ClearLog now\"\nCLS");
        assert_eq!(host.lines(LogLevel::Warning), vec!["careful"]);
        assert_eq!(host.lines(LogLevel::Error), vec!["broken"]);
        assert_eq!(host.executed, vec!["ClearLog now"]);
        assert_eq!(host.clears, 1);
    }

    #[test]
    fn log_without_argument_is_fatal() {
        assert_eq!(fails("LOG").kind, ErrorKind::ArgumentCount { given: 0 });
    }

    #[test]
    fn echo_shows_raw_tokens() {
        let (_, host) = run("LOG \"Hello, World!\"\nadd 1, 2.5\nECHO 0\nLOG \"quiet\"");
        assert_eq!(
            host.echoed,
            vec!["LOG \"Hello, World!\"", "add 1, 2.5"]
        );
    }

    #[test]
    fn echo_can_be_turned_back_on() {
        let (_, host) = run("ECHO 0\nREM\nECHO 1\nREM");
        assert_eq!(host.echoed, vec!["ECHO 1", "REM"]);
    }

    #[test]
    fn substitution_in_log() {
        let (_, host) = run("ECHO 0\nVAR \"Ada\",NAME\nLOG \"Hi %NAME%!\"");
        assert_eq!(info(&host), vec!["Hi Ada!"]);
    }

    #[test]
    fn single_reference_keeps_type() {
        assert_eq!(register("VAR 2.5,x\nSET %x%\nTYPFLT"), Value::Int(1));
        assert_eq!(register("VAR \"Ada\",NAME\nSTR %NAME%"), Value::Text("Ada".into()));
    }

    #[test]
    fn undeclared_variable_is_fatal() {
        let err = fails("ECHO 0\nLOG \"%missing%\"");
        assert_eq!(err.line, 2);
        assert_eq!(err.kind, ErrorKind::UndeclaredVariable("missing".into()));
    }

    #[test]
    fn declaration_capacity() {
        let mut src = String::new();
        for i in 0..90 {
            src.push_str(&format!("VAR v{i}\n"));
        }
        let (report, _) = run(&src);
        assert_eq!(report.memory.declared(), 90);

        src.push_str("VAR one_too_many\n");
        let err = fails(&src);
        assert_eq!(err.line, 91);
        assert_eq!(err.kind, ErrorKind::MemoryExhausted);
    }

    #[test]
    fn declaration_rejects_bad_names() {
        assert!(matches!(fails("VAR 1,2").kind, ErrorKind::InvalidName(_)));
        assert!(matches!(fails("VAR 1,\"%x\"").kind, ErrorKind::InvalidName(_)));
    }

    #[test]
    fn invocation_arguments() {
        let (result, host) = run_with(
            "ECHO 0\nLOG \"%0 says %1\"\nTYPINT %2\nADD %2,1",
            "HELLO, #Ada Lovelace#, 41",
        );
        let report = result.expect("run failed");
        assert_eq!(info(&host), vec!["HELLO says Ada Lovelace"]);
        assert_eq!(report.memory.register(), &Value::Int(42));
        assert_eq!(report.memory.get(3), Some(&Value::Int(0)));
    }

    #[test]
    fn hello_script() {
        let src = "ECHO 0\nREM \"This is a test Simple Batch Program\"\n\nLOG \"Hello, World!\"\n\nVAR %1,\"MyName\"\nTYPSTR %MyName%\nIF\nLOG \"Hello, %MyName%!\"\nENDIF";
        let (result, host) = run_with(src, "HELLO,#Grace#");
        result.expect("run failed");
        assert_eq!(info(&host), vec!["Hello, World!", "Hello, Grace!"]);

        let (result, host) = run_with(src, "HELLO,5");
        result.expect("run failed");
        assert_eq!(info(&host), vec!["Hello, World!"]);
    }

    #[test]
    fn runs_are_isolated() {
        let mut host = BufferHost::new();
        let mut interp = Interpreter::new(&mut host);
        let first = interp
            .run(&Program::new("VAR 5,x\nSET 9"), &Invocation::parse("A"))
            .unwrap();
        assert_eq!(first.memory.declared(), 1);
        let second = interp
            .run(&Program::new("LOG \"%x%\""), &Invocation::parse("B"))
            .unwrap_err();
        assert_eq!(second.kind, ErrorKind::UndeclaredVariable("x".into()));
    }

    #[test]
    fn environment_slots() {
        let mut host = BufferHost::new();
        let env = Environment {
            date: "Monday, October 19, 2026".into(),
            level_name: "Canyon".into(),
            in_level: true,
            ..Environment::default()
        };
        Interpreter::new(&mut host)
            .with_environment(env)
            .run(
                &Program::new("ECHO 0\nLOG \"%DATE% %LEVEL_NAME% %IN_LEVEL%\""),
                &Invocation::parse("ENV"),
            )
            .unwrap();
        assert_eq!(info(&host), vec!["Monday, October 19, 2026 Canyon 1"]);
    }

    #[test]
    fn program_classifies_lines_once() {
        let program = Program::new("if 1\n\nFROB\n  endif\nPOS \"a\"");
        assert_eq!(program.command(0), Some(Command::If));
        assert_eq!(program.command(1), None);
        assert_eq!(program.command(2), None);
        assert!(program.line(2).is_some());
        assert_eq!(program.command(3), Some(Command::EndIf));
        assert_eq!(program.command(4), Some(Command::Pos));
        assert_eq!(program.command(5), None);
    }

    #[test]
    fn oversized_repeat_is_fatal() {
        let err = fails("ECHO 0\nSET \"abcdefgh\"\nMUL 2147483647\nSTRLEN");
        assert_eq!(err.line, 3);
        assert_eq!(err.command, "MUL");
        assert!(matches!(err.kind, ErrorKind::Range(_)));
    }

    #[test]
    fn invocation_parse_types() {
        let inv = Invocation::parse("42, 7, 2.5, true, word, #two words#");
        assert_eq!(
            inv.args(),
            &[
                Value::Text("42".into()),
                Value::Int(7),
                Value::Float(2.5),
                Value::Int(1),
                Value::Text("word".into()),
                Value::Text("two words".into()),
            ]
        );
        assert_eq!(inv.script_name(), "42");
        assert_eq!(Invocation::parse("").script_name(), "");
    }

    #[test]
    fn invocation_new_truncates() {
        let inv = Invocation::new("S", (0..20).map(Value::Int));
        assert_eq!(inv.args().len(), ARG_SLOTS);
    }
}
