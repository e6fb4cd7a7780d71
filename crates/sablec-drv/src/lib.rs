//! sablec-drv - Compiler Driver
//!
//! Orchestrates one front-end invocation: read source from a file or
//! standard input, run lexing/parsing, semantic analysis, and method
//! extraction, then report diagnostics and decide the exit code. The
//! driver owns no compiler logic itself; it wires the phase crates
//! together.
//!
//! # Pipeline
//!
//! ```text
//! source text
//!     |
//!     v
//! [sablec-lex + sablec-par]  -> AST + scope tree + symbols
//!     |
//!     v
//! [sablec-sem::analyze]      -> typed AST with explicit casts
//!     |
//!     v
//! [sablec-sem::extract]      -> struct methods lowered to free functions
//!     |
//!     v
//! diagnostics -> stderr, exit code 0 or 1
//! ```
//!
//! # Exit codes
//!
//! - 0: success (warnings allowed)
//! - 1: any error-level diagnostic, or an I/O failure

use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context as _};
use sablec_sym::Context;
use sablec_util::Handler;

/// Driver configuration.
///
/// One positional argument names the source file; with no argument the
/// driver reads standard input.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Source file path; `None` reads stdin.
    pub input: Option<PathBuf>,

    /// Dump the (analyzed, extracted) AST to stdout in canonical source
    /// form.
    pub emit_ast: bool,
}

impl Config {
    /// Parses command-line arguments (without the program name).
    pub fn from_args<I>(args: I) -> anyhow::Result<Config>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();

        for arg in args {
            match arg.as_str() {
                "--emit-ast" => config.emit_ast = true,
                "--help" | "-h" => bail!("usage: sablec [--emit-ast] [FILE]"),
                _ if arg.starts_with('-') => bail!("unknown option '{}'", arg),
                _ => {
                    if config.input.is_some() {
                        bail!("expected at most one input file");
                    }
                    config.input = Some(PathBuf::from(arg));
                }
            }
        }

        Ok(config)
    }
}

/// One compiler invocation: configuration plus the per-compilation state
/// every phase shares.
pub struct Session {
    pub config: Config,
    pub ctx: Context,
    pub handler: Handler,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ctx: Context::new(),
            handler: Handler::new(),
        }
    }

    /// Runs the front end over `source`. Returns true when no error-level
    /// diagnostic was reported.
    pub fn compile(&mut self, source: &str) -> bool {
        let mut program = sablec_par::parse(source, &mut self.ctx, &self.handler);
        sablec_sem::analyze(&mut program, &mut self.ctx, &self.handler);
        sablec_sem::extract_methods(&mut program, &mut self.ctx, &self.handler);

        if self.config.emit_ast {
            print!("{}", sablec_par::print_program(&mut program));
        }

        !self.handler.has_errors()
    }
}

/// Entry point shared by `main` and tests: parse arguments, read input,
/// compile, report. Returns the process exit code.
pub fn run<I>(args: I) -> anyhow::Result<i32>
where
    I: IntoIterator<Item = String>,
{
    let config = Config::from_args(args)?;
    let source = read_source(&config)?;

    let mut session = Session::new(config);
    let ok = session.compile(&source);

    session.handler.emit_to_stderr();

    Ok(if ok { 0 } else { 1 })
}

fn read_source(config: &Config) -> anyhow::Result<String> {
    match &config.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot open file: {}", path.display())),
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("cannot read standard input")?;
            Ok(source)
        }
    }
}
