//! The `run` command: load, validate and execute an EC script.

use ec_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use ec_eval::{Engine, EngineBuilder, ParamScoping};

use super::load_program;

/// Flags accepted by `ec run`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Print evaluation counters to stderr after the run.
    pub profile: bool,
    pub param_scoping: ParamScoping,
    pub color: ColorMode,
}

impl RunOptions {
    /// Apply one `--flag`, rejecting anything unknown.
    pub fn apply_flag(&mut self, flag: &str) -> Result<(), String> {
        match flag {
            "--profile" => self.profile = true,
            "--shared-params" => self.param_scoping = ParamScoping::Shared,
            _ => {
                let Some(value) = flag.strip_prefix("--color=") else {
                    return Err(format!("unknown option '{flag}'"));
                };
                let Some(mode) = ColorMode::parse(value) else {
                    return Err(format!(
                        "invalid color mode '{value}' (expected auto, always or never)"
                    ));
                };
                self.color = mode;
            }
        }
        Ok(())
    }

    /// Map these options onto an engine builder.
    pub fn configure(&self, builder: EngineBuilder) -> EngineBuilder {
        builder
            .param_scoping(self.param_scoping)
            .profile(self.profile)
    }
}

/// Run an EC script with stdout, stdin and the system shell attached.
///
/// Any load or script error is rendered to stderr and the process exits
/// with status 1.
pub fn run_file(path: &str, options: &RunOptions) {
    let is_tty = std::io::IsTerminal::is_terminal(&std::io::stderr());
    let mut emitter = TerminalEmitter::stderr(options.color, is_tty);

    let program = match load_program(path) {
        Ok(program) => program,
        Err(err) => {
            emitter.emit(&err);
            emitter.flush();
            std::process::exit(1);
        }
    };

    let mut engine = options.configure(Engine::builder(program)).build();
    let result = engine.run();

    if let Some(counters) = engine.counters() {
        eprintln!("{}", counters.report());
    }

    if let Err(err) = result {
        emitter.emit(&err);
        emitter.flush();
        std::process::exit(1);
    }
}
