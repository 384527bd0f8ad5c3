//! External process capability for `EXEC`, `PYRUN` and `CRUN`.
//!
//! The engine only ever sees `run(command_line) -> output`. Runs are
//! synchronous with no stdin and no timeout; the exit status is ignored and a
//! spawn failure yields empty output.

use std::collections::VecDeque;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;

use parking_lot::Mutex;

/// Test double: records every command line and replays canned outputs.
#[derive(Default)]
pub struct ScriptedRunner {
    outputs: Mutex<VecDeque<String>>,
    commands: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new<I, S>(outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedRunner {
            outputs: Mutex::new(outputs.into_iter().map(Into::into).collect()),
            commands: Mutex::new(Vec::new()),
        }
    }

    fn run(&self, command: &str) -> String {
        self.commands.lock().push(command.to_string());
        self.outputs.lock().pop_front().unwrap_or_default()
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().clone()
    }
}

/// Runs the command lines built by `EXEC`, `PYRUN` and `CRUN`.
///
/// Output is captured stdout followed by captured stderr (the streams are
/// not interleaved), with one trailing line ending removed.
pub enum ProcessRunner {
    /// Runs through the platform shell.
    System,
    Scripted(ScriptedRunner),
    /// Every command produces empty output.
    Disabled,
}

impl ProcessRunner {
    pub fn run(&self, command: &str) -> String {
        match self {
            Self::System => run_shell(command),
            Self::Scripted(runner) => runner.run(command),
            Self::Disabled => {
                tracing::debug!(command, "external command skipped");
                String::new()
            }
        }
    }

    /// Commands seen by a scripted runner; empty for the others.
    pub fn recorded_commands(&self) -> Vec<String> {
        match self {
            Self::Scripted(runner) => runner.commands(),
            Self::System | Self::Disabled => Vec::new(),
        }
    }
}

pub type SharedProcessRunner = Arc<ProcessRunner>;

pub fn system_runner() -> SharedProcessRunner {
    Arc::new(ProcessRunner::System)
}

pub fn scripted_runner<I, S>(outputs: I) -> SharedProcessRunner
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Arc::new(ProcessRunner::Scripted(ScriptedRunner::new(outputs)))
}

pub fn disabled_runner() -> SharedProcessRunner {
    Arc::new(ProcessRunner::Disabled)
}

fn shell(command: &str) -> Command {
    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    }
    #[cfg(not(windows))]
    {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
}

fn run_shell(command: &str) -> String {
    tracing::debug!(command, "spawning");
    let output = shell(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output();

    match output {
        Ok(output) => {
            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&output.stderr));
            strip_trailing_newline(text)
        }
        Err(err) => {
            tracing::warn!(command, error = %err, "failed to spawn external command");
            String::new()
        }
    }
}

/// Remove exactly one trailing `\n` or `\r\n`.
fn strip_trailing_newline(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}

/// Command line for `PYRUN`.
///
/// With a function call the script is imported as a module (its name up to
/// the last `.`) from the working directory and the call result printed;
/// otherwise the script runs as-is.
pub fn python_command(script: &str, call: Option<(&str, &str)>) -> String {
    match call {
        Some((function, args)) => {
            let module = script.rfind('.').map_or(script, |dot| &script[..dot]);
            format!(
                "python -c \"import sys; sys.path.insert(0, '.'); \
                 from {module} import {function}; print({function}({args}))\""
            )
        }
        None => format!("python \"{script}\""),
    }
}

/// Command line for `CRUN`: compile `source` to `binary` and run it.
pub fn c_command(source: &str, binary: &Path) -> String {
    let binary = binary.display();
    format!("gcc -o \"{binary}\" \"{source}\" -lm 2>&1 && \"{binary}\"")
}
