//! Line input for `IN`.
//!
//! Mirrors the print handler: stdin for the binary, a scripted queue for
//! tests. `None` means end of input.

use std::collections::VecDeque;
use std::io::BufRead;
use std::sync::Arc;

use parking_lot::Mutex;

pub enum InputHandlerImpl {
    /// Reads from the process stdin.
    Stdin,
    /// Replays queued lines, then reports end of input.
    Scripted(Mutex<VecDeque<String>>),
}

impl InputHandlerImpl {
    /// Read one line without its terminator.
    pub fn read_line(&self) -> Option<String> {
        match self {
            Self::Stdin => {
                let mut line = String::new();
                match std::io::stdin().lock().read_line(&mut line) {
                    Ok(0) | Err(_) => None,
                    Ok(_) => {
                        let trimmed = line.trim_end_matches(['\n', '\r']).len();
                        line.truncate(trimmed);
                        Some(line)
                    }
                }
            }
            Self::Scripted(lines) => lines.lock().pop_front(),
        }
    }
}

pub type SharedInputHandler = Arc<InputHandlerImpl>;

pub fn stdin_handler() -> SharedInputHandler {
    Arc::new(InputHandlerImpl::Stdin)
}

/// Input handler that yields `lines` in order.
pub fn scripted_input<I, S>(lines: I) -> SharedInputHandler
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Arc::new(InputHandlerImpl::Scripted(Mutex::new(
        lines.into_iter().map(Into::into).collect(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_lines_then_eof() {
        let input = scripted_input(["first", "2"]);
        assert_eq!(input.read_line().as_deref(), Some("first"));
        assert_eq!(input.read_line().as_deref(), Some("2"));
        assert_eq!(input.read_line(), None);
    }
}
