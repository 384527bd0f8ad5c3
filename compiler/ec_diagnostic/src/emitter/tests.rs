use pretty_assertions::assert_eq;

use super::*;
use crate::{
    file_load_failure, missing_close, undefined_variable, Backtrace, BacktraceFrame, EcError,
};

fn render(error: &EcError, mode: ColorMode) -> String {
    let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), mode, false);
    emitter.emit(error);
    emitter.flush();
    String::from_utf8(emitter.into_inner()).unwrap_or_default()
}

#[test]
fn runtime_error_with_trace() {
    let error = undefined_variable("y")
        .locate(5, "   ADD y 1 ")
        .with_backtrace(Backtrace::new(vec![BacktraceFrame {
            line: 12,
            function: "main".to_string(),
        }]));

    assert_eq!(
        render(&error, ColorMode::Never),
        "[RUNTIME ERROR] E6001 at line 5:\n\
         >> ADD y 1\n\
         Details: Undefined variable 'y'. Please declare it with 'EC' first.\n\
         \n\
         Stack Trace:\n  at line 12 (in main)\n"
    );
}

#[test]
fn structural_error_uses_syntax_header() {
    let error = missing_close("IF", "ENDIF").locate(2, "IF x > 1");
    assert_eq!(
        render(&error, ColorMode::Never),
        "[SYNTAX ERROR] E1001 at line 2:\n>> IF x > 1\nDetails: Missing ENDIF for IF\n"
    );
}

#[test]
fn unlocated_host_error() {
    let error = file_load_failure("nope.ec", "No such file or directory");
    assert_eq!(
        render(&error, ColorMode::Never),
        "[ERROR] E9001:\nDetails: Cannot open file 'nope.ec': No such file or directory\n"
    );
}

#[test]
fn colors_wrap_header() {
    let error = file_load_failure("x.ec", "denied");
    let out = render(&error, ColorMode::Always);
    assert!(out.starts_with("\x1b[1;31m[ERROR]\x1b[0m"));
}

#[test]
fn auto_mode_follows_tty() {
    assert!(ColorMode::Auto.should_use_colors(true));
    assert!(!ColorMode::Auto.should_use_colors(false));
    assert_eq!(ColorMode::parse("never"), Some(ColorMode::Never));
    assert_eq!(ColorMode::parse("sometimes"), None);
}
