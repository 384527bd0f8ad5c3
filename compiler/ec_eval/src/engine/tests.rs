use ec_diagnostic::ErrorCode;
use pretty_assertions::assert_eq;

use super::*;
use crate::{buffer_handler, disabled_runner, scripted_input, ParamScoping};

struct Run {
    engine: Engine,
    output: String,
    result: EcResult<()>,
}

fn run_with(source: &str, configure: impl FnOnce(EngineBuilder) -> EngineBuilder) -> Run {
    let print = buffer_handler();
    let builder = Engine::builder(Program::parse(source))
        .print_handler(print.clone())
        .input_handler(scripted_input(Vec::<String>::new()))
        .process_runner(disabled_runner());
    let mut engine = configure(builder).build();
    let result = engine.run();
    Run {
        engine,
        output: print.get_output(),
        result,
    }
}

fn run(source: &str) -> Run {
    run_with(source, |b| b)
}

#[test]
fn continue_does_not_stack_loop_frames() {
    let r = run("\
EC i 0
LOOP i < 5
ADD i 1
IF i % 2 == 0
CONTINUE
ENDIF
OUT i
ENDLOOP");
    assert!(r.result.is_ok());
    assert_eq!(r.output, "1\n3\n5\n");
    assert!(r.engine.loop_frames().is_empty());
}

#[test]
fn return_discards_loop_frames_of_the_call() {
    let r = run("\
FN find(n)
EC k 0
LOOP
ADD k 1
IF k == n
RET k
ENDIF
ENDLOOP
ENDFN
CALL find(3)
OUT k");
    assert!(r.result.is_ok());
    assert_eq!(r.output, "3\n");
    assert_eq!(r.engine.return_value(), Some(3.0));
    assert!(r.engine.loop_frames().is_empty());
    assert_eq!(r.engine.call_depth(), 0);
}

#[test]
fn break_inside_callee_does_not_touch_caller_loop() {
    let r = run("\
FN stray
BREAK
OUT \"in\"
ENDFN
EC i 0
LOOP i < 2
ADD i 1
CALL stray
ENDLOOP
OUT i");
    assert!(r.result.is_ok());
    assert_eq!(r.output, "in\nin\n2\n");
}

#[test]
fn recursive_loops_keep_separate_frames() {
    let r = run("\
EC total 0
FN walk(depth)
EC i 0
LOOP i < 2
ADD i 1
ADD total 1
IF depth > 0
CALL walk(depth - 1)
ENDIF
ENDLOOP
ENDFN
CALL walk(1)
OUT total");
    // `i` is global, so the inner call exhausts it for the outer loop.
    assert!(r.result.is_ok());
    assert_eq!(r.output, "3\n");
    assert!(r.engine.loop_frames().is_empty());
}

#[test]
fn runaway_recursion_overflows_with_trace() {
    let r = run_with("FN f\nCALL f\nENDFN\nCALL f", |b| {
        b.limits(Limits {
            max_call_depth: 8,
            ..Limits::default()
        })
    });
    let err = r.result.err();
    let err = err.as_ref();
    assert_eq!(err.map(EcError::code), Some(ErrorCode::E6011));
    assert_eq!(err.and_then(EcError::line), Some(2));
    let frames = err.map(|e| e.backtrace().frames().to_vec()).unwrap_or_default();
    assert_eq!(frames.len(), 8);
    assert_eq!(frames.first().map(|f| (f.line, f.function.as_str())), Some((2, "f")));
    assert_eq!(frames.last().map(|f| (f.line, f.function.as_str())), Some((4, "main")));
}

#[test]
fn loop_depth_limit() {
    let r = run_with("LOOP\nLOOP\nLOOP\nENDLOOP\nENDLOOP\nENDLOOP", |b| {
        b.limits(Limits {
            max_loop_depth: 2,
            ..Limits::default()
        })
    });
    let err = r.result.err();
    assert_eq!(err.as_ref().map(EcError::code), Some(ErrorCode::E6006));
    assert_eq!(err.as_ref().and_then(EcError::line), Some(3));
}

#[test]
fn forward_references_resolve() {
    let r = run("CALL greet(\"ec\")\nNEW p Point\nFN greet(who)\nOUT \"hi \" + who\nENDFN\nCLASS Point\nEC x\nENDCLASS");
    assert!(r.result.is_ok());
    assert_eq!(r.output, "hi ec\n");
}

#[test]
fn nested_definitions_register_when_reached() {
    let source = "\
FN outer
FN inner
OUT \"inner\"
ENDFN
CALL inner
ENDFN
CALL outer
CALL inner";
    let r = run(source);
    assert!(r.result.is_ok());
    assert_eq!(r.output, "inner\ninner\n");
    let names: Vec<_> = r.engine.functions().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["outer", "inner"]);

    let early = run("FN outer\nFN inner\nENDFN\nENDFN\nCALL inner");
    assert_eq!(
        early.result.err().map(|e| e.code()),
        Some(ErrorCode::E6009)
    );
}

#[test]
fn registry_metadata() {
    let r = run("\
FN add(a, b)
RET a + b
ENDFN
FN add(x)
ENDFN
CLASS Point
EC x 0
EC y
FN norm()
ENDFN
ENDCLASS");
    assert!(r.result.is_ok());
    let functions = r.engine.functions();
    assert_eq!(functions.len(), 2);
    assert_eq!(functions[0].params.as_slice(), ["a", "b"]);
    assert_eq!((functions[0].start, functions[0].end), (0, 2));

    let classes = r.engine.classes();
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].members, vec!["x", "y"]);
    assert_eq!(classes[0].methods, vec!["norm"]);
}

#[test]
fn duplicate_function_uses_first() {
    let r = run("FN f\nOUT 1\nENDFN\nFN f\nOUT 2\nENDFN\nCALL f");
    assert_eq!(r.output, "1\n");
}

#[test]
fn too_many_parameters() {
    let r = run_with("FN f(a, b, c)\nENDFN", |b| {
        b.limits(Limits {
            max_params: 2,
            ..Limits::default()
        })
    });
    assert_eq!(r.result.err().map(|e| e.code()), Some(ErrorCode::E6006));
}

#[test]
fn call_clears_return_flag() {
    let r = run("FN one\nRET 1\nENDFN\nFN none\nENDFN\nCALL one\nCALL none");
    assert!(r.result.is_ok());
    assert_eq!(r.engine.return_value(), None);

    let top = run("RET 7\nOUT \"after\"");
    assert_eq!(top.engine.return_value(), Some(7.0));
    assert_eq!(top.output, "after\n");
}

#[test]
fn arguments_evaluate_in_caller_scope() {
    let r = run("\
FN swap(a, b)
OUT a + \",\" + b
ENDFN
FN outer(a, b)
CALL swap(b, a)
ENDFN
CALL outer(1, 2)");
    assert_eq!(r.output, "2,1\n");
}

#[test]
fn shared_scoping_binds_globals() {
    let r = run_with("FN f(n)\nENDFN\nCALL f(4)\nOUT n", |b| {
        b.param_scoping(ParamScoping::Shared)
    });
    assert_eq!(r.output, "4\n");

    let per_call = run("FN f(n)\nENDFN\nCALL f(4)\nOUT n");
    assert_eq!(per_call.result.err().map(|e| e.code()), Some(ErrorCode::E6001));
}

#[test]
fn errors_are_located_in_callee() {
    let r = run("FN f\n  ADD missing 1\nENDFN\nOUT 0\nCALL f");
    let err = r.result.err();
    let err = err.as_ref();
    assert_eq!(err.and_then(EcError::line), Some(2));
    assert_eq!(err.and_then(EcError::source_text), Some("ADD missing 1"));
    assert_eq!(err.map(|e| e.backtrace().to_string()).as_deref(), Some("  at line 5 (in main)\n"));
}

#[test]
fn elif_errors_point_at_elif() {
    let r = run("IF 0\nELIF nope == 1\nENDIF");
    let err = r.result.err();
    assert_eq!(err.as_ref().map(EcError::code), Some(ErrorCode::E6001));
    assert_eq!(err.as_ref().and_then(EcError::line), Some(2));
}

#[test]
fn branch_words_outside_if_are_rejected() {
    let r = run("OUT 1\nELSE\nOUT 2");
    let err = r.result.err();
    assert_eq!(err.as_ref().map(EcError::code), Some(ErrorCode::E1001));
    assert_eq!(err.as_ref().and_then(EcError::line), Some(2));
    assert_eq!(
        err.as_ref().map(EcError::message).as_deref(),
        Some("Unexpected ELSE without a matching IF")
    );
    assert_eq!(r.output, "1\n");

    let r = run("EC x 1\nelif x == 1\nIF x\nENDIF");
    assert_eq!(
        r.result.err().map(|e| e.message()).as_deref(),
        Some("Unexpected ELIF without a matching IF")
    );
}

#[test]
fn taken_branch_skips_to_endif() {
    let r = run("IF 1\nOUT 1\nELIF 1\nOUT 2\nELSE\nOUT 3\nENDIF\nOUT 4");
    assert!(r.result.is_ok());
    assert_eq!(r.output, "1\n4\n");
}

#[test]
fn unknown_command() {
    let r = run("OUT 1\nPRINT 2");
    let err = r.result.err();
    assert_eq!(err.as_ref().map(EcError::code), Some(ErrorCode::E1003));
    assert_eq!(err.as_ref().map(EcError::message).as_deref(), Some("Unknown command 'PRINT'"));
    assert_eq!(r.output, "1\n");
}

#[test]
fn validation_runs_before_anything() {
    let r = run("OUT 1\nENDIF");
    assert_eq!(r.result.err().map(|e| e.code()), Some(ErrorCode::E1001));
    assert_eq!(r.output, "");
}

#[test]
fn profiling_counts() {
    let r = run_with("EC i 0\nLOOP i < 3\nADD i 1\nENDLOOP\nFN f\nENDFN\nCALL f\nEXEC \"true\"", |b| {
        b.profile(true)
    });
    assert!(r.result.is_ok());
    let counters = r.engine.counters().cloned().unwrap_or_default();
    assert_eq!(counters.loop_iterations, 3);
    assert_eq!(counters.function_calls, 1);
    assert_eq!(counters.external_commands, 1);
    assert!(counters.statements_executed > 10);

    assert!(run("OUT 1").engine.counters().is_none());
}
