//! Whole-script behaviour through the public engine API.

use ec_diagnostic::{EcError, EcResult, ErrorCode};
use ec_eval::{
    buffer_handler, disabled_runner, python_command, scripted_input, scripted_runner, Engine,
    EngineBuilder, ParamScoping, SharedProcessRunner, Value, ValueType,
};
use ec_ir::Program;
use pretty_assertions::assert_eq;

struct Outcome {
    engine: Engine,
    output: String,
    result: EcResult<()>,
}

fn execute(source: &str, configure: impl FnOnce(EngineBuilder) -> EngineBuilder) -> Outcome {
    let print = buffer_handler();
    let builder = Engine::builder(Program::parse(source))
        .print_handler(print.clone())
        .input_handler(scripted_input(Vec::<String>::new()))
        .process_runner(disabled_runner());
    let mut engine = configure(builder).build();
    let result = engine.run();
    Outcome {
        engine,
        output: print.get_output(),
        result,
    }
}

fn output_of(source: &str) -> String {
    let outcome = execute(source, |b| b);
    assert!(outcome.result.is_ok(), "script failed: {:?}", outcome.result);
    outcome.output
}

fn error_of(source: &str) -> Option<EcError> {
    execute(source, |b| b).result.err()
}

#[test]
fn hello_and_concatenation() {
    assert_eq!(output_of("OUT \"Hello, EC\""), "Hello, EC\n");
    assert_eq!(output_of("OUT \"a\" + 1 + \"b\""), "a1b\n");
    assert_eq!(
        output_of("EC s \"hello world\"\nOUT s + \"!\""),
        "hello world!\n"
    );
}

#[test]
fn comments_blank_lines_and_case() {
    let source = "\
# header comment

// another
ec x 2
Out x * 21
  out \"indented\"";
    assert_eq!(output_of(source), "42\nindented\n");
}

#[test]
fn crlf_sources() {
    assert_eq!(output_of("EC x 1\r\nOUT x\r\n"), "1\n");
}

#[test]
fn arithmetic_statements() {
    let outcome = execute("EC x 5\nADD x 3", |b| b);
    assert!(outcome.result.is_ok());
    assert_eq!(outcome.engine.variable("x"), Some(&Value::Number(8.0)));
    assert_eq!(
        outcome.engine.variable("x").map(Value::value_type),
        Some(ValueType::Number)
    );

    let source = "\
EC x 10
SUB x 4
MUL x 3
DIV x 4
OUT x
MOD x 4
OUT x";
    assert_eq!(output_of(source), "4.5\n0.5\n");
}

#[test]
fn arithmetic_retypes_strings() {
    let outcome = execute("EC s \"12\"\nADD s 1", |b| b);
    assert_eq!(outcome.engine.variable("s"), Some(&Value::Number(13.0)));
}

#[test]
fn number_formatting() {
    assert_eq!(output_of("OUT 10 / 4"), "2.5\n");
    assert_eq!(output_of("OUT 1 / 3"), "0.333333\n");
    assert_eq!(output_of("OUT 100000000 * 100000000000"), "1e+19\n");
    assert_eq!(output_of("OUT -6 / 2"), "-3\n");
}

#[test]
fn declare_without_value_keeps_slot() {
    assert_eq!(output_of("EC x 3\nEC x\nOUT x"), "3\n");
    let outcome = execute("EC fresh", |b| b);
    assert_eq!(outcome.engine.variable("fresh"), Some(&Value::Null));
}

#[test]
fn set_requires_declaration() {
    assert_eq!(output_of("EC x 1\nSET x x + 1\nOUT x"), "2\n");
    assert_eq!(output_of("EC x 1\nSET x \"text\"\nOUT x"), "text\n");
    assert_eq!(
        error_of("SET y 1").map(|e| e.code()),
        Some(ErrorCode::E6001)
    );
}

#[test]
fn arrays() {
    let source = "\
ARR a 3
SET a[0] 5
SET a[1] a[0] * 2
EC i 1
SET a[i + 1] a[i] + 1
OUT a[1]
OUT a[0] + a[1]
OUT a[0]+a[1]
OUT a[2]";
    assert_eq!(output_of(source), "10\n510\n15\n11\n");

    let outcome = execute("ARR a 2 + 1", |b| b);
    assert_eq!(outcome.engine.array("a"), Some(&[0.0, 0.0, 0.0][..]));
}

#[test]
fn array_bounds() {
    let read_past = error_of("ARR a 3\nOUT a[3]");
    assert_eq!(read_past.as_ref().map(EcError::code), Some(ErrorCode::E6004));
    assert_eq!(
        read_past.map(|e| e.message()).as_deref(),
        Some("Array Index Out of Bounds: Index 3, Size 3.")
    );
    assert_eq!(
        error_of("ARR a 3\nOUT a[-1]").map(|e| e.code()),
        Some(ErrorCode::E6004)
    );
    assert_eq!(output_of("ARR a 3\nOUT a[0]"), "0\n");
    assert_eq!(
        error_of("ARR a 3\nSET a[5] 1").map(|e| e.code()),
        Some(ErrorCode::E6004)
    );
    assert_eq!(
        error_of("ARR a 0").map(|e| e.code()),
        Some(ErrorCode::E6005)
    );
    let huge = error_of("ARR a 1e20\nOUT 1");
    assert_eq!(huge.as_ref().map(EcError::code), Some(ErrorCode::E6006));
    assert_eq!(huge.as_ref().and_then(EcError::line), Some(1));
    assert_eq!(
        huge.map(|e| e.message()).as_deref(),
        Some("Array too large (Limit: 1048576).")
    );
    assert_eq!(
        error_of("EC n 1\nSET n[0] 1").map(|e| e.code()),
        Some(ErrorCode::E6003)
    );
}

#[test]
fn conditionals() {
    let source = |x: i32| {
        format!(
            "\
EC x {x}
IF x == 1
OUT \"one\"
ELIF x == 2
OUT \"two\"
ELIF x >= 2
OUT \"big\"
ELSE
OUT \"other\"
ENDIF
OUT \"done\""
        )
    };
    assert_eq!(output_of(&source(1)), "one\ndone\n");
    assert_eq!(output_of(&source(2)), "two\ndone\n");
    assert_eq!(output_of(&source(9)), "big\ndone\n");
    assert_eq!(output_of(&source(0)), "other\ndone\n");
}

#[test]
fn nested_conditionals_skip_inner_branches() {
    let source = "\
EC a 0
IF a == 1
IF a == 1
OUT \"inner\"
ELSE
OUT \"inner-else\"
ENDIF
ELSE
OUT \"outer-else\"
ENDIF";
    assert_eq!(output_of(source), "outer-else\n");
}

#[test]
fn false_loop_runs_zero_times() {
    let source = "\
EC n 0
LOOP n > 0
OUT \"never\"
ENDLOOP
OUT \"after\"";
    assert_eq!(output_of(source), "after\n");
}

#[test]
fn counting_loop() {
    let source = "\
EC i 0
LOOP i < 3
OUT i
ADD i 1
ENDLOOP";
    assert_eq!(output_of(source), "0\n1\n2\n");
}

#[test]
fn break_exits_only_innermost_loop() {
    let source = "\
EC i 0
LOOP i < 3
ADD i 1
EC j 0
LOOP
ADD j 1
IF j == 2
BREAK
ENDIF
ENDLOOP
OUT i + \":\" + j
ENDLOOP";
    assert_eq!(output_of(source), "1:2\n2:2\n3:2\n");
}

#[test]
fn end_stops_execution() {
    assert_eq!(output_of("OUT 1\nEND\nOUT 2"), "1\n");
}

#[test]
fn functions_with_arguments() {
    let source = "\
FN greet(name, times)
EC k 0
LOOP k < times
OUT \"hi \" + name
ADD k 1
ENDLOOP
ENDFN
CALL greet(\"ann\", 2)
CALL greet \"bob\", 1";
    assert_eq!(output_of(source), "hi ann\nhi ann\nhi bob\n");
}

#[test]
fn return_value_is_recorded() {
    let outcome = execute("FN sq(n)\nRET n * n\nENDFN\nCALL sq(7)", |b| b);
    assert!(outcome.result.is_ok());
    assert_eq!(outcome.engine.return_value(), Some(49.0));
}

const RECURSIVE_ECHO: &str = "\
FN down(n)
IF n <= 1
RET 1
ENDIF
CALL down(n - 1)
OUT n
ENDFN
CALL down(3)";

#[test]
fn recursion_per_call_parameters_are_isolated() {
    assert_eq!(output_of(RECURSIVE_ECHO), "2\n3\n");
}

#[test]
fn recursion_shared_parameters_are_clobbered() {
    let outcome = execute(RECURSIVE_ECHO, |b| b.param_scoping(ParamScoping::Shared));
    assert!(outcome.result.is_ok());
    assert_eq!(outcome.output, "1\n1\n");
}

#[test]
fn recursion_through_globals_agrees_in_both_modes() {
    let source = "\
EC acc 1
FN fact(n)
IF n > 1
MUL acc n
CALL fact(n - 1)
ENDIF
ENDFN
CALL fact(5)
OUT acc";
    assert_eq!(output_of(source), "120\n");
    let shared = execute(source, |b| b.param_scoping(ParamScoping::Shared));
    assert_eq!(shared.output, "120\n");
}

#[test]
fn classes_are_metadata() {
    let source = "\
CLASS Point
EC x 0
EC y 0
FN show()
OUT \"pt\"
ENDFN
ENDCLASS
NEW p Point";
    let outcome = execute(source, |b| b);
    assert!(outcome.result.is_ok());
    assert!(matches!(
        outcome.engine.variable("p"),
        Some(Value::Object(id)) if id.index() == 0
    ));
    assert_eq!(outcome.engine.classes()[0].members, vec!["x", "y"]);

    assert_eq!(
        error_of(&format!("{source}\nCALL show")).map(|e| e.code()),
        Some(ErrorCode::E6009)
    );
    assert_eq!(
        error_of("NEW q Missing").map(|e| e.message()).as_deref(),
        Some("Class 'Missing' not found")
    );
}

#[test]
fn console_input() {
    let source = "\
IN name \"Name? \"
IN age
ADD age 1
OUT name + \" \" + age
IN gone";
    let outcome = execute(source, |b| b.input_handler(scripted_input(["Ada", "36"])));
    assert!(outcome.result.is_ok());
    assert_eq!(outcome.output, "Name? Ada 37\n");
    assert_eq!(outcome.engine.variable("name"), Some(&Value::Str("Ada".into())));
    assert_eq!(outcome.engine.variable("gone"), None);
}

fn with_runner(source: &str, runner: &SharedProcessRunner) -> Outcome {
    let runner = runner.clone();
    execute(source, move |b| b.process_runner(runner))
}

#[test]
fn exec_captures_text() {
    let runner = scripted_runner(["hi", "42", ""]);
    let outcome = with_runner("EXEC \"echo hi\" out\nEXEC \"echo 42\" n\nEXEC ls -la", &runner);
    assert!(outcome.result.is_ok());
    assert_eq!(outcome.engine.variable("out"), Some(&Value::Str("hi".into())));
    assert_eq!(outcome.engine.variable("n"), Some(&Value::Str("42".into())));
    assert_eq!(
        runner.recorded_commands(),
        vec!["echo hi", "echo 42", "ls -la"]
    );
}

#[test]
fn pyrun_builds_command_and_retypes() {
    let runner = scripted_runner(["16", "done"]);
    let outcome = with_runner(
        "PYRUN \"helper.py\" square(4) r\nPYRUN \"job.py\" status",
        &runner,
    );
    assert!(outcome.result.is_ok());
    assert_eq!(outcome.engine.variable("r"), Some(&Value::Number(16.0)));
    assert_eq!(
        outcome.engine.variable("status"),
        Some(&Value::Str("done".into()))
    );
    assert_eq!(
        runner.recorded_commands(),
        vec![
            python_command("helper.py", Some(("square", "4"))),
            python_command("job.py", None),
        ]
    );
}

#[test]
fn crun_compiles_into_temporary_binary() {
    let runner = scripted_runner(["Hello from C"]);
    let outcome = with_runner("CRUN \"hello.c\" out", &runner);
    assert!(outcome.result.is_ok());
    assert_eq!(
        outcome.engine.variable("out"),
        Some(&Value::Str("Hello from C".into()))
    );
    let commands = runner.recorded_commands();
    assert_eq!(commands.len(), 1);
    assert!(commands[0].starts_with("gcc -o \""));
    assert!(commands[0].contains(" \"hello.c\" -lm 2>&1 && "));
}

#[test]
fn malformed_statements() {
    for source in ["EC", "SET x", "ARR a", "ADD x", "NEW p", "IN", "CALL", "CRUN hello.c", "EC s \"open"] {
        let setup = format!("EC x 1\n{source}");
        assert_eq!(
            error_of(&setup).map(|e| e.code()),
            Some(ErrorCode::E1002),
            "{source}"
        );
    }
}

#[test]
fn runtime_errors() {
    assert_eq!(
        error_of("EC x 1\nDIV x 0").map(|e| e.code()),
        Some(ErrorCode::E6007)
    );
    assert_eq!(
        error_of("EC x 1\nMOD x 0").map(|e| e.message()).as_deref(),
        Some("Modulo by zero.")
    );
    assert_eq!(
        error_of("OUT 1 +").map(|e| e.code()),
        Some(ErrorCode::E6008)
    );
    assert_eq!(
        error_of("CALL nowhere(1)").map(|e| e.code()),
        Some(ErrorCode::E6009)
    );
}

#[test]
fn structural_errors_report_lines() {
    let unexpected = error_of("OUT 1\nENDLOOP");
    assert_eq!(unexpected.as_ref().map(EcError::code), Some(ErrorCode::E1001));
    assert_eq!(unexpected.as_ref().and_then(EcError::line), Some(2));

    let missing = error_of("OUT 1\nIF 1\nOUT 2");
    assert_eq!(missing.as_ref().and_then(EcError::line), Some(2));
    assert_eq!(
        missing.map(|e| e.message()).as_deref(),
        Some("Missing ENDIF for IF")
    );
}

#[test]
fn runtime_error_trace_through_nested_calls() {
    let source = "\
FN inner
OUT undefined_thing
ENDFN
FN outer
CALL inner
ENDFN
CALL outer";
    let err = error_of(source);
    assert_eq!(
        err.map(|e| e.backtrace().to_string()).as_deref(),
        Some("  at line 5 (in outer)\n  at line 7 (in main)\n")
    );
}
