use condfmt::{Engine, Error, ErrorKind};

#[test]
fn compile_empty() {
    Engine::new().compile("").unwrap();
}

#[test]
fn compile_raw() {
    Engine::new().compile("lorem ipsum dolor sit amet").unwrap();
}

#[test]
fn compile_escape_and_lone_percent() {
    Engine::new().compile("100%% and 50% off %").unwrap();
}

#[test]
fn compile_value() {
    Engine::new().compile("lorem %[ipsum]% dolor").unwrap();
}

#[test]
fn compile_value_conversions() {
    for conversions in ["", "j", "u", "l", "J", "ul", "jlu", "uuu"] {
        let source = format!("lorem %[ipsum!{conversions}]%");
        Engine::new().compile(&source).unwrap();
    }
}

#[test]
fn compile_condition() {
    let sources = [
        "%[%ipsum%]%",
        "%[%ipsum%|%%]%",
        "%[%ipsum%|%yes%]%",
        "%[%ipsum%|%yes%|%no%]%",
        "%[% !ipsum %|% yes %|% no %]%",
        "%[%ipsum!r%|%yes%]%",
        "%[%ipsum!RR%|%yes%]%",
        "%[%\n\t!ipsum!r\r\n%|%yes%]%",
    ];
    for source in sources {
        Engine::new().compile(source).unwrap();
    }
}

#[test]
fn compile_condition_nested() {
    Engine::new()
        .compile("%[%a%|%%[%b%|%%[%c%|%%[d]%%]%%|%e%]%%|%f%]%")
        .unwrap();
}

#[test]
fn compile_condition_deeply_nested() {
    let source = format!("{}x{}", "%[%a%|%".repeat(64), "%]%".repeat(64));
    Engine::new().compile(&source).unwrap();
}

#[test]
fn compile_err_condition_nested_too_deep() {
    for depth in [65, 2000, 100_000] {
        let source = format!("{}x{}", "%[%a%|%".repeat(depth), "%]%".repeat(depth));
        let err = Engine::new().compile(&source).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(
            err.to_string(),
            "exceeded maximum condition nesting depth (64) between bytes 448 and 455"
        );
    }
}

#[test]
fn compile_err_unclosed_value() {
    let err = Engine::new().compile("lorem %[ipsum").unwrap_err();
    assert_err(
        &err,
        "unclosed value tag, expected `]%`",
        "
   |
 1 | lorem %[ipsum
   |       ^^ unclosed value tag, expected `]%`
",
    );
}

#[test]
fn compile_err_unclosed_value_nested_tag() {
    let err = Engine::new().compile("lorem %[ipsum%[dolor]%").unwrap_err();
    assert_err(
        &err,
        "unclosed value tag, expected `]%`",
        "
   |
 1 | lorem %[ipsum%[dolor]%
   |       ^^ unclosed value tag, expected `]%`
",
    );
}

#[test]
fn compile_err_unclosed_condition() {
    let err = Engine::new().compile("lorem %[% ipsum %|% dolor").unwrap_err();
    assert_err(
        &err,
        "unclosed condition, expected `%]%`",
        "
   |
 1 | lorem %[% ipsum %|% dolor
   |       ^^^^^^^^^^^^^ unclosed condition, expected `%]%`
",
    );
}

#[test]
fn compile_err_unclosed_condition_reports_outermost() {
    let err = Engine::new()
        .compile("%[% a %|% %[% b %|% x %]%")
        .unwrap_err();
    assert_err(
        &err,
        "unclosed condition, expected `%]%`",
        "
   |
 1 | %[% a %|% %[% b %|% x %]%
   | ^^^^^^^^^ unclosed condition, expected `%]%`
",
    );
}

#[test]
fn compile_err_unclosed_condition_tag() {
    let err = Engine::new().compile("lorem %[% ipsum").unwrap_err();
    assert_err(
        &err,
        "unclosed condition tag, expected `%|%` or `%]%`",
        "
   |
 1 | lorem %[% ipsum
   |       ^^^ unclosed condition tag, expected `%|%` or `%]%`
",
    );
}

#[test]
fn compile_err_pipe_outside_condition() {
    let err = Engine::new().compile("lorem %|% ipsum").unwrap_err();
    assert_err(
        &err,
        "unexpected `%|%` outside of a condition",
        "
   |
 1 | lorem %|% ipsum
   |       ^^^ unexpected `%|%` outside of a condition
",
    );
}

#[test]
fn compile_err_end_outside_condition() {
    let err = Engine::new().compile("lorem %]% ipsum").unwrap_err();
    assert_err(
        &err,
        "unexpected `%]%` outside of a condition",
        "
   |
 1 | lorem %]% ipsum
   |       ^^^ unexpected `%]%` outside of a condition
",
    );
}

#[test]
fn compile_err_incomplete_pipe() {
    let err = Engine::new().compile("lorem %| ipsum").unwrap_err();
    assert_err(
        &err,
        "expected `%|%`, use `%%` for a literal percent sign",
        "
   |
 1 | lorem %| ipsum
   |       ^^ expected `%|%`, use `%%` for a literal percent sign
",
    );
}

#[test]
fn compile_err_incomplete_end() {
    let err = Engine::new().compile("lorem %]").unwrap_err();
    assert_err(
        &err,
        "expected `%]%`, use `%%` for a literal percent sign",
        "
   |
 1 | lorem %]
   |       ^^ expected `%]%`, use `%%` for a literal percent sign
",
    );
}

#[test]
fn compile_err_unexpected_character_in_value() {
    let err = Engine::new().compile("lorem %[ ipsum ]%").unwrap_err();
    assert_err(
        &err,
        "unexpected character",
        "
   |
 1 | lorem %[ ipsum ]%
   |         ^ unexpected character
",
    );
}

#[test]
fn compile_err_empty_value() {
    let err = Engine::new().compile("lorem %[]%").unwrap_err();
    assert_err(
        &err,
        "expected identifier, found `]%`",
        "
   |
 1 | lorem %[]%
   |         ^^ expected identifier, found `]%`
",
    );
}

#[test]
fn compile_err_empty_condition() {
    let err = Engine::new().compile("lorem %[%%|% ipsum %]%").unwrap_err();
    assert_err(
        &err,
        "expected identifier, found `%|%`",
        "
   |
 1 | lorem %[%%|% ipsum %]%
   |          ^^^ expected identifier, found `%|%`
",
    );
}

#[test]
fn compile_err_unknown_value_conversion() {
    let err = Engine::new().compile("lorem %[ipsum!jx]%").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownConversion);
    assert_err(
        &err,
        "unknown conversion `x`",
        "
   |
 1 | lorem %[ipsum!jx]%
   |                ^ unknown conversion `x`
",
    );
}

#[test]
fn compile_err_unknown_condition_conversion() {
    let err = Engine::new()
        .compile("lorem %[% ipsum!q %|% x %]%")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownConversion);
    assert_err(
        &err,
        "unknown conversion `q`",
        "
   |
 1 | lorem %[% ipsum!q %|% x %]%
   |                 ^ unknown conversion `q`
",
    );
}

#[test]
fn compile_err_unicode_column() {
    let err = Engine::new().compile("héllo %[wörld]%").unwrap_err();
    assert_eq!(err.line_col(), Some((1, 10)));
    assert_err(
        &err,
        "unexpected character",
        "
   |
 1 | héllo %[wörld]%
   |          ^ unexpected character
",
    );
}

#[test]
fn compile_err_second_line() {
    let err = Engine::new()
        .compile("line one\nline two %[ping")
        .unwrap_err();
    assert_eq!(err.line_col(), Some((2, 10)));
    assert_err(
        &err,
        "unclosed value tag, expected `]%`",
        "
   |
 2 | line two %[ping
   |          ^^ unclosed value tag, expected `]%`
",
    );
}

#[test]
fn compile_err_display() {
    let err = Engine::new().compile("lorem %|% ipsum").unwrap_err();
    assert_eq!(
        err.to_string(),
        "unexpected `%|%` outside of a condition between bytes 6 and 9"
    );
    assert_eq!(format!("{err:?}"), format!("{err:#}"));
}

#[track_caller]
fn assert_err(err: &Error, msg: &str, pretty: &str) {
    assert_eq!(err.kind(), kind_of(msg));
    assert_eq!(err.message(), msg);
    assert_eq!(err.identifier(), None);
    assert_eq!(format!("{err:#}"), pretty);
}

fn kind_of(msg: &str) -> ErrorKind {
    if msg.starts_with("unknown conversion") {
        ErrorKind::UnknownConversion
    } else {
        ErrorKind::Syntax
    }
}
