use std::borrow::Cow;

#[test]
fn idsrv_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/idsrv_error_pass.rs");
    t.compile_fail("tests/ui/idsrv_error_no_context.rs");
    t.compile_fail("tests/ui/idsrv_error_tuple_variant.rs");
}

#[idsrv_derive::idsrv_error]
pub enum SampleError {
    #[error("Sample I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Internal sample error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[test]
fn context_is_rendered_in_display() {
    let result: Result<(), std::io::Error> =
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
    let err = result.context("reading sample").unwrap_err();
    assert_eq!(err.to_string(), "Sample I/O error (reading sample): gone");
}

#[test]
fn internal_converts_from_strings() {
    let err: SampleError = "boom".into();
    assert!(matches!(err, SampleError::Internal { .. }));
    assert_eq!(err.to_string(), "Internal sample error: boom");

    let err: SampleError = format!("code {}", 7).into();
    assert_eq!(err.to_string(), "Internal sample error: code 7");
}

#[test]
fn kind_reports_variant_name() {
    let io: SampleError = std::io::Error::other("x").into();
    assert_eq!(io.kind(), "Io");

    let internal: SampleError = "y".into();
    assert_eq!(internal.kind(), "Internal");
}
