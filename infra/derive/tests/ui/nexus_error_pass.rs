use nexus_derive::nexus_error;
use std::borrow::Cow;

#[nexus_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Lookup failed{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<String, DemoError> {
    std::fs::read_to_string("/definitely/missing").context("reading fixture")
}

fn main() {
    let err = read().unwrap_err();
    assert_eq!(err.kind(), "Io");
    assert!(err.to_string().contains("(reading fixture)"));

    let err: DemoError = "boom".into();
    assert_eq!(err.kind(), "Internal");

    let err: Result<(), DemoError> =
        Err(DemoError::NotFound { message: "x".into(), context: None });
    let err = err.context("lookup").unwrap_err();
    assert_eq!(err.to_string(), "Lookup failed (lookup): x");
}
