use bitf_derive::bitf_error;
use std::borrow::Cow;

#[bitf_error]
#[derive(Debug)]
pub enum PlainError {
    #[error("Bad position{}: {message}", format_context(.context))]
    Range { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Bad name: {message}")]
    Name { message: Cow<'static, str> },
}

fn main() {
    let err = PlainError::Name { message: "FLAG_9".into() };
    assert!(err.context_str().is_none());
}
