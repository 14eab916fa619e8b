//! Named operations over [`std::result::Result`].
//!
//! `Result` already is the two-variant outcome type; these functions spell out
//! the algebra decoders are built from. Raising means returning
//! `Err(crate::Error)`.

use crate::error::{Error, Report};

pub fn ok<T, E>(value: T) -> Result<T, E> {
    Ok(value)
}

pub fn err<T, E>(error: E) -> Result<T, E> {
    Err(error)
}

/// Returns the success value, or raises the stored error as-is.
pub fn unwrap<T, E>(result: Result<T, E>) -> Result<T, Error>
where
    E: Into<Error>,
{
    result.map_err(Into::into)
}

/// Like [`unwrap`], but raises `report` instead of the stored error.
pub fn expect<T, E>(result: Result<T, E>, report: impl Into<Report>) -> Result<T, Error> {
    match result {
        Ok(value) => Ok(value),
        Err(_) => Err(report.into().into_error()),
    }
}

pub fn dispatch<T, E, O>(
    result: Result<T, E>,
    on_ok: impl FnOnce(T) -> O,
    on_err: impl FnOnce(E) -> O,
) -> O {
    match result {
        Ok(value) => on_ok(value),
        Err(error) => on_err(error),
    }
}

/// Evaluates `next` only on success.
pub fn and_then<T, E, T2>(
    result: Result<T, E>,
    next: impl FnOnce(T) -> Result<T2, E>,
) -> Result<T2, E> {
    match result {
        Ok(value) => next(value),
        Err(error) => Err(error),
    }
}

/// Evaluates `recover` only on failure.
pub fn or_else<T, E, E2>(
    result: Result<T, E>,
    recover: impl FnOnce(E) -> Result<T, E2>,
) -> Result<T, E2> {
    match result {
        Ok(value) => Ok(value),
        Err(error) => recover(error),
    }
}

pub fn map_ok<T, E, T2>(result: Result<T, E>, mapper: impl FnOnce(T) -> T2) -> Result<T2, E> {
    and_then(result, |value| Ok(mapper(value)))
}

pub fn map_error<T, E, E2>(result: Result<T, E>, mapper: impl FnOnce(E) -> E2) -> Result<T, E2> {
    or_else(result, |error| Err(mapper(error)))
}
