pub mod unstable;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::annotation::format::format_inline;
use crate::annotation::{Annotation, annotate, snapshot};
use crate::error::{Error, Report};
use crate::result;

/// Outcome of every decode: the typed value, or an annotation saying why not.
pub type DecodeResult<T> = Result<T, Annotation>;

/// Reason handed to [`Acceptor::err`]: a message annotated on the input, or
/// a complete annotation used as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    Message(String),
    Annotation(Annotation),
}

impl From<&str> for Rejection {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

impl From<String> for Rejection {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl From<Annotation> for Rejection {
    fn from(annotation: Annotation) -> Self {
        Self::Annotation(annotation)
    }
}

/// The `ok`/`err` constructors given to an acceptance function, bound to the
/// input being decoded.
///
/// Both constructors consume the acceptor, so an acceptance function can
/// settle an input at most once.
pub struct Acceptor<'a> {
    blob: &'a Value,
}

impl<'a> Acceptor<'a> {
    fn new(blob: &'a Value) -> Self {
        Self { blob }
    }

    /// The raw input this acceptor annotates on rejection.
    pub fn blob(&self) -> &'a Value {
        self.blob
    }

    pub fn ok<T>(self, value: T) -> DecodeResult<T> {
        Ok(value)
    }

    /// Rejects the input. A message is annotated on the raw input; an
    /// annotation passes through unchanged.
    pub fn err<T>(self, rejection: impl Into<Rejection>) -> DecodeResult<T> {
        match rejection.into() {
            Rejection::Message(message) => Err(annotate(self.blob.clone(), message)),
            Rejection::Annotation(annotation) => Err(annotation),
        }
    }
}

type AcceptFn<T> = dyn Fn(&Value, Acceptor<'_>) -> DecodeResult<T> + Send + Sync;

/// A decoder built by [`define`]. Cloning shares the acceptance function.
pub struct Define<T> {
    accept: Arc<AcceptFn<T>>,
}

impl<T> Clone for Define<T> {
    fn clone(&self) -> Self {
        Self {
            accept: Arc::clone(&self.accept),
        }
    }
}

impl<T> fmt::Debug for Define<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Define").finish_non_exhaustive()
    }
}

/// Defines a new decoder from an acceptance function.
///
/// The function receives the raw input and an [`Acceptor`]; it accepts with
/// `accept.ok(value)` or rejects with `accept.err(message)`:
///
/// ```
/// use dynamic_decoders::{Decoder, define};
/// use serde_json::{Value, json};
///
/// let positive = define(|blob, accept| match blob.as_u64() {
///     Some(n) if n > 0 => accept.ok(n),
///     _ => accept.err("Must be a positive integer"),
/// });
/// assert_eq!(positive.value(&json!(7)), Some(7));
/// assert_eq!(positive.value(&Value::Null), None);
/// ```
pub fn define<T, F>(accept: F) -> Define<T>
where
    F: Fn(&Value, Acceptor<'_>) -> DecodeResult<T> + Send + Sync + 'static,
{
    Define {
        accept: Arc::new(accept),
    }
}

impl<T> Decoder for Define<T> {
    type Output = T;

    fn decode(&self, blob: &Value) -> DecodeResult<T> {
        (self.accept)(blob, Acceptor::new(blob))
    }
}

/// Validates a dynamic value into `Self::Output`.
///
/// `decode` is the only required method. Everything else is derived from it,
/// and every combinator returns a new decoder, leaving the receiver intact.
/// Decoders are immutable, so one instance can serve any number of threads.
pub trait Decoder {
    type Output;

    /// Accepts or rejects `blob`. Never panics; failures are data.
    fn decode(&self, blob: &Value) -> DecodeResult<Self::Output>;

    /// Like [`Decoder::decode`], but raises rejections as
    /// [`Error::Decoding`] rendered with [`format_inline`].
    fn verify(&self, blob: &Value) -> Result<Self::Output, Error> {
        self.decode(blob)
            .map_err(|annotation| raise(&annotation, format_inline))
    }

    /// Like [`Decoder::verify`] with a custom formatter. A formatter that
    /// returns text raises [`Error::Decoding`]; one that returns an [`Error`]
    /// raises it unmodified.
    fn verify_with<F, R>(&self, blob: &Value, formatter: F) -> Result<Self::Output, Error>
    where
        Self: Sized,
        F: FnOnce(&Annotation) -> R,
        R: Into<Report>,
    {
        self.decode(blob)
            .map_err(|annotation| raise(&annotation, formatter))
    }

    /// The decoded value, or `None` when rejected.
    fn value(&self, blob: &Value) -> Option<Self::Output> {
        self.decode(blob).ok()
    }

    /// Feeds the decoded value into another acceptance function.
    ///
    /// `next` sees the decoded value rather than the raw input; its acceptor
    /// still annotates the raw input on a message rejection. Failures of
    /// this decoder short-circuit and propagate untouched.
    fn then<V, F>(self, next: F) -> Define<V>
    where
        Self: Sized + Send + Sync + 'static,
        F: Fn(Self::Output, Acceptor<'_>) -> DecodeResult<V> + Send + Sync + 'static,
    {
        define(move |blob, accept| {
            result::and_then(self.decode(blob), |value| next(value, accept))
        })
    }

    /// Maps the decoded value. An `Err` from `transform_fn` rejects, annotated
    /// on the pre-transform value with the error's message.
    fn transform<V, E, F>(self, transform_fn: F) -> Define<V>
    where
        Self: Sized + Send + Sync + 'static,
        Self::Output: Serialize,
        F: Fn(Self::Output) -> Result<V, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        self.then(move |value, _| guarded(&transform_fn, value))
    }

    /// Accepts only decoded values for which `predicate_fn` holds, rejecting
    /// the rest with `errmsg`.
    fn refine<F>(self, predicate_fn: F, errmsg: impl Into<String>) -> Define<Self::Output>
    where
        Self: Sized + Send + Sync + 'static,
        Self::Output: Serialize,
        F: Fn(&Self::Output) -> bool + Send + Sync + 'static,
    {
        let errmsg = errmsg.into();
        self.reject(move |value| (!predicate_fn(value)).then(|| errmsg.clone()))
    }

    /// Rejects decoded values for which `reject_fn` returns a reason.
    ///
    /// Unlike [`Decoder::refine`], the reason can depend on the value. A
    /// message is annotated on the decoded value; an annotation is used as-is.
    fn reject<F, R>(self, reject_fn: F) -> Define<Self::Output>
    where
        Self: Sized + Send + Sync + 'static,
        Self::Output: Serialize,
        F: Fn(&Self::Output) -> Option<R> + Send + Sync + 'static,
        R: Into<Rejection>,
    {
        self.then(move |value, accept| match reject_fn(&value).map(Into::<Rejection>::into) {
            None => accept.ok(value),
            Some(Rejection::Message(message)) => {
                accept.err(annotate(snapshot(&value), message))
            }
            Some(Rejection::Annotation(annotation)) => accept.err(annotation),
        })
    }

    /// Re-describes failures with `message`, keeping the original annotation
    /// as its child. Successes pass through unchanged.
    fn describe(self, message: impl Into<String>) -> Define<Self::Output>
    where
        Self: Sized + Send + Sync + 'static,
    {
        let message = message.into();
        define(move |blob, accept| {
            result::or_else(self.decode(blob), |cause| {
                accept.err(Annotation::wrap(cause, message.clone()))
            })
        })
    }
}

fn raise<F, R>(annotation: &Annotation, formatter: F) -> Error
where
    F: FnOnce(&Annotation) -> R,
    R: Into<Report>,
{
    tracing::debug!(
        reason = annotation.message(),
        children = annotation.children().len(),
        "verification rejected input"
    );
    formatter(annotation).into().into_decoding_error()
}

/// Runs a fallible user mapping, turning its error into an annotation on the
/// pre-mapping value.
pub(crate) fn guarded<T, V, E>(mapper: &impl Fn(T) -> Result<V, E>, value: T) -> DecodeResult<V>
where
    T: Serialize,
    E: fmt::Display,
{
    let before = snapshot(&value);
    mapper(value).map_err(|e| {
        let message = e.to_string();
        tracing::trace!(reason = %message, "mapping rejected decoded value");
        annotate(before, message)
    })
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::{Value, json};

    use super::{DecodeResult, Decoder, Define, Rejection, define};
    use crate::annotation::{Annotation, Child, Location, annotate};
    use crate::error::{Error, Report};

    fn string() -> Define<String> {
        define(|blob, accept| match blob {
            Value::String(s) => accept.ok(s.clone()),
            _ => accept.err("Must be string"),
        })
    }

    fn number() -> Define<f64> {
        define(|blob, accept| match blob.as_f64() {
            Some(n) => accept.ok(n),
            None => accept.err("Must be number"),
        })
    }

    /// Decoders that only implement `decode` get every other operation.
    struct Even;

    impl Decoder for Even {
        type Output = i64;

        fn decode(&self, blob: &Value) -> DecodeResult<i64> {
            match blob.as_i64() {
                Some(n) if n % 2 == 0 => Ok(n),
                _ => Err(annotate(blob.clone(), "Must be even")),
            }
        }
    }

    #[test]
    fn err_with_message_annotates_the_raw_input() {
        let failure = string().decode(&json!(42)).unwrap_err();
        assert_eq!(failure, annotate(json!(42), "Must be string"));
    }

    #[test]
    fn err_with_annotation_passes_it_through() {
        let custom = annotate(json!("elsewhere"), "custom");
        let expected = custom.clone();
        let decoder: Define<()> = define(move |_, accept| accept.err(custom.clone()));
        assert_eq!(decoder.decode(&json!(1)).unwrap_err(), expected);
    }

    #[test]
    fn acceptor_exposes_the_input() {
        let echo = define(|_, accept| {
            let seen = accept.blob().clone();
            accept.ok(seen)
        });
        assert_eq!(echo.decode(&json!({"k": 1})), Ok(json!({"k": 1})));
    }

    #[test]
    fn value_drops_failure_detail() {
        assert_eq!(string().value(&json!("a")), Some("a".to_string()));
        assert_eq!(string().value(&json!(null)), None);
    }

    #[test]
    fn verify_raises_newline_prefixed_decoding_error() {
        assert_eq!(number().verify(&json!(1.5)).unwrap(), 1.5);
        let error = number().verify(&json!("foo")).unwrap_err();
        let Error::Decoding { message } = &error else {
            unreachable!("expected a decoding error, got {error:?}");
        };
        assert_eq!(message, "\n\"foo\"\n^^^^^ Must be number");
        assert!(error.to_string().starts_with("Decoding error:\n"));
    }

    #[test]
    fn verify_with_custom_formatters() {
        let short = number()
            .verify_with(&json!(true), |ann: &Annotation| {
                ann.message().unwrap_or_default().to_string()
            })
            .unwrap_err();
        assert_eq!(short.to_string(), "Decoding error:\nMust be number");

        let raised = number()
            .verify_with(&json!(true), |_: &Annotation| {
                Report::Error(Error::Message {
                    reason: "bespoke".into(),
                })
            })
            .unwrap_err();
        assert!(matches!(raised, Error::Message { ref reason } if reason == "bespoke"));
    }

    #[test]
    fn then_receives_the_decoded_value() {
        let parsed = string().then(|s, accept| match s.parse::<u8>() {
            Ok(n) => accept.ok(n),
            Err(_) => accept.err("Must be a byte"),
        });
        assert_eq!(parsed.decode(&json!("200")), Ok(200));
        // Message rejections from `next` annotate the raw input.
        assert_eq!(
            parsed.decode(&json!("300")).unwrap_err(),
            annotate(json!("300"), "Must be a byte")
        );
    }

    #[test]
    fn then_short_circuits_and_keeps_the_failure() {
        let calls = std::sync::Arc::new(AtomicUsize::new(0));
        let counter = std::sync::Arc::clone(&calls);
        let chained = string().then(move |s, accept| {
            counter.fetch_add(1, Ordering::SeqCst);
            accept.ok(s)
        });
        assert_eq!(
            chained.decode(&json!(3)).unwrap_err(),
            annotate(json!(3), "Must be string")
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn transform_maps_and_catches_failures() {
        let length = string().transform(|s| Ok::<_, Infallible>(s.len()));
        assert_eq!(length.decode(&json!("foo")), Ok(3));

        let int = string().transform(|s| s.parse::<i64>());
        assert_eq!(int.decode(&json!("-12")), Ok(-12));
        let failure = int.decode(&json!("twelve")).unwrap_err();
        assert_eq!(failure.value(), &json!("twelve"));
        assert_eq!(failure.message(), Some("invalid digit found in string"));
    }

    #[test]
    fn transform_annotates_the_pre_transform_value() {
        let halved = number()
            .transform(|n| Ok::<_, Infallible>(n / 2.0))
            .transform(|n| if n > 1.0 { Ok(n) } else { Err("Too small") });
        let failure = halved.decode(&json!(1)).unwrap_err();
        assert_eq!(failure, annotate(json!(0.5), "Too small"));
    }

    #[test]
    fn refine_accepts_iff_predicate_holds() {
        let short = string().refine(|s| s.len() <= 3, "Too long");
        assert_eq!(short.decode(&json!("abc")), Ok("abc".to_string()));
        let failure = short.decode(&json!("abcd")).unwrap_err();
        assert_eq!(failure.message(), Some("Too long"));
        assert_eq!(failure.value(), &json!("abcd"));
        // Failures of the inner decoder are untouched.
        assert_eq!(short.decode(&json!(1)).unwrap_err().message(), Some("Must be string"));
    }

    #[test]
    fn reject_supports_dynamic_reasons() {
        let bounded = number().reject(|n| {
            (*n > 10.0).then(|| format!("{n} exceeds the limit of 10"))
        });
        assert_eq!(bounded.decode(&json!(10)), Ok(10.0));
        assert_eq!(
            bounded.decode(&json!(12)).unwrap_err().message(),
            Some("12 exceeds the limit of 10")
        );

        let with_annotation = number().reject(|n| {
            (*n < 0.0).then(|| {
                Rejection::from(annotate(json!({"got": n}), "Must not be negative"))
            })
        });
        assert_eq!(
            with_annotation.decode(&json!(-1)).unwrap_err(),
            annotate(json!({"got": -1.0}), "Must not be negative")
        );
    }

    #[test]
    fn describe_wraps_failures_and_keeps_successes() {
        let name = string().describe("Must be a name");
        assert_eq!(name.decode(&json!("ann")), Ok("ann".to_string()));

        let failure = name.decode(&json!(5)).unwrap_err();
        assert_eq!(failure.message(), Some("Must be a name"));
        assert_eq!(failure.children().len(), 1);
        assert_eq!(
            failure.children()[0].annotation(),
            &annotate(json!(5), "Must be string")
        );
    }

    #[test]
    fn combinators_leave_the_receiver_untouched() {
        let base = string();
        let refined = base.clone().refine(|s| s.is_empty(), "Must be empty");
        assert_eq!(base.decode(&json!("x")), Ok("x".to_string()));
        assert!(refined.decode(&json!("x")).is_err());
        assert_eq!(base.decode(&json!("x")), Ok("x".to_string()));
    }

    #[test]
    fn hand_written_decoders_get_derived_operations() {
        assert_eq!(Even.value(&json!(4)), Some(4));
        let described = Even.describe("Must be a pair count");
        let failure = described.decode(&json!(3)).unwrap_err();
        assert_eq!(failure.messages(), vec!["Must be a pair count", "Must be even"]);
        assert!(Even.verify(&json!("x")).is_err());
    }

    #[test]
    fn located_children_survive_describe() {
        let pair: Define<()> = define(|blob, accept| {
            accept.err(
                Annotation::new(blob.clone())
                    .with_child(Child::at(Location::Index(0), annotate(json!(1), "bad"))),
            )
        });
        let failure = pair.describe("Must be a pair").decode(&json!([1])).unwrap_err();
        let cause = failure.children()[0].annotation();
        assert_eq!(cause.child_at(&Location::Index(0)).unwrap().message(), Some("bad"));
    }

    #[test]
    fn decoders_are_shareable_across_threads() {
        let decoder = string().refine(|s| s.starts_with('a'), "Must start with a");
        std::thread::scope(|scope| {
            for i in 0..8 {
                let decoder = &decoder;
                scope.spawn(move || {
                    for j in 0..200 {
                        let input = if (i + j) % 2 == 0 { "abc" } else { "xyz" };
                        let out = decoder.decode(&json!(input));
                        assert_eq!(out.is_ok(), input == "abc");
                    }
                });
            }
        });
    }
}
