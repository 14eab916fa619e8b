use either::Either;

use crate::annotation::{Annotation, Child};
use crate::decoder::{Decoder, Define, define};

/// Accepts what either decoder accepts, trying `left` first.
///
/// When both reject, the annotation carries both failures as causes.
pub fn either<L, R>(left: L, right: R) -> Define<Either<L::Output, R::Output>>
where
    L: Decoder + Send + Sync + 'static,
    R: Decoder + Send + Sync + 'static,
{
    define(move |blob, accept| {
        let left_failure = match left.decode(blob) {
            Ok(value) => return accept.ok(Either::Left(value)),
            Err(failure) => failure,
        };
        match right.decode(blob) {
            Ok(value) => accept.ok(Either::Right(value)),
            Err(right_failure) => accept.err(
                Annotation::new(blob.clone())
                    .with_message("Either:")
                    .with_children([Child::cause(left_failure), Child::cause(right_failure)]),
            ),
        }
    })
}
