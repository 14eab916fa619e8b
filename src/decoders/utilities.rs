use crate::decoder::{Decoder, Define, define};

/// Builds the inner decoder only when decoding, so a decoder can refer to
/// itself (directly or through others) without recursing at construction.
pub fn lazy<D, F>(make: F) -> Define<D::Output>
where
    D: Decoder,
    F: Fn() -> D + Send + Sync + 'static,
{
    define(move |blob, _| make().decode(blob))
}
