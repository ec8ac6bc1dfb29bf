use crate::services::ocr::DecodeFailure;

/// Run `decode` with `first_preprocess`; if it fails, run it exactly once more
/// with the opposite preprocessing mode. The second failure is returned as is.
pub fn attempt_with_fallback<T, F>(
    what: &str,
    first_preprocess: bool,
    mut decode: F,
) -> Result<T, DecodeFailure>
where
    F: FnMut(bool) -> Result<T, DecodeFailure>,
{
    match decode(first_preprocess) {
        Ok(value) => Ok(value),
        Err(first) => {
            tracing::debug!(
                what,
                preprocess = first_preprocess,
                debug = %first.debug,
                "decode failed, retrying with other preprocessing mode"
            );
            decode(!first_preprocess)
        }
    }
}
