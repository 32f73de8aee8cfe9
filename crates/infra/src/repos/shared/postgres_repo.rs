use tracing::warn;

/// Lookups that answer with an `Option` cannot tell the caller that the
/// store failed, so the error is logged and reported as not found.
pub fn found_or_warn<T, E: std::fmt::Debug>(
    res: Result<Option<T>, E>,
    lookup: &str,
) -> Option<T> {
    match res {
        Ok(found) => found,
        Err(e) => {
            warn!("[Store Error] {} failed. Error message: {:?}", lookup, e);
            None
        }
    }
}
