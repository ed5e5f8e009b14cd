use crate::AnyResult;
use anyhow::anyhow;
use std::{error::Error, fmt::Display};

/// Lifts foreign results and options into [`AnyResult`], tagging failures with a message
/// describing what was being attempted.
pub trait AnyhowResultExt<T> {
    fn otherwise(self, s: impl Display) -> AnyResult<T>;
}

impl<T, E> AnyhowResultExt<T> for Result<T, E>
where
    E: Error + Send + Sync + 'static,
{
    fn otherwise(self, s: impl Display) -> AnyResult<T> {
        self.map_err(|e| anyhow::Error::from(e).context(s.to_string()))
    }
}

impl<T> AnyhowResultExt<T> for Option<T> {
    fn otherwise(self, s: impl Display) -> AnyResult<T> {
        self.ok_or_else(|| anyhow!("{s}"))
    }
}
