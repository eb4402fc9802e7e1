use crate::error::ProviderError;

use super::NarrativeContext;

/// Something that can turn a scored assessment into advisory text
pub trait NarrativeProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// One attempt, no retries. Any failure is recoverable by the caller.
    fn generate(&self, context: &NarrativeContext) -> Result<String, ProviderError>;
}
