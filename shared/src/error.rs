/// Failures the pipeline surfaces to its caller.
///
/// Unavailable sub-queries and failed persistence writes are contained where
/// they happen and only logged, so they have no variant here.
#[derive(Debug, thiserror::Error)]
pub enum WrappedError {
    #[error("no identity data available for the credential")]
    NoIdentityData,
    #[error("story compilation failed: {0}")]
    CompilationFailed(String),
}

impl From<ManifestError> for WrappedError {
    fn from(error: ManifestError) -> Self {
        Self::CompilationFailed(error.to_string())
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ManifestError {
    #[error("expected exactly {expected} scenes, got {actual}")]
    SceneCount { expected: usize, actual: usize },
    #[error("malformed manifest: {0}")]
    Malformed(String),
}
