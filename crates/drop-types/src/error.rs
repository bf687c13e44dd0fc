/// Image reference resolution error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRefError {
    Malformed(String),
    UnsupportedKind(String),
}

impl std::fmt::Display for ImageRefError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(r) => write!(f, "malformed image reference: {r}"),
            Self::UnsupportedKind(kind) => write!(f, "unsupported asset kind: {kind}"),
        }
    }
}

impl std::error::Error for ImageRefError {}
