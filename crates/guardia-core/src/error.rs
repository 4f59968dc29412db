#[derive(Debug, thiserror::Error)]
pub enum GuardiaError {
    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("failed to parse schedule: {0}")]
    Parse(String),

    #[error("unknown duty region '{0}'. Known regions: cuellar, el-espinar, segovia-capital, segovia-rural")]
    UnknownRegion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
