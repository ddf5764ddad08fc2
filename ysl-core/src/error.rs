use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to read source: {0}")]
    SourceIo(#[from] std::io::Error),
    #[error("failed to parse provisional tree: {0}")]
    TreeSyntax(#[from] serde_yaml::Error),
    #[error("malformed provisional tree: {0}")]
    InvalidTree(String),
    #[error("unknown node: {0}")]
    UnknownNode(String),
    #[error("unresolved pattern reference '${name}' in template `{template}`")]
    UnresolvedPattern { name: String, template: String },
    #[error("pattern '{name}' failed to compile: {source}")]
    BadPattern {
        name: String,
        #[source]
        source: regex::Error,
    },
    #[error("internal error: {0}")]
    Internal(String),
    #[error("load path not configured: YSLPATH is unset and the document has no directory")]
    MissingLoadPath,
}
