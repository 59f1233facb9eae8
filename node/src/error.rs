use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("oracle error: {0}")]
    Oracle(#[from] oracle_keeper::OracleError),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
