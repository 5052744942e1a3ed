use thiserror::Error;

pub type GoalsheetResult<T> = Result<T, GoalsheetError>;

#[derive(Error, Debug)]
pub enum GoalsheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML session error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No student at position {0}")]
    StudentNotFound(usize),

    #[error("Unknown goal column: {0}")]
    UnknownGoal(String),
}
