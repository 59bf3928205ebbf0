use thiserror::Error;

pub mod dao;
pub mod get_comments;
pub mod get_interactions;
pub mod get_media;
pub mod get_users;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    InvalidParameter(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Execution error: {0}")]
    ExecutionError(String),
    #[error("Database error: {0}")]
    DbError(String),
}
