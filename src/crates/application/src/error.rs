use domain::comment::CommentError;
use domain::interaction::InteractionError;
use domain::media::MediaError;
use domain::user::UserError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Unprocessable(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    AuthError(String),
    #[error("Repository error: {0}: {1}")]
    RepositoryError(String, String),
    #[error("Metadata provider error: {0}")]
    MetadataError(String),

    #[error(transparent)]
    UserError(#[from] UserError),
    #[error(transparent)]
    MediaError(#[from] MediaError),
    #[error(transparent)]
    InteractionError(#[from] InteractionError),
    #[error(transparent)]
    CommentError(#[from] CommentError),

    #[error("Unknown error: {0}")]
    UnknownError(String),
}
