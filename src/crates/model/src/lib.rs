pub mod comment;
pub mod interaction;
pub mod media;
pub mod user;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid info type. Please specify either title, plot, rating, or all")]
    InvalidInfoType(String),
}
