pub mod comment;
pub mod interaction;
pub mod media;
pub mod user;
pub mod value;
