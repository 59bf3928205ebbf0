pub mod comment;
pub mod helper;
pub mod interaction;
pub mod media;
pub mod user;
