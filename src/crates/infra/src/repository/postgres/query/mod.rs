pub mod comment;
pub mod interaction;
pub mod media;
pub mod user;

pub use comment::CommentDaoImpl;
pub use interaction::InteractionDaoImpl;
pub use media::MediaDaoImpl;
pub use user::UserDaoImpl;
