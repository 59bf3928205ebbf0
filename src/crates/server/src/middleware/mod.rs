pub mod jwt_verify;
pub mod other;
