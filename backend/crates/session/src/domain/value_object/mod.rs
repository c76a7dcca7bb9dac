pub mod credential;
pub mod email;
