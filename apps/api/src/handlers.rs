pub mod email;
pub mod health;
pub mod registration;
pub mod tokens;
pub mod users;
