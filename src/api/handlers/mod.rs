pub mod auth;
pub mod health;
pub mod pages;
pub mod posts;

pub use self::health::health;
