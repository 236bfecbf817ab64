pub mod health;
pub mod resource;
pub mod shared;
