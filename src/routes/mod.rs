pub mod health;
pub mod letters;
