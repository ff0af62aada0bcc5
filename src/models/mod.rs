pub mod cart;
pub mod common;
pub mod delivery;
pub mod order;
pub mod restaurant;
pub mod user;
