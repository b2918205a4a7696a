pub mod catalog;
pub mod members;
pub mod state;
pub mod teams;
