pub mod capability;
pub mod catalog;
pub mod club;
pub mod engine;
pub mod entitlement;
pub mod error;
pub mod io;
pub mod limits;
pub mod member;
pub mod parent;
pub mod paths;
pub mod resolver;
pub mod source;
pub mod sync;
pub mod team;

pub use error::{LaxError, Result};
