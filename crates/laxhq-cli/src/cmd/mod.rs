pub mod capabilities;
pub mod catalog;
pub mod club;
pub mod entitlement;
pub mod import;
pub mod init;
pub mod member;
pub mod serve;
pub mod team;
