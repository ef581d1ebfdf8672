pub mod admin;
pub mod games;
pub mod packages;
pub mod teams;
