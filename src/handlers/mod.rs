pub(crate) mod admin;
pub(crate) mod combinations;
pub(crate) mod packages;
pub(crate) mod teams;
