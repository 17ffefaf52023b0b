pub(crate) mod core;
pub(crate) mod debounce;
pub(crate) mod error;
