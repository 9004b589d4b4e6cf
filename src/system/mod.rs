pub(crate) mod logger;
pub(crate) mod output;
pub(crate) mod signals;
