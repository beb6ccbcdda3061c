pub(crate) mod buffer;
pub(crate) mod driver;
pub(crate) mod pipeline;
