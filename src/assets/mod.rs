pub(crate) mod image_io;
