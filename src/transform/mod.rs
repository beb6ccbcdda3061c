pub(crate) mod complex;
pub(crate) mod coords;
pub(crate) mod spiral;
