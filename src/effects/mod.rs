pub(crate) mod composite;
pub(crate) mod params;
pub(crate) mod sample;
