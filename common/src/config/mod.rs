//! Loaders for the content configuration files named in spec §6: the grid
//! (handled by [`crate::map::MapTopology`]), the load→city mapping, and the
//! demand deck. These files are external collaborators, not content this
//! crate invents; the loaders only parse the schema and validate shape.

pub mod demand;
pub mod loads;
