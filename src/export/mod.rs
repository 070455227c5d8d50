pub mod glb_writer;
pub mod json_writer;

pub use glb_writer::write_glb;
pub use json_writer::write_geometry_json;
