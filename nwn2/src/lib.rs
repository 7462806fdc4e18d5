pub mod batch;
pub mod erf;
pub mod error;
pub mod mdb;
pub mod resources;
pub mod restype;
