extern crate nalgebra as na;

pub mod device_id;
pub mod prelude;
pub mod rotation;
pub mod sample;
pub mod time;
