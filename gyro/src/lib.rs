pub extern crate nalgebra as na;

pub mod calibration;
pub mod channel;
pub mod clip;
pub mod clock;
pub mod config;
pub mod error;
pub mod integrator;
pub mod pipeline;
pub mod replay;
pub mod reports;
pub mod status;
pub mod units;
pub mod vibration;
