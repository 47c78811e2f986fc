pub mod calibration;
pub mod config;
pub mod forward;
pub mod response;
pub mod sampling;
