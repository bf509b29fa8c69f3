#![forbid(unsafe_code)]

pub mod model;
pub mod ranking;
pub mod seed;
pub mod time;

pub use time::Clock;
