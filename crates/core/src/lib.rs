#![deny(warnings)]

pub mod config;
pub mod history;
pub mod input;
pub mod playback;
pub mod session;
pub mod surface;
pub mod synth;
