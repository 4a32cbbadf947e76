pub mod analysis;
pub mod classify;
pub mod consts;
pub mod detection;
pub mod error;
pub mod features;
pub mod filters;
pub mod frame;
pub mod io;
pub mod motion;
pub mod sampler;
