pub mod cli;
pub mod config;
pub mod decoders;
pub mod engine;
pub mod persist;
pub mod pipeline;
pub mod postprocess;
pub mod report;
pub mod upload;
pub mod util;
pub mod validate;
