pub mod generator;
pub mod pipeline;
pub mod poller;
pub mod replicate;
pub mod runner;
pub mod stages;
