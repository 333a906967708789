pub mod enhancement;
pub mod generate;
pub mod image;
pub mod job;
