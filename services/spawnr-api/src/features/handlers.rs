pub mod cluster;
pub mod deployment;
pub mod job;
pub mod namespace;
