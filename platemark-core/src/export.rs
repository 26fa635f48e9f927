pub mod archive;
pub mod backend;
pub mod orchestrator;
