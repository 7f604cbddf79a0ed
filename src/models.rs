pub mod members;
pub mod network;
