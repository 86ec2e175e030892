pub mod artifact;
pub mod csv;
pub mod page;
pub mod ranking;
pub mod upload;
