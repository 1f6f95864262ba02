pub mod links;
pub mod persistence;
pub mod version;
