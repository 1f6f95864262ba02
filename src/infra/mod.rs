pub mod duty;
pub mod export;
