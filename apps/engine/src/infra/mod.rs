pub mod checkpoint;
pub mod deps;
