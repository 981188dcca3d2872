pub mod data;
pub mod emissions;
