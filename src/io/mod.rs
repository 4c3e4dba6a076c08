pub mod reader;
pub mod reporting;
