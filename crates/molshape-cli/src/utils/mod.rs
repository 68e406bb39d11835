pub mod parser;
pub mod progress;
pub mod report;
