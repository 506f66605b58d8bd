pub mod assembler;
pub mod report;

pub use assembler::{assemble, assemble_direct, TripRequest};
pub use report::print_report;
