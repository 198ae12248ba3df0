//! Domain layer: the value types flowing through the report and the port
//! through which source tables reach the application layer.

pub mod attempt;
pub mod event;
pub mod import;
pub mod outcome;
pub mod policy;
pub mod ports;
pub mod report;
pub mod sentinel;
pub mod timestamp;
