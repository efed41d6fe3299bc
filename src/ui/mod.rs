//! egui rendering: panels, data tables and charts.

pub mod panels;
pub mod plot;
pub mod table;
