//! Output generation for the aggregated patient tables.

pub mod csv;
pub mod frame;

pub use csv::{write_csv_outputs, write_table_csv};
pub use frame::{TableFrame, table_frame, table_frames};
