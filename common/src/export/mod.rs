//! Export core modules shared by the CLI wrapper.

#[cfg(feature = "excel")]
pub mod excel_core;

pub mod rows;
