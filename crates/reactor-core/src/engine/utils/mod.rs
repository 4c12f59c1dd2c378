//! Random draws and vector helpers shared by the search tasks.

pub mod sampling;
