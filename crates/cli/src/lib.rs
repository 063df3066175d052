//! localfonts CLI library.

pub mod cli;
