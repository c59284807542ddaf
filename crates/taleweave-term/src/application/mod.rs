//! Application layer orchestrating the terminal interface.
//!
//! This module handles command-line arguments and the interactive loop that
//! renders panels and turns terminal input into wizard events.

pub mod cli;
pub mod ui;
