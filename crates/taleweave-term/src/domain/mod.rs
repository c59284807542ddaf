//! Core domain logic for the story wizard.
//!
//! This module contains the session, scene and cursor models and the wizard
//! that drives them, independent of how the terminal renders anything.

pub mod models;
pub mod services;
