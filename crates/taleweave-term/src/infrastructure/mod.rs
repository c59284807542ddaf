//! Infrastructure layer providing external integrations.
//!
//! This module wires the story workflow client to the configured service.

pub mod clients;
