//! Utility functions for the connector

pub mod time;
