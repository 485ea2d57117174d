//! Rotation cycle management
//!
//! This module handles rotation configuration, closures, cycle-day
//! resolution, reminder rules and notice assembly.

pub mod closure;
pub mod config;
pub mod context;
pub mod notice;
pub mod resolver;
pub mod rules;
