// src/services/mod.rs
pub mod aligner;
pub mod client;
pub mod coalescer;
pub mod dashboard;
pub mod parameters;
pub mod presentation;
pub mod search;
pub mod selection;
