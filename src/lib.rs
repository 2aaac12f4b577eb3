//! Game Night - scheduling for board game sessions
//!
//! Hosts schedule sessions with a fixed number of seats. Players join until
//! the seats run out and then queue on a waitlist; when a seated player
//! leaves or is removed, the earliest waitlisted player takes the seat.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
