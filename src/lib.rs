//! Downtime Dash: the arcade runner shown while the site backend is down.
//!
//! `entities` holds pure data, `compute` the simulation, `display` the
//! renderer.  `session` ties them to input, sound and the leaderboard.

pub mod audio;
pub mod clock;
pub mod compute;
pub mod config;
pub mod constants;
pub mod display;
pub mod entities;
pub mod error;
pub mod input;
pub mod leaderboard;
pub mod session;
