pub mod api;
pub mod board;
pub mod calendar;
pub mod config;
pub mod error;
pub mod ids;
pub mod model;
pub mod operation;
pub mod state;
pub mod stats;
pub mod storage;
