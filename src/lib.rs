pub mod calendar;
pub mod config;
pub mod events;
pub mod planner;
pub mod session;
pub mod submit;
pub mod ui;
