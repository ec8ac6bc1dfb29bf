pub mod config;
pub mod item;
pub mod landmark;
pub mod roi;
