//! Serpent Skills - skill progression and balance engine for an arcade snake game

pub mod core;
pub mod manager;
pub mod progression;
pub mod session;
pub mod skills;
pub mod ui;
