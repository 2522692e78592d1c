//! Asteroids for the terminal: a fixed-step simulation of the classic
//! arcade game with a ratatui front end.

pub mod app;
pub mod audio;
pub mod config;
pub mod error;
pub mod event;
pub mod game;
pub mod input;
pub mod scores;
pub mod ui;
