pub mod bases;
pub mod constants;
pub mod event;
pub mod game;
pub mod player;
pub mod team;
