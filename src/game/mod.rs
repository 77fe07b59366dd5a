pub mod collision;
pub mod combat;
pub mod components;
pub mod draw;
pub mod events;
pub mod geometry;
pub mod intent;
pub mod level;
pub mod parts;
pub mod physics;
pub mod player;
pub mod spawner;
pub mod state;
pub mod stats;
pub mod timer;
