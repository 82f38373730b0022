//! Interaction and layout engine for the card surface. Keep this crate
//! free of IO and platform concerns: time is an abstract tick, randomness
//! is seeded, and every visible consequence is an event.

pub mod anim;
pub mod arrange;
pub mod burst;
pub mod card;
pub mod config;
pub mod deck_box;
pub mod events;
pub mod focus;
pub mod group;
pub mod identity;
pub mod inventory;
pub mod layout;
pub mod pointer;
pub mod rng;
pub mod table;

pub use anim::*;
pub use arrange::*;
pub use burst::*;
pub use card::*;
pub use config::*;
pub use deck_box::*;
pub use events::*;
pub use focus::*;
pub use group::*;
pub use identity::*;
pub use inventory::*;
pub use pointer::*;
pub use rng::*;
pub use table::*;
