//! Frontends connecting a [`crate::game::Game`] to the players.

pub mod text;
