//! # Base types for raychess
//!
//! This is an auxiliary crate for `raychess`, which contains the board coordinates, pieces,
//! castling flags and ray geometry shared by all the parts of the rules engine.
//!
//! Normally you don't want to use this crate directly. Use `raychess` instead, it re-exports
//! everything declared here.

pub mod bitboard;
pub mod geometry;
pub mod types;
