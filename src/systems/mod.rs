//! The Entity-Component-System (ECS) module.
//!
//! This module contains all the per-tick simulation logic of a level: components, resources and
//! the systems that run in the level schedule.

pub mod animation;
pub mod audio;
pub mod ball;
pub mod blindness;
pub mod builder;
pub mod components;
pub mod input;
pub mod particles;
pub mod player;
pub mod rules;
