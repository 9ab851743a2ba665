//! Business logic services.

#![allow(missing_docs)]

pub mod ai;
pub mod chat;
pub mod event_publisher;
pub mod extension;
pub mod flow;
pub mod group;
pub mod study_board;
pub mod translation;
pub mod user;
pub mod youtube;
