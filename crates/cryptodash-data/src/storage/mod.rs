//! 영속 저장소.

pub mod content_cache;
pub mod database;
