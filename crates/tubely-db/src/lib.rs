//! Tubely database layer
//!
//! Video record persistence behind the [`VideoRepository`] trait, with a PostgreSQL
//! implementation and an in-memory one for local development and tests.

pub mod db;

pub use db::{
    create_video_repository, run_migrations, InMemoryVideoRepository, PgVideoRepository,
    VideoRepository,
};
