//! bhc-workflow - build health check automation for multi-repository releases
//!
//! Two chores share this library:
//! - propagating merge commits of PRs linked through a tracking issue into
//!   a manifest repository and opening a follow-up PR
//! - gating and bulk-merging every PR linked to a tracking issue

pub mod auth;
pub mod config;
pub mod error;
pub mod gate;
pub mod manifest;
pub mod platform;
pub mod publish;
pub mod repo;
pub mod types;
