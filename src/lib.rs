//! Professional Headshot Enhancement Service
//!
//! This library chains hosted generative models (face restoration,
//! super-resolution, background repaint, color grading) over a single
//! input photo. Each model call is a remote prediction that is submitted,
//! polled to completion and fed to the next stage; a failing stage is
//! skipped instead of failing the request.

pub mod app_state;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;
