//! Pipeline stages for newsletter-to-article conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets the
//! caller run a prefix of the pipeline (e.g. clip + greeting only, with
//! translation in between) without touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! clip ──▶ greeting ──▶ classify ──▶ render ──▶ assemble
//! (text)   (regex)      (DOM scan)   (per row)  (join)
//! ```
//!
//! 1. [`clip`]     — drop the mailing header and community trailer by text
//!    landmarks, before any DOM work
//! 2. [`greeting`] — neutralise the personalised salutation left in the body
//! 3. [`classify`] — walk the top-level row tables and tag each one by the
//!    background colour of its leading cell
//! 4. [`render`]   — re-emit each tagged row with the inline styles of the
//!    mobile article template
//! 5. [`relocate`] — rehost referenced images through the configured
//!    uploader; the only stage with I/O
//!
//! Assembly itself lives in [`crate::convert`], which owns stage ordering
//! and the run statistics.

pub mod classify;
pub mod clip;
pub mod greeting;
pub mod relocate;
pub mod render;
