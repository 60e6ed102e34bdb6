//! Infrastructure layer - container launching and backend lifecycle.

pub mod backend;
