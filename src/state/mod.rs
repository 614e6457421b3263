//! State module for tracking crawl progress
//!
//! The worker keeps no state across restarts. Its only continuation state is the
//! `EnumerationState` triple carried in every listing response.

mod enumeration_state;

pub use enumeration_state::EnumerationState;
