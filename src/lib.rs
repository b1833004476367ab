//! Wellbeing Survey - Adaptive self-assessment questionnaire
//!
//! Users answer scaled questions grouped into a dimension, subdimension and
//! facet taxonomy. The next batch of questions is chosen from their scores,
//! and narrative insights are generated as dimensions complete and pushed
//! to them in real time.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
