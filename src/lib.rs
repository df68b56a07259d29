//! Symptom Triage - Conversational Symptom Triage Engine
//!
//! Guides a user from a free-text complaint through a few rounds of
//! clarifying questions to a care recommendation: urgency, provider type
//! and likely conditions. Steps come from a pluggable provider; a local
//! keyword classifier answers when nothing smarter is available.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
