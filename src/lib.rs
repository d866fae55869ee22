//! Soul Identity API Library
//!
//! Resolves a blockchain address (or name handle) into a behavioral identity
//! profile and a short list of persona tags ("Soul" classification). Four
//! unreliable external providers (Web3.bio, Snapshot, Alchemy, Tally) are
//! queried concurrently, merged into one canonical profile and run through a
//! fixed rule matrix.
//!
//! # Modules
//!
//! - `api`: Router, middleware and OpenAPI document.
//! - `core`: Domain-layer namespace (identifier, profile, classifier).
//! - `integrations`: External provider namespace.
//! - `classifier`: Persona rule matrix.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `identifier`: Request identifier normalization.
//! - `models`: Core data models.
//! - `orchestrator`: Concurrent provider fan-out.
//! - `profile`: Provider result merging.
//! - `providers`: Provider adapters.
//! - `response`: Response shaping and fallback profile.

pub mod api;
pub mod core;
pub mod integrations;

pub mod classifier;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod identifier;
pub mod models;
pub mod orchestrator;
pub mod profile;
pub mod providers;
pub mod response;
