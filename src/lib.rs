//! InterviewCoach - mock-interview practice CLI
//!
//! This crate provides the core functionality for recording a spoken answer
//! to an interview question, sending the audio to a coach backend for
//! transcription and summarization, and optionally showing a per-frame
//! face-status readout while recording.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Session lifecycle, fragment buffer, question selection,
//!   face-status reduction, and domain errors
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, coach HTTP API, etc.)
//! - **CLI**: Command-line interface, argument parsing, and output formatting

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
