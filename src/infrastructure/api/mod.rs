//! Coach backend API adapter

mod client;

pub use client::CoachApiClient;
