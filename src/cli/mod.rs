//! CLI module for the PMP experiment service
//!
//! Provides subcommands for running the service in different modes:
//! - `serve`: assignment + event ingestion APIs combined (default)
//! - `assignments`: assignment API only
//! - `events`: event ingestion API only
//! - `bucket`: print the bucket (and variant) for a unit

pub mod bucket;
pub mod serve;

use clap::{Parser, Subcommand};

/// PMP Experiment Service - deterministic assignment and event ingestion
#[derive(Parser)]
#[command(name = "pmp-experiment-service")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run assignment and event ingestion APIs on one port (default mode)
    Serve,

    /// Run the assignment API only
    Assignments,

    /// Run the event ingestion API only
    Events,

    /// Compute the bucket for an experiment and unit
    Bucket(bucket::BucketArgs),
}
