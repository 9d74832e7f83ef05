//! Replay report rendering

use std::io::Write;

use anyhow::Result;
use clap::ValueEnum;
use recency::trace::{Outcome, Replay};
use recency::{LruCache, StatsSnapshot};
use serde::Serialize;

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// One line per lookup plus a summary
    Text,
    /// Single JSON object
    Json,
}

/// Final cache state and per-operation outcomes of a replay
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    capacity: usize,
    len: usize,
    /// Least to most recently used
    keys: Vec<&'a str>,
    outcomes: &'a [Outcome],
    stats: StatsSnapshot,
}

impl<'a> Report<'a> {
    pub fn new(cache: &'a LruCache<String, String>, run: &'a Replay) -> Self {
        Self {
            capacity: cache.capacity(),
            len: cache.len(),
            keys: cache.keys().map(String::as_str).collect(),
            outcomes: &run.outcomes,
            stats: run.stats,
        }
    }

    pub fn write<W: Write>(&self, out: &mut W, format: Format) -> Result<()> {
        match format {
            Format::Text => self.write_text(out),
            Format::Json => {
                serde_json::to_writer_pretty(&mut *out, self)?;
                writeln!(out)?;
                Ok(())
            }
        }
    }

    fn write_text<W: Write>(&self, out: &mut W) -> Result<()> {
        for outcome in self.outcomes {
            match outcome {
                Outcome::Hit { key, value } => writeln!(out, "HIT {}={}", key, value)?,
                Outcome::Miss { key } => writeln!(out, "MISS {}", key)?,
                _ => {}
            }
        }

        let stats = &self.stats;
        writeln!(out, "capacity={} len={}", self.capacity, self.len)?;
        writeln!(
            out,
            "hits={} misses={} inserts={} updates={} evictions={} removals={}",
            stats.hits, stats.misses, stats.inserts, stats.updates, stats.evictions, stats.removals
        )?;
        writeln!(out, "hit_ratio={:.3}", stats.hit_ratio)?;
        Ok(())
    }
}
