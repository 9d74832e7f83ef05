//! Cache trace parser and replayer using nom
//!
//! Trace format, one operation per line:
//! ```text
//! # comment
//! put <key> <value>
//! get <key>
//! del <key>
//! resize <capacity>
//! ```
//!
//! Keywords are case-insensitive. Keys and values are whitespace-free tokens
//! that do not start with `#`.
//! Blank lines are skipped, and `#` starts a comment at the beginning of a
//! line or after whitespace.

use std::fs;
use std::path::Path;

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_till1},
    character::complete::{char, digit1, space1},
    combinator::{all_consuming, map, map_res, opt, rest, verify},
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::lru::LruCache;
use crate::stats::{CacheStats, StatsSnapshot};

/// One cache operation from a trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Insert or update `key`
    Put {
        /// Key
        key: String,
        /// Value
        value: String,
    },
    /// Look up `key`
    Get {
        /// Key
        key: String,
    },
    /// Remove `key`
    Del {
        /// Key
        key: String,
    },
    /// Change cache capacity
    Resize {
        /// New capacity, always at least 1
        capacity: usize,
    },
}

/// Result of applying one [`Op`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// `get` found the key
    Hit {
        /// Key looked up
        key: String,
        /// Value found
        value: String,
    },
    /// `get` did not find the key
    Miss {
        /// Key looked up
        key: String,
    },
    /// `put` stored the key
    Stored {
        /// Key stored
        key: String,
        /// Key evicted to make room, if any
        evicted: Option<String>,
    },
    /// `del` ran
    Removed {
        /// Key removed
        key: String,
        /// Whether the key was present
        existed: bool,
    },
    /// `resize` ran
    Resized {
        /// New capacity
        capacity: usize,
        /// Entries evicted by shrinking
        evicted: usize,
    },
}

/// Outcomes and counters from a [`replay`] run
#[derive(Debug, Clone, PartialEq)]
pub struct Replay {
    /// One outcome per operation, in trace order
    pub outcomes: Vec<Outcome>,
    /// Counters accumulated over the run
    pub stats: StatsSnapshot,
}

// A token never starts with '#', which would open a comment
fn token(input: &str) -> IResult<&str, &str> {
    verify(take_till1(|c: char| c.is_whitespace()), |t: &str| {
        !t.starts_with('#')
    })(input)
}

fn capacity(input: &str) -> IResult<&str, usize> {
    verify(map_res(digit1, str::parse::<usize>), |cap: &usize| *cap > 0)(input)
}

fn command(input: &str) -> IResult<&str, Op> {
    alt((
        map(
            tuple((tag_no_case("put"), space1, token, space1, token)),
            |(_, _, key, _, value)| Op::Put {
                key: key.to_string(),
                value: value.to_string(),
            },
        ),
        map(preceded(pair(tag_no_case("get"), space1), token), |key| {
            Op::Get {
                key: key.to_string(),
            }
        }),
        map(preceded(pair(tag_no_case("del"), space1), token), |key| {
            Op::Del {
                key: key.to_string(),
            }
        }),
        map(
            preceded(pair(tag_no_case("resize"), space1), capacity),
            |capacity| Op::Resize { capacity },
        ),
    ))(input)
}

fn trailing_comment(input: &str) -> IResult<&str, Option<(&str, char, &str)>> {
    opt(tuple((space1, char('#'), rest)))(input)
}

fn usage(text: &str) -> String {
    let keyword = text
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    match keyword.as_str() {
        "put" => "expected `put <key> <value>`".to_string(),
        "get" => "expected `get <key>`".to_string(),
        "del" => "expected `del <key>`".to_string(),
        "resize" => "expected `resize <capacity>` with capacity > 0".to_string(),
        _ => format!("unknown command '{}'", keyword),
    }
}

/// Parse one trace line
///
/// `line` is the 1-based line number used in error messages.
/// Returns `Ok(None)` for blank and comment lines.
pub fn parse_line(line: usize, input: &str) -> Result<Option<Op>> {
    let text = input.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    match all_consuming(terminated(command, trailing_comment))(text) {
        Ok((_, op)) => Ok(Some(op)),
        Err(_) => Err(Error::Parse {
            line,
            message: usage(text),
        }),
    }
}

/// Parse a whole trace, stopping at the first malformed line
pub fn parse_trace(input: &str) -> Result<Vec<Op>> {
    let mut ops = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        if let Some(op) = parse_line(idx + 1, line)? {
            ops.push(op);
        }
    }
    Ok(ops)
}

/// Read and parse a trace file
pub fn load_trace<P: AsRef<Path>>(path: P) -> Result<Vec<Op>> {
    let text = fs::read_to_string(path.as_ref())?;
    let ops = parse_trace(&text)?;
    debug!(path = %path.as_ref().display(), ops = ops.len(), "loaded trace");
    Ok(ops)
}

/// Apply `ops` to `cache` in order
///
/// # Returns
/// * `Result<Replay>` - Fails only if a resize is rejected
pub fn replay(cache: &mut LruCache<String, String>, ops: &[Op]) -> Result<Replay> {
    let stats = CacheStats::new();
    let mut outcomes = Vec::with_capacity(ops.len());

    for op in ops {
        let outcome = match op {
            Op::Get { key } => match cache.get(key.as_str()) {
                Some(value) => {
                    stats.record_hit();
                    Outcome::Hit {
                        key: key.clone(),
                        value: value.clone(),
                    }
                }
                None => {
                    stats.record_miss();
                    Outcome::Miss { key: key.clone() }
                }
            },
            Op::Put { key, value } => {
                if cache.contains(key.as_str()) {
                    stats.record_update();
                } else {
                    stats.record_insert();
                }

                let evicted = cache.push(key.clone(), value.clone()).map(|(k, _)| k);
                if evicted.is_some() {
                    stats.record_eviction();
                }

                Outcome::Stored {
                    key: key.clone(),
                    evicted,
                }
            }
            Op::Del { key } => {
                let existed = cache.remove(key.as_str()).is_some();
                if existed {
                    stats.record_removal();
                }
                Outcome::Removed {
                    key: key.clone(),
                    existed,
                }
            }
            Op::Resize { capacity } => {
                let evicted = cache.resize(*capacity)?;
                stats.record_evictions(evicted as u64);
                Outcome::Resized {
                    capacity: *capacity,
                    evicted,
                }
            }
        };
        outcomes.push(outcome);
    }

    Ok(Replay {
        outcomes,
        stats: stats.snapshot(),
    })
}
