//! JSON Lines Pipeline
//!
//! Stream driver for the geo-fix stage: reads one profile per line, fixes
//! records with bounded concurrency and writes every record back out in
//! input order.

use crate::application::{FixedProfile, ProfileGeoFixer};
use crate::domain::entities::Profile;
use crate::domain::value_objects::ResolutionOutcome;
use futures::{Stream, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Counters for one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Records written downstream
    pub forwarded: usize,
    /// Records that gained coordinates
    pub resolved: usize,
    /// Resolved records that only got the sentinel
    pub unresolvable: usize,
    /// Input lines that were not valid profiles
    pub invalid: usize,
}

enum Entry {
    Blank,
    Invalid,
    Fixed(FixedProfile),
}

/// Runs a [`ProfileGeoFixer`] over a JSON-lines stream.
pub struct JsonLinesPipeline {
    fixer: ProfileGeoFixer,
    concurrency: usize,
}

impl JsonLinesPipeline {
    /// `concurrency` is the number of lookups in flight (at least 1).
    pub fn new(fixer: ProfileGeoFixer, concurrency: usize) -> Self {
        Self {
            fixer,
            concurrency: concurrency.max(1),
        }
    }

    /// Process the whole input.
    ///
    /// Lines that do not parse as a profile (bad JSON or bad UTF-8) are
    /// logged and dropped; every parsed record is forwarded, fixed or not.
    /// Only a read or write error ends the run, and whatever was written
    /// before it is still flushed.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> anyhow::Result<PipelineStats>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let segments = AsyncBufReadExt::split(reader, b'\n');
        let lines = futures::stream::unfold(Some(segments), |state| async move {
            let Some(mut segments) = state else {
                return None;
            };
            match segments.next_segment().await {
                Ok(Some(line)) => Some((Ok(line), Some(segments))),
                Ok(None) => None,
                Err(e) => Some((Err(e), None)),
            }
        });

        let fixer = &self.fixer;
        let entries = lines
            .enumerate()
            .map(|(n, line)| fix_line(fixer, n + 1, line))
            .buffered(self.concurrency);
        futures::pin_mut!(entries);

        let mut stats = PipelineStats::default();
        let written = write_entries(entries, &mut writer, &mut stats).await;
        let flushed = writer.flush().await;
        written?;
        flushed?;

        tracing::info!(
            "pipeline done: forwarded={} resolved={} unresolvable={} invalid={}",
            stats.forwarded,
            stats.resolved,
            stats.unresolvable,
            stats.invalid
        );

        Ok(stats)
    }
}

async fn write_entries<S, W>(
    mut entries: S,
    writer: &mut W,
    stats: &mut PipelineStats,
) -> anyhow::Result<()>
where
    S: Stream<Item = std::io::Result<Entry>> + Unpin,
    W: AsyncWrite + Unpin,
{
    while let Some(entry) = entries.next().await {
        match entry? {
            Entry::Blank => {}
            Entry::Invalid => stats.invalid += 1,
            Entry::Fixed(fixed) => {
                let mut buf = serde_json::to_vec(&fixed.profile)?;
                buf.push(b'\n');
                writer.write_all(&buf).await?;

                stats.forwarded += 1;
                if fixed.changed {
                    stats.resolved += 1;
                    if matches!(fixed.outcome, ResolutionOutcome::Found(c) if c.is_sentinel()) {
                        stats.unresolvable += 1;
                    }
                }
            }
        }
    }
    Ok(())
}

/// Parse and fix one raw input line (`number` is 1-based, for logging).
async fn fix_line(
    fixer: &ProfileGeoFixer,
    number: usize,
    line: std::io::Result<Vec<u8>>,
) -> std::io::Result<Entry> {
    let line = line?;
    if line.iter().all(u8::is_ascii_whitespace) {
        return Ok(Entry::Blank);
    }
    match serde_json::from_slice::<Profile>(&line) {
        Ok(profile) => Ok(Entry::Fixed(fixer.fix_reporting(profile).await)),
        Err(e) => {
            tracing::warn!("skipping line {}: not a profile: {}", number, e);
            Ok(Entry::Invalid)
        }
    }
}
