use std::io::Write;
use std::time::Duration;

use chrono::{DateTime, Utc};

use rdstail_rds::LogSource;
use rdstail_types::{Engine, LogFileInfo, TailError};

use crate::markers::MarkerTable;
use crate::parser::LogParser;

/// Pause between polling rounds in follow mode
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Upper bound on portions fetched for one file in one round
pub const DEFAULT_MAX_PORTIONS: usize = 10_000;

/// Options controlling the polling loop
#[derive(Clone, Debug)]
pub struct TailOptions {
    /// Keep polling after the first round
    pub follow: bool,

    /// Sleep between rounds in follow mode
    pub interval: Duration,

    /// Safety cap on portion downloads per file per round (None = unbounded)
    pub max_portions: Option<usize>,
}

impl Default for TailOptions {
    fn default() -> Self {
        Self {
            follow: false,
            interval: DEFAULT_POLL_INTERVAL,
            max_portions: Some(DEFAULT_MAX_PORTIONS),
        }
    }
}

/// Decides whether a log line is written out
#[derive(Clone, Debug)]
pub struct LineFilter {
    engine: Engine,
    cutoff: Option<DateTime<Utc>>,
}

impl LineFilter {
    pub fn new(engine: Engine, cutoff: Option<DateTime<Utc>>) -> Self {
        Self { engine, cutoff }
    }

    pub fn cutoff(&self) -> Option<DateTime<Utc>> {
        self.cutoff
    }

    /// Lines without a parseable timestamp always pass
    pub fn keep(&self, line: &str) -> bool {
        let Some(cutoff) = self.cutoff else {
            return true;
        };
        match LogParser::parse_timestamp(line, &self.engine) {
            Ok(ts) => ts > cutoff,
            Err(_) => true,
        }
    }
}

/// How draining a single file ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrainOutcome {
    /// No more pending data, or no marker to continue from this round
    Complete,
    /// A download failed; the rest of the file waits for the next round
    Failed,
    /// The portion cap was hit while data was still pending
    CapReached,
}

/// Counters for one polling round
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoundSummary {
    pub files: usize,
    pub lines: usize,
    pub failed: usize,
}

/// Download every pending portion of one file, writing kept lines to `out`
///
/// Resumes at the marker recorded in `markers` and advances it after each
/// successful download, so progress survives a failure later in the file.
/// Returns how the file ended along with the number of lines written.
pub async fn drain_file<S, W>(
    source: &S,
    instance: &str,
    file: &LogFileInfo,
    markers: &mut MarkerTable,
    filter: &LineFilter,
    max_portions: Option<usize>,
    out: &mut W,
) -> Result<(DrainOutcome, usize), TailError>
where
    S: LogSource + ?Sized,
    W: Write,
{
    let mut portions = 0usize;
    let mut written = 0usize;

    loop {
        if max_portions.is_some_and(|cap| portions >= cap) {
            tracing::warn!(
                file = %file.name,
                portions,
                "portion limit reached, resuming next round"
            );
            return Ok((DrainOutcome::CapReached, written));
        }

        let marker = markers.get(&file.name).map(str::to_string);
        let portion = match source
            .download_portion(instance, &file.name, marker.as_deref())
            .await
        {
            Ok(portion) => portion,
            Err(err) => {
                tracing::warn!(file = %file.name, error = %err, "download failed");
                writeln!(out, "{}", err)?;
                return Ok((DrainOutcome::Failed, written));
            }
        };
        portions += 1;

        for line in portion.lines() {
            if filter.keep(line) {
                writeln!(out, "{}", line)?;
                written += 1;
            }
        }

        let next = portion.marker.as_deref().filter(|m| !m.is_empty());
        if let Some(next) = next {
            tracing::trace!(file = %file.name, marker = next, "marker advanced");
            markers.advance(&file.name, next);
        }

        if !portion.pending {
            return Ok((DrainOutcome::Complete, written));
        }
        if next.is_none() {
            // Re-requesting without a new marker would return the same chunk
            tracing::warn!(file = %file.name, "pending data without a marker, resuming next round");
            return Ok((DrainOutcome::Complete, written));
        }
    }
}

/// Polls the log files of one DB instance
pub struct Tailer<S> {
    source: S,
    instance: String,
    filter: LineFilter,
    markers: MarkerTable,
    options: TailOptions,
}

impl<S: LogSource> Tailer<S> {
    /// Detect the instance engine and build a tailer for it
    pub async fn connect(
        source: S,
        instance: &str,
        cutoff: Option<DateTime<Utc>>,
        options: TailOptions,
    ) -> Result<Self, TailError> {
        let engine = source.describe_engine(instance).await?;
        tracing::debug!(instance, %engine, "detected engine");
        Ok(Self::new(source, instance, engine, cutoff, options))
    }

    pub fn new(
        source: S,
        instance: &str,
        engine: Engine,
        cutoff: Option<DateTime<Utc>>,
        options: TailOptions,
    ) -> Self {
        Self {
            source,
            instance: instance.to_string(),
            filter: LineFilter::new(engine, cutoff),
            markers: MarkerTable::new(),
            options,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.filter.engine
    }

    pub fn markers(&self) -> &MarkerTable {
        &self.markers
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run one round, then keep polling if following
    pub async fn run<W: Write>(&mut self, out: &mut W) -> Result<(), TailError> {
        loop {
            let summary = self.poll_once(out).await?;
            tracing::debug!(?summary, "round finished");

            if !self.options.follow {
                return Ok(());
            }
            tokio::time::sleep(self.options.interval).await;
        }
    }

    /// List the instance's log files and drain each one, oldest first
    pub async fn poll_once<W: Write>(&mut self, out: &mut W) -> Result<RoundSummary, TailError> {
        let since_millis = self.filter.cutoff().map(|c| c.timestamp_millis());
        let mut files = self
            .source
            .list_log_files(&self.instance, since_millis)
            .await?;
        files.sort_by_key(|f| f.last_written);

        let mut summary = RoundSummary {
            files: files.len(),
            ..Default::default()
        };

        for file in &files {
            let (outcome, lines) = drain_file(
                &self.source,
                &self.instance,
                file,
                &mut self.markers,
                &self.filter,
                self.options.max_portions,
                out,
            )
            .await?;
            summary.lines += lines;
            if outcome == DrainOutcome::Failed {
                summary.failed += 1;
            }
        }

        out.flush()?;
        Ok(summary)
    }
}
