//! Episode pipeline: load, clean, lay out and present each recording in turn.

use crate::episode::{EpisodeDescriptor, RecordingInfo};
use crate::error::{Result, VizError};
use crate::figure::build_figure;
use crate::present::Presenter;
use crate::table::{Attribute, CleanedTable, CleaningReport, RawTable, DEFAULT_SAMPLE_RATE_HZ};
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct VisualizerOptions {
    /// Base directory for relative episode paths
    pub data_dir: PathBuf,
    /// Assumed sampling rate for the synthetic time column (Hz)
    pub sample_rate_hz: f64,
}

impl Default for VisualizerOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
        }
    }
}

/// What was plotted for one episode
#[derive(Debug, Clone)]
pub struct EpisodeSummary {
    pub title: String,
    pub source: PathBuf,
    pub recording: Option<RecordingInfo>,
    pub report: CleaningReport,
    pub channel_ranges: Vec<(Attribute, Option<(f64, f64)>)>,
}

/// Plots a fixed list of episodes one after another
pub struct EpisodeVisualizer<P: Presenter> {
    episodes: Vec<EpisodeDescriptor>,
    options: VisualizerOptions,
    presenter: P,
}

impl<P: Presenter> EpisodeVisualizer<P> {
    pub fn new(episodes: Vec<EpisodeDescriptor>, options: VisualizerOptions, presenter: P) -> Self {
        for episode in episodes.iter().filter(|e| !e.has_activity_label()) {
            warn!(title = %episode.title, "title is not a collar activity label");
        }

        Self {
            episodes,
            options,
            presenter,
        }
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Process every episode in order. The first failure aborts the run;
    /// episodes already presented are unaffected.
    pub fn run(&mut self) -> Result<Vec<EpisodeSummary>> {
        let episodes = self.episodes.clone();
        let mut summaries = Vec::with_capacity(episodes.len());
        for episode in &episodes {
            summaries.push(self.process_episode(episode)?);
        }
        Ok(summaries)
    }

    /// Loaded -> Cleaned -> Rendered -> Displayed for a single episode
    pub fn process_episode(&mut self, episode: &EpisodeDescriptor) -> Result<EpisodeSummary> {
        let path = episode.resolve(&self.options.data_dir);
        let recording = episode.recording_info();
        info!(title = %episode.title, path = %path.display(), "loading episode");
        if let Some(rec) = &recording {
            debug!(subject = %rec.subject, device = %rec.device_id, started = %rec.started_at, "recording");
        }

        let raw = RawTable::load(&path)?;
        let table = CleanedTable::from_raw(&raw, self.options.sample_rate_hz)?;
        let report = table.report();
        debug!(
            raw = report.raw_rows,
            kept = report.kept_rows,
            dropped = report.dropped_rows,
            "dropped incomplete rows"
        );

        if table.is_empty() {
            return Err(VizError::EmptyDataset {
                title: episode.title.clone(),
                path,
            });
        }

        let figure = build_figure(&episode.title, &table);
        self.presenter.present(&figure)?;
        info!(title = %episode.title, "episode presented");

        Ok(EpisodeSummary {
            title: episode.title.clone(),
            source: path,
            recording,
            channel_ranges: Attribute::ALL
                .iter()
                .map(|&attr| (attr, table.value_range(attr)))
                .collect(),
            report,
        })
    }
}
