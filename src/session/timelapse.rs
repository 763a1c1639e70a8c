use std::path::PathBuf;

use rayon::prelude::*;

use crate::config::Config;
use crate::encode::{FrameSink, GifSink, LastFramePngSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{LapseError, LapseResult};
use crate::geometry::GeometrySummary;
use crate::legend::{LegendRow, LegendState, LineDescriptor};
use crate::render::{
    FrameRGBA, OverlayOpts, OverlayRenderer, RenderedThumbnail, SvgFonts, line_descriptors,
    render_thumbnail,
};
use crate::save::{SaveEntry, SaveFile, discover_saves, newest_save};

/// Per-save outcome of the stats pass, in save order.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveReport {
    pub file: String,
    pub summary: GeometrySummary,
}

/// Legend rows first shown by one save.
#[derive(Debug, Clone, PartialEq)]
pub struct Reveal {
    pub file: String,
    pub rows: Vec<LegendRow>,
}

/// What a finished run produced.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub saves_found: usize,
    pub frames_encoded: u64,
    /// Saves that could not be read or parsed.
    pub files_skipped: usize,
    /// Parsed saves whose thumbnail was missing or failed to render.
    pub frames_omitted: usize,
    /// Legend after the last frame.
    pub legend: Vec<LegendRow>,
    /// Files written by the sinks the session built itself.
    pub outputs: Vec<PathBuf>,
    pub summaries: Vec<SaveReport>,
}

/// A save after the parallel stage: its summary and, if it rendered, its frame.
struct PreparedSave {
    entry: SaveEntry,
    outcome: LapseResult<(GeometrySummary, LapseResult<RenderedThumbnail>)>,
}

/// A frame waiting for its overlay and its turn at the sinks.
struct PendingFrame {
    frame: FrameRGBA,
    legend: Vec<LegendRow>,
    summary: GeometrySummary,
}

/// Renders a folder of saves into an annotated time-lapse.
///
/// The session validates its [`Config`] and loads fonts once; every run reuses them.
#[derive(Debug)]
pub struct TimelapseSession {
    config: Config,
    fonts: SvgFonts,
    overlay: OverlayRenderer,
}

impl TimelapseSession {
    /// Validate `config` and load the system font database.
    pub fn new(config: Config) -> LapseResult<Self> {
        Self::with_fonts(config, SvgFonts::system())
    }

    /// Like [`TimelapseSession::new`] with a caller-provided font database.
    pub fn with_fonts(config: Config, fonts: SvgFonts) -> LapseResult<Self> {
        config.validate()?;
        let overlay = OverlayRenderer::new(
            fonts.clone(),
            OverlayOpts {
                legend: config.add_legend,
                length: config.show_length,
                stations: config.show_stations,
            },
        );
        Ok(Self {
            config,
            fonts,
            overlay,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Saves in the configured folder, oldest first.
    pub fn discover(&self) -> LapseResult<Vec<SaveEntry>> {
        discover_saves(&self.config.save_folder)
    }

    /// Discover saves and write every configured export.
    pub fn run(&self) -> LapseResult<RunReport> {
        let saves = self.discover()?;
        tracing::info!(
            folder = %self.config.save_folder.display(),
            saves = saves.len(),
            "discovered saves"
        );

        let background = self.config.background_rgba();
        let mut gif = self
            .config
            .export_gif
            .then(|| GifSink::new(self.config.gif_path(), background));
        let mut png = self
            .config
            .export_last_png
            .then(|| LastFramePngSink::new(self.config.last_png_path(), background));
        if !self.config.exports_anything() {
            tracing::warn!("export_gif and export_last_png are both off; nothing will be written");
        }

        let mut outputs = Vec::new();
        let mut sinks = Vec::<&mut dyn FrameSink>::new();
        if let Some(s) = gif.as_mut() {
            outputs.push(s.path().to_path_buf());
            sinks.push(s);
        }
        if let Some(s) = png.as_mut() {
            outputs.push(s.path().to_path_buf());
            sinks.push(s);
        }

        let mut report = self.run_with_sinks(&saves, &mut sinks)?;
        report.outputs = outputs;
        Ok(report)
    }

    /// Render `saves` in the given order and stream the annotated frames into `sinks`.
    ///
    /// Saves are prepared in parallel, chunk by chunk. The legend is folded sequentially in save
    /// order, so the result does not depend on worker scheduling. Sinks are begun only once a
    /// frame exists: with no saves or no renderable frame this returns
    /// [`LapseError::EmptyInput`] and the sinks are never touched.
    pub fn run_with_sinks(
        &self,
        saves: &[SaveEntry],
        sinks: &mut [&mut dyn FrameSink],
    ) -> LapseResult<RunReport> {
        if saves.is_empty() {
            return Err(LapseError::empty_input(format!(
                "no save files found in '{}'",
                self.config.save_folder.display()
            )));
        }

        let pool = build_thread_pool(self.config.threads)?;
        let sink_cfg = SinkConfig {
            width: self.config.target_res,
            height: self.config.target_res,
            fps: self.config.fps()?,
        };
        tracing::debug!(
            threads = self.config.threads,
            chunk = self.config.effective_chunk_size(),
            fps = sink_cfg.fps.as_f64(),
            res = self.config.target_res,
            "render settings"
        );

        let mut legend = LegendState::new(self.config.color_to_name.clone());
        let mut report = RunReport {
            saves_found: saves.len(),
            ..RunReport::default()
        };
        let mut begun = false;

        for chunk in saves.chunks(self.config.effective_chunk_size()) {
            let prepared = pool.install(|| {
                chunk
                    .par_iter()
                    .map(|entry| self.prepare_save(entry))
                    .collect::<Vec<_>>()
            });

            let mut pending = Vec::with_capacity(prepared.len());
            for p in prepared {
                let file = p.entry.file_name();
                let (summary, thumb) = match p.outcome {
                    Ok(v) => v,
                    Err(e) => {
                        tracing::warn!(file = %file, error = %e, "skipping save");
                        report.files_skipped += 1;
                        continue;
                    }
                };

                tracing::info!(
                    file = %file,
                    length = %summary.length_label(),
                    stations = summary.station_count,
                    "processed save"
                );
                report.summaries.push(SaveReport {
                    file: file.clone(),
                    summary,
                });

                match thumb {
                    Ok(t) => {
                        let rows = legend.advance(&t.lines).to_vec();
                        pending.push(PendingFrame {
                            frame: t.frame,
                            legend: rows,
                            summary,
                        });
                    }
                    Err(e) => {
                        tracing::warn!(file = %file, error = %e, "omitting frame");
                        report.frames_omitted += 1;
                    }
                }
            }

            pool.install(|| {
                pending.par_iter_mut().for_each(|p| {
                    if let Err(e) = self.overlay.draw(&mut p.frame, &p.legend, &p.summary) {
                        tracing::warn!(error = %e, "overlay failed; frame left unannotated");
                    }
                })
            });

            for p in pending {
                if !begun {
                    for sink in sinks.iter_mut() {
                        sink.begin(sink_cfg)?;
                    }
                    begun = true;
                }
                let idx = FrameIndex(report.frames_encoded);
                for sink in sinks.iter_mut() {
                    sink.push_frame(idx, &p.frame)?;
                }
                report.frames_encoded += 1;
            }
        }

        if !begun {
            return Err(LapseError::empty_input(format!(
                "none of the {} saves produced a frame",
                saves.len()
            )));
        }
        for sink in sinks.iter_mut() {
            sink.end()?;
        }

        report.legend = legend.snapshot();
        tracing::info!(
            frames = report.frames_encoded,
            skipped = report.files_skipped,
            omitted = report.frames_omitted,
            legend_rows = report.legend.len(),
            "run finished"
        );
        Ok(report)
    }

    /// Parse, summarize and rasterize one save. Only the file read and JSON parse are fatal.
    #[tracing::instrument(level = "debug", skip(self, entry), fields(file = %entry.file_name()))]
    fn prepare_save(&self, entry: &SaveEntry) -> PreparedSave {
        let outcome = SaveFile::load(&entry.path).map(|save| {
            let summary = save.summarize(self.config.unit);
            let thumb = match save.thumbnail() {
                Some(svg) => render_thumbnail(
                    svg,
                    &self.fonts,
                    self.config.line_width,
                    self.config.canvas(),
                    self.config.background_rgba(),
                ),
                None => Err(LapseError::render("save has no routeThumbnail")),
            };
            (summary, thumb)
        });
        PreparedSave {
            entry: entry.clone(),
            outcome,
        }
    }

    /// Summary and line descriptors of one save, without rasterizing.
    pub fn inspect(&self, entry: &SaveEntry) -> LapseResult<(GeometrySummary, Vec<LineDescriptor>)> {
        let save = SaveFile::load(&entry.path)?;
        let summary = save.summarize(self.config.unit);
        let lines = match save.thumbnail() {
            Some(svg) => line_descriptors(svg)?,
            None => Vec::new(),
        };
        Ok((summary, lines))
    }

    /// Network length and station count of every readable save, in save order.
    pub fn stats(&self) -> LapseResult<Vec<SaveReport>> {
        let saves = self.discover()?;
        let pool = build_thread_pool(self.config.threads)?;
        let results = pool.install(|| {
            saves
                .par_iter()
                .map(|entry| (entry, self.inspect(entry)))
                .collect::<Vec<_>>()
        });

        let mut out = Vec::with_capacity(results.len());
        for (entry, res) in results {
            match res {
                Ok((summary, _)) => out.push(SaveReport {
                    file: entry.file_name(),
                    summary,
                }),
                Err(e) => tracing::warn!(file = %entry.file_name(), error = %e, "skipping save"),
            }
        }
        Ok(out)
    }

    /// Line descriptors of the newest save.
    pub fn newest_lines(&self) -> LapseResult<(SaveEntry, Vec<LineDescriptor>)> {
        let Some(entry) = newest_save(&self.config.save_folder)? else {
            return Err(LapseError::empty_input(format!(
                "no save files found in '{}'",
                self.config.save_folder.display()
            )));
        };
        let (_, lines) = self.inspect(&entry)?;
        Ok((entry, lines))
    }

    /// Fold every save through the legend and report which rows each one revealed.
    ///
    /// Saves that reveal nothing are left out.
    pub fn reveals(&self) -> LapseResult<Vec<Reveal>> {
        let saves = self.discover()?;
        let pool = build_thread_pool(self.config.threads)?;
        let results = pool.install(|| {
            saves
                .par_iter()
                .map(|entry| (entry, self.inspect(entry)))
                .collect::<Vec<_>>()
        });

        let mut legend = LegendState::new(self.config.color_to_name.clone());
        let mut out = Vec::new();
        for (entry, res) in results {
            let lines = match res {
                Ok((_, lines)) if !lines.is_empty() => lines,
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(file = %entry.file_name(), error = %e, "skipping save");
                    continue;
                }
            };
            let before = legend.rows().len();
            let rows = legend.advance(&lines);
            if rows.len() > before {
                out.push(Reveal {
                    file: entry.file_name(),
                    rows: rows[before..].to_vec(),
                });
            }
        }
        Ok(out)
    }
}

fn build_thread_pool(threads: usize) -> LapseResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(LapseError::validation("threads must be >= 1"));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| LapseError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/session/timelapse.rs"]
mod tests;
