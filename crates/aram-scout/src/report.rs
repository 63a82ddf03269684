// Run report: what gets printed once the comparison is done.

use std::fmt::Write as _;

use serde::Serialize;

use crate::stats::compare::Comparison;
use crate::stats::winrate::JoinDiagnostics;
use crate::stats::{ChampionId, ChampionMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub coefficient: f64,
    pub patches: Vec<String>,
    pub free_roster: Vec<String>,
    pub free_average: f64,
    pub good: Vec<ReportEntry>,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub name: String,
    /// Percent, rounded to 3 decimals.
    pub win_rate: f64,
    pub patches_observed: u32,
}

/// Everything that was skipped or failed to match during the run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    pub unknown_ids: Vec<ChampionId>,
    pub unknown_id_rows: usize,
    pub zero_total_rows: usize,
    pub malformed_rows: usize,
    pub unmatched_free_names: Vec<String>,
    pub champions_without_stats: usize,
}

impl Diagnostics {
    pub fn skipped_rows(&self) -> usize {
        self.unknown_id_rows + self.zero_total_rows + self.malformed_rows
    }

    pub fn is_clean(&self) -> bool {
        self.skipped_rows() == 0 && self.unmatched_free_names.is_empty()
    }
}

pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

impl Report {
    pub fn new(
        coefficient: f64,
        patches: &[String],
        free_roster: &[String],
        champions: &ChampionMap,
        comparison: Comparison,
        join: JoinDiagnostics,
    ) -> Self {
        let good = comparison
            .good
            .into_iter()
            .map(|g| ReportEntry {
                name: g.name,
                win_rate: round3(g.win_rate),
                patches_observed: g.patches_observed,
            })
            .collect();

        let diagnostics = Diagnostics {
            unknown_ids: join.unknown_ids.into_iter().collect(),
            unknown_id_rows: join.unknown_id_rows,
            zero_total_rows: join.zero_total_rows,
            malformed_rows: join.malformed_rows,
            unmatched_free_names: comparison.unmatched_free_names,
            champions_without_stats: champions.values().filter(|c| c.win_rate.is_none()).count(),
        };

        Self {
            coefficient,
            patches: patches.to_vec(),
            free_roster: free_roster.to_vec(),
            free_average: comparison.free_average,
            good,
            diagnostics,
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Text => Ok(self.render_text()),
            OutputFormat::Json => serde_json::to_string_pretty(self),
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Average winrate of free ARAM champions is {:.3}",
            self.free_average
        );
        let _ = writeln!(
            out,
            "There are {} champions with winrate {}x better than free roster average",
            self.good.len(),
            self.coefficient
        );
        for entry in &self.good {
            let _ = writeln!(out, "\t{}: {}", entry.name, entry.win_rate);
        }

        let d = &self.diagnostics;
        if d.is_clean() {
            return out;
        }
        if d.skipped_rows() > 0 {
            let _ = writeln!(
                out,
                "Skipped stats rows: {} with unknown ids {:?}, {} with zero games, {} malformed",
                d.unknown_id_rows, d.unknown_ids, d.zero_total_rows, d.malformed_rows
            );
        }
        if !d.unmatched_free_names.is_empty() {
            let _ = writeln!(
                out,
                "Free roster champions without stats: {}",
                d.unmatched_free_names.join(", ")
            );
        }
        out
    }
}
