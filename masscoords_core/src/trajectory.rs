//! Agent trajectory CSV parsing.
//!
//! The trajectory file is delimited text with a header row naming columns
//! `agent_<i>_x`, `agent_<i>_y`, `agent_<i>_z` for each agent `i`. Each
//! data row is one discrete time frame. The agent count is the number of
//! header columns ending in `_x`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::LoadError;

/// One ordered position sequence per agent.
///
/// Sequences may differ in length: a row where any of an agent's three
/// fields fails to parse appends nothing for that agent (sparse sequences,
/// no placeholders).
#[derive(Debug, Clone, Default)]
pub struct TrajectorySet {
    agents: Vec<Vec<[f32; 3]>>,
}

impl TrajectorySet {
    /// Parses trajectories from a reader over delimited text.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        // Empty input yields an empty header record, i.e. zero agents
        let headers = reader.headers()?.clone();

        let col_map: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name, i))
            .collect();
        let agent_count = headers.iter().filter(|h| h.ends_with("_x")).count();

        // Resolve each agent's column triple once, by name
        let columns: Vec<Option<[usize; 3]>> = (0..agent_count)
            .map(|a| {
                let x = col_map.get(format!("agent_{}_x", a).as_str())?;
                let y = col_map.get(format!("agent_{}_y", a).as_str())?;
                let z = col_map.get(format!("agent_{}_z", a).as_str())?;
                Some([*x, *y, *z])
            })
            .collect();

        let mut agents = vec![Vec::new(); agent_count];

        for result in reader.records() {
            let record = result?;

            for (a, cols) in columns.iter().enumerate() {
                // A missing column name never appends for that agent
                let Some([xi, yi, zi]) = cols else { continue };

                let field = |idx: usize| record.get(idx).and_then(|s| s.parse::<f32>().ok());
                // All three must parse or the whole point is dropped
                if let (Some(x), Some(y), Some(z)) = (field(*xi), field(*yi), field(*zi)) {
                    agents[a].push([x, y, z]);
                }
            }
        }

        Ok(Self { agents })
    }

    /// Parses trajectories from an in-memory string.
    pub fn from_str(text: &str) -> Result<Self, LoadError> {
        Self::from_reader(text.as_bytes())
    }

    /// Loads trajectories from a CSV file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Returns the number of agents (count of `_x` header columns).
    #[inline]
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Returns one agent's position sequence.
    pub fn agent(&self, index: usize) -> &[[f32; 3]] {
        &self.agents[index]
    }

    /// Iterates over all agent sequences.
    pub fn iter(&self) -> impl Iterator<Item = &[[f32; 3]]> {
        self.agents.iter().map(|a| a.as_slice())
    }

    /// The last valid frame index: longest sequence length minus one.
    ///
    /// `None` when no agent has any sample (empty or header-only input) —
    /// downstream pins playback to frame 0 and hides every marker.
    pub fn max_frame(&self) -> Option<usize> {
        self.agents
            .iter()
            .map(|a| a.len())
            .max()
            .filter(|&len| len > 0)
            .map(|len| len - 1)
    }

    /// Per-agent marker position at a frame index.
    ///
    /// `Some(position)` when the agent's sequence has an entry at that
    /// index, `None` (marker hidden) otherwise.
    pub fn marker_positions(&self, frame: usize) -> Vec<Option<[f32; 3]>> {
        self.agents
            .iter()
            .map(|a| a.get(frame).copied())
            .collect()
    }
}
