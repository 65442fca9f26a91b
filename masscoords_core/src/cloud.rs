//! ASCII PLY point-cloud loading.
//!
//! Supports PLY files with vertex elements containing:
//! - Required: x, y, z properties
//! - Optional: red, green, blue color properties (all three, or none count)
//!
//! Property order is taken from the header, not assumed. Binary PLY is
//! rejected with a descriptive error.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::error::LoadError;

/// Container for static 3D point-cloud data.
///
/// Presence of `colors` selects vertex-colored rendering downstream;
/// absence selects a flat gray style.
#[derive(Debug, Clone, Default)]
pub struct PointCloud {
    /// Vertex positions
    pub positions: Vec<[f32; 3]>,
    /// Optional per-vertex RGB colors, same length as `positions`
    pub colors: Option<Vec<[u8; 3]>>,
}

impl PointCloud {
    /// Returns the number of points in the cloud.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if the cloud holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns true if per-vertex colors are present.
    #[inline]
    pub fn has_colors(&self) -> bool {
        self.colors.is_some()
    }

    /// Parses an ASCII PLY document from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let reader = BufReader::new(reader);
        let mut lines = reader.lines();

        // Check PLY magic number
        let first_line = lines
            .next()
            .ok_or_else(|| LoadError::Ply("empty file".to_string()))??;
        if first_line.trim() != "ply" {
            return Err(LoadError::Ply("missing 'ply' magic".to_string()));
        }

        // Parse header
        let mut num_vertices: Option<usize> = None;
        let mut prop_names: Vec<String> = Vec::new();
        let mut header_done = false;

        for line in &mut lines {
            let line = line?;
            let stripped = line.trim();

            if stripped.starts_with("format") {
                if !stripped.contains("ascii") {
                    return Err(LoadError::Ply(format!(
                        "unsupported format '{}' (only ascii)",
                        stripped
                    )));
                }
            } else if stripped.starts_with("element vertex") {
                let parts: Vec<&str> = stripped.split_whitespace().collect();
                if let Some(count_str) = parts.last() {
                    num_vertices = count_str.parse().ok();
                }
            } else if stripped.starts_with("property") {
                let parts: Vec<&str> = stripped.split_whitespace().collect();
                if let Some(name) = parts.last() {
                    prop_names.push(name.to_string());
                }
            } else if stripped == "end_header" {
                header_done = true;
                break;
            }
        }

        if !header_done {
            return Err(LoadError::Ply("missing end_header".to_string()));
        }
        let num_vertices = num_vertices
            .ok_or_else(|| LoadError::Ply("no vertex count in header".to_string()))?;

        // Build property index map
        let prop_idx: HashMap<&str, usize> = prop_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        let coord_idx = |name: &str| {
            prop_idx
                .get(name)
                .copied()
                .ok_or_else(|| LoadError::Ply(format!("missing required property '{}'", name)))
        };
        let x_idx = coord_idx("x")?;
        let y_idx = coord_idx("y")?;
        let z_idx = coord_idx("z")?;

        let has_colors = prop_idx.contains_key("red")
            && prop_idx.contains_key("green")
            && prop_idx.contains_key("blue");
        let (r_idx, g_idx, b_idx) = if has_colors {
            (prop_idx["red"], prop_idx["green"], prop_idx["blue"])
        } else {
            (0, 0, 0)
        };

        let mut positions = Vec::with_capacity(num_vertices);
        let mut colors = if has_colors {
            Vec::with_capacity(num_vertices)
        } else {
            Vec::new()
        };

        // Parse vertex data
        for line in lines {
            if positions.len() >= num_vertices {
                break;
            }

            let line = line?;
            let values: Vec<&str> = line.split_whitespace().collect();
            if values.is_empty() {
                continue;
            }
            // Short rows are skipped rather than failing the whole file
            if values.len() < prop_names.len() {
                continue;
            }

            let coord = |idx: usize| -> Result<f32, LoadError> {
                values[idx]
                    .parse()
                    .map_err(|_| LoadError::Ply(format!("invalid coordinate '{}'", values[idx])))
            };
            positions.push([coord(x_idx)?, coord(y_idx)?, coord(z_idx)?]);

            if has_colors {
                let channel = |idx: usize| values[idx].parse::<u8>().unwrap_or(0);
                colors.push([channel(r_idx), channel(g_idx), channel(b_idx)]);
            }
        }

        if positions.len() < num_vertices {
            return Err(LoadError::Ply(format!(
                "expected {} vertices, found {}",
                num_vertices,
                positions.len()
            )));
        }

        Ok(Self {
            positions,
            colors: if has_colors { Some(colors) } else { None },
        })
    }

    /// Loads an ASCII PLY file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }
}
