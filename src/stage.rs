//! Stage blueprints
//!
//! A stage is a grid of block kinds (or empty cells). It can be read from a
//! text file through a [`BlockCatalog`] or generated from a seed.
//!
//! Stage file format:
//! ```text
//! 2 3
//! 1 0 2
//! 3 1 1
//! ```
//! The header is `<rows> <cols>`; each following line holds `cols` catalog
//! keys. Blank lines are ignored.

use std::collections::HashMap;
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::StageError;
use crate::sim::BlockKind;

/// Maps the keys used in stage files to block kinds (`None` = empty cell)
#[derive(Debug, Clone, PartialEq)]
pub struct BlockCatalog {
    entries: HashMap<String, Option<BlockKind>>,
}

impl Default for BlockCatalog {
    fn default() -> Self {
        let mut entries = HashMap::new();
        entries.insert("0".to_string(), None);
        entries.insert(".".to_string(), None);
        for (key, kind) in ["1", "2", "3", "4", "5", "6", "7"]
            .into_iter()
            .zip(BlockKind::ALL)
        {
            entries.insert(key.to_string(), Some(kind));
        }
        Self { entries }
    }
}

impl BlockCatalog {
    /// Parse `key: TypeName` lines. `None` maps a key to an empty cell.
    pub fn parse(text: &str) -> Result<Self, StageError> {
        let mut entries = HashMap::new();
        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some((key, name)) = trimmed.split_once(':') else {
                return Err(StageError::BadCatalogLine {
                    line: line_no,
                    text: line.to_string(),
                });
            };
            let (key, name) = (key.trim(), name.trim());
            if key.is_empty() {
                return Err(StageError::BadCatalogLine {
                    line: line_no,
                    text: line.to_string(),
                });
            }
            let kind = if name == "None" {
                None
            } else {
                Some(BlockKind::from_type_name(name).ok_or_else(|| {
                    StageError::UnknownBlockType {
                        line: line_no,
                        name: name.to_string(),
                    }
                })?)
            };
            entries.insert(key.to_string(), kind);
        }
        Ok(Self { entries })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, StageError> {
        Self::parse(&read(path.as_ref())?)
    }

    /// `None` if the key is unknown, `Some(None)` for an empty cell
    pub fn lookup(&self, key: &str) -> Option<Option<BlockKind>> {
        self.entries.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Immutable stage blueprint, consumed once when a game starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    pub rows: usize,
    pub cols: usize,
    /// `rows` rows of `cols` cells (empty when either dimension is zero)
    pub grid: Vec<Vec<Option<BlockKind>>>,
}

impl Stage {
    /// Build from a rectangular grid
    pub fn from_grid(name: impl Into<String>, grid: Vec<Vec<Option<BlockKind>>>) -> Self {
        let rows = grid.len();
        let cols = grid.first().map_or(0, Vec::len);
        Self {
            name: name.into(),
            rows,
            cols,
            grid,
        }
    }

    /// A 0x0 stage; a game on it is cleared on the first tick
    pub fn empty(name: impl Into<String>) -> Self {
        Self::from_grid(name, Vec::new())
    }

    /// Parse stage text against a catalog
    pub fn parse(
        name: impl Into<String>,
        text: &str,
        catalog: &BlockCatalog,
    ) -> Result<Self, StageError> {
        let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

        let header = lines.next().ok_or(StageError::MissingHeader)?;
        let (rows, cols) = parse_header(header)?;

        if rows == 0 || cols == 0 {
            return Ok(Self {
                name: name.into(),
                rows,
                cols,
                grid: Vec::new(),
            });
        }

        let body: Vec<&str> = lines.collect();
        if body.len() != rows {
            return Err(StageError::RowCount {
                expected: rows,
                found: body.len(),
            });
        }

        let mut grid = Vec::with_capacity(rows);
        for (row, line) in body.into_iter().enumerate() {
            let keys: Vec<&str> = line.split_whitespace().collect();
            if keys.len() != cols {
                return Err(StageError::ColumnCount {
                    row,
                    expected: cols,
                    found: keys.len(),
                });
            }
            let cells = keys
                .into_iter()
                .enumerate()
                .map(|(col, key)| {
                    catalog.lookup(key).ok_or_else(|| StageError::UnknownKey {
                        row,
                        col,
                        key: key.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            grid.push(cells);
        }

        Ok(Self {
            name: name.into(),
            rows,
            cols,
            grid,
        })
    }

    /// Read a stage file; the stage is named after the file
    pub fn load(path: impl AsRef<Path>, catalog: &BlockCatalog) -> Result<Self, StageError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let stage = Self::parse(name, &read(path)?, catalog)?;
        log::info!(
            "Loaded stage {} ({}x{}, {} blocks)",
            stage.name,
            stage.rows,
            stage.cols,
            stage.block_count()
        );
        Ok(stage)
    }

    /// Deterministic random stage. Same seed, same stage.
    pub fn generate(name: impl Into<String>, seed: u64, rows: usize, cols: usize) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let grid: Vec<Vec<Option<BlockKind>>> = (0..rows)
            .map(|_| (0..cols).map(|_| roll_cell(&mut rng)).collect::<Vec<_>>())
            .collect();
        Self {
            name: name.into(),
            rows,
            cols,
            grid,
        }
    }

    /// Occupied cells as `(row, col, kind)` in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, BlockKind)> + '_ {
        self.grid.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter_map(move |(col, cell)| cell.map(|kind| (row, col, kind)))
        })
    }

    pub fn block_count(&self) -> usize {
        self.cells().count()
    }
}

fn parse_header(header: &str) -> Result<(usize, usize), StageError> {
    let bad = || StageError::BadHeader(header.to_string());
    let mut parts = header.split_whitespace();
    let rows = parts.next().and_then(|s| s.parse().ok()).ok_or_else(bad)?;
    let cols = parts.next().and_then(|s| s.parse().ok()).ok_or_else(bad)?;
    if parts.next().is_some() {
        return Err(bad());
    }
    Ok((rows, cols))
}

/// ~10% empty, otherwise mostly plain and hard blocks with a few specials
fn roll_cell(rng: &mut Pcg32) -> Option<BlockKind> {
    let roll = rng.random_range(0..100u32);
    match roll {
        0..10 => None,
        10..55 => Some(BlockKind::Basic),
        55..70 => Some(BlockKind::Hard),
        70..76 => Some(BlockKind::Split),
        76..82 => Some(BlockKind::Extend),
        82..88 => Some(BlockKind::Shorten),
        88..94 => Some(BlockKind::SpeedUp),
        _ => Some(BlockKind::SlowDown),
    }
}

fn read(path: &Path) -> Result<String, StageError> {
    std::fs::read_to_string(path).map_err(|source| StageError::Io {
        path: path.to_path_buf(),
        source,
    })
}
