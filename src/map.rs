use thiserror::Error;

/// Problems detected while validating the world grid at load time.
///
/// All of these are fatal: no frame is rendered for a world that fails
/// validation.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("map must be at least 3x3 cells, got {width}x{height}")]
    TooSmall { width: usize, height: usize },

    #[error("map data holds {got} cells, expected {expected}")]
    CellCountMismatch { expected: usize, got: usize },

    #[error("border cell ({x}, {y}) is open; the map border must be solid")]
    OpenBorder { x: usize, y: usize },

    #[error("cell ({x}, {y}) holds code {code}, which has no palette color")]
    UnmappedCode { x: usize, y: usize, code: u8 },
}

/// Static 2D grid of cell codes, row-major.
///
/// Code 0 is passable, anything above is a solid wall whose value selects
/// the wall color. The constructor guarantees a solid border, which is what
/// lets the ray caster walk the grid without bounds checks on the hot path.
#[derive(Debug)]
pub struct WorldMap {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl WorldMap {
    pub fn new(width: usize, height: usize, cells: Vec<u8>) -> Result<Self, MapError> {
        if width < 3 || height < 3 {
            return Err(MapError::TooSmall { width, height });
        }
        if cells.len() != width * height {
            return Err(MapError::CellCountMismatch {
                expected: width * height,
                got: cells.len(),
            });
        }

        let map = Self {
            width,
            height,
            cells,
        };
        for y in 0..height {
            for x in 0..width {
                let on_border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
                if on_border && map.cells[y * width + x] == 0 {
                    return Err(MapError::OpenBorder { x, y });
                }
            }
        }
        Ok(map)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell code at integer grid coordinates.
    ///
    /// Callers must stay in bounds; the solid border makes escapes a bug,
    /// not a runtime condition.
    #[inline]
    pub fn cell(&self, x: i32, y: i32) -> u8 {
        debug_assert!(
            x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height,
            "map access out of bounds: ({x}, {y})"
        );
        self.cells[y as usize * self.width + x as usize]
    }

    /// Whether the cell containing the given continuous position is passable.
    #[inline]
    pub fn is_open(&self, x: f32, y: f32) -> bool {
        self.cell(x as i32, y as i32) == 0
    }

    /// Largest cell code present in the grid, 0 for an all-open interior.
    pub fn max_code(&self) -> u8 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Position of the first cell whose code exceeds `limit`, if any.
    /// Used by palette coverage validation.
    pub fn find_code_above(&self, limit: u8) -> Option<(usize, usize, u8)> {
        self.cells.iter().enumerate().find_map(|(i, &code)| {
            (code > limit).then(|| (i % self.width, i / self.width, code))
        })
    }
}
