use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::map::{MapError, WorldMap};
use crate::player::Player;
use crate::raycast::{HitSide, cast_column};

#[inline]
pub const fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    // BGRA8 in little-endian memory, alpha at 0
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
}

/// Halve every channel; used for walls hit through a horizontal grid line
/// so perpendicular faces read differently.
#[inline]
fn darken(color: u32) -> u32 {
    (color >> 1) & 0x007F_7F7F
}

const SKY: u32 = pack_rgb(32, 32, 72);
const GROUND: u32 = pack_rgb(44, 44, 44);

/// Total mapping from positive cell codes to wall colors. Code `n` takes
/// `colors[n - 1]`; coverage against a concrete map is checked once at load.
pub struct Palette {
    colors: Vec<u32>,
}

impl Palette {
    pub fn new(colors: Vec<u32>) -> Self {
        Self { colors }
    }

    /// The reference four-wall-type palette: red, green, blue, magenta.
    pub fn reference() -> Self {
        Self::new(vec![
            pack_rgb(0xFF, 0x00, 0x00),
            pack_rgb(0x00, 0xFF, 0x00),
            pack_rgb(0x00, 0x00, 0xFF),
            pack_rgb(0xFF, 0x00, 0xFF),
        ])
    }

    /// Rejects any map holding a cell code this palette has no color for.
    /// Keeping this at load time means `color` never sees an unmapped code.
    pub fn check_coverage(&self, map: &WorldMap) -> Result<(), MapError> {
        match map.find_code_above(self.colors.len() as u8) {
            Some((x, y, code)) => Err(MapError::UnmappedCode { x, y, code }),
            None => Ok(()),
        }
    }

    #[inline]
    pub fn color(&self, code: u8, side: HitSide) -> u32 {
        let base = self.colors[code as usize - 1];
        match side {
            HitSide::X => base,
            HitSide::Y => darken(base),
        }
    }
}

/// One column's projected wall slice: pixel rows `top..bottom` get `color`.
struct Span {
    top: usize,
    bottom: usize,
    color: u32,
}

/// Projects a perpendicular distance into a clamped vertical pixel range
/// centered on the screen midline.
fn wall_span(distance: f32, height: usize) -> (usize, usize) {
    let slice = height as f32 / distance;
    let mid = height as f32 / 2.0;
    let top = (mid - slice / 2.0).max(0.0) as usize;
    let bottom = ((mid + slice / 2.0).min(height as f32)) as usize;
    (top, bottom)
}

/// Renders one frame: casts every screen column, then rewrites the whole
/// buffer row by row. Every pixel is assigned exactly once; nothing from
/// the previous frame survives.
///
/// Rows are filled in parallel. Column results are computed up front, so
/// the parallel fill only reads them; output is identical to a serial loop.
pub fn render_frame(
    buf: &mut [u32],
    width: usize,
    height: usize,
    map: &WorldMap,
    palette: &Palette,
    player: &Player,
) {
    debug_assert_eq!(buf.len(), width * height);

    let spans: Vec<Span> = (0..width)
        .map(|column| {
            let hit = cast_column(map, player, column, width);
            let (top, bottom) = wall_span(hit.distance, height);
            Span {
                top,
                bottom,
                color: palette.color(hit.code, hit.side),
            }
        })
        .collect();

    let mid = height / 2;
    buf.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let backdrop = if y < mid { SKY } else { GROUND };
        for (span, px) in spans.iter().zip(row.iter_mut()) {
            *px = if y >= span.top && y < span.bottom {
                span.color
            } else {
                backdrop
            };
        }
    });
}
