use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Precomputed source index per destination row/column.
///
/// The engine renders at a fixed internal resolution; this maps window
/// pixels back to framebuffer pixels with nearest-neighbor sampling, which
/// keeps the flat wall colors crisp instead of smearing them.
pub struct ScaleLut {
    xs: Vec<usize>,
    ys: Vec<usize>,
}

impl ScaleLut {
    pub fn empty() -> Self {
        Self {
            xs: Vec::new(),
            ys: Vec::new(),
        }
    }
}

pub fn build_scale_lut(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> ScaleLut {
    let sx = src_w as f32 / dst_w as f32;
    let sy = src_h as f32 / dst_h as f32;

    let xs = (0..dst_w)
        .map(|x| ((x as f32 * sx) as usize).min(src_w - 1))
        .collect();
    let ys = (0..dst_h)
        .map(|y| ((y as f32 * sy) as usize).min(src_h - 1))
        .collect();

    ScaleLut { xs, ys }
}

/// Stretches the internal framebuffer onto the window surface, one
/// destination row per rayon task.
pub fn blit_stretch(dst: &mut [u32], dst_w: usize, src: &[u32], src_w: usize, lut: &ScaleLut) {
    dst.par_chunks_mut(dst_w).enumerate().for_each(|(y, row)| {
        let src_row = lut.ys[y] * src_w;
        for (px, &sx) in row.iter_mut().zip(&lut.xs) {
            *px = src[src_row + sx];
        }
    });
}
