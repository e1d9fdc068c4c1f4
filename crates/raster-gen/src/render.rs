//! Row-parallel pixel rendering.

use image::RgbImage;
use rayon::prelude::*;

/// Render every pixel with `shade(x, y)`, rows in parallel.
pub(crate) fn render_rows<F>(width: u32, height: u32, shade: F) -> RgbImage
where
    F: Fn(u32, u32) -> [u8; 3] + Sync,
{
    let mut img = RgbImage::new(width, height);
    let row_len = width as usize * 3;
    if row_len == 0 {
        return img;
    }

    img.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(3).enumerate() {
                px.copy_from_slice(&shade(x as u32, y as u32));
            }
        });
    img
}
