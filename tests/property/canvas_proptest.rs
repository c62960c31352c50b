//! Property-based tests for the pixel grid

use pixelboard::backend::canvas::{PixelGrid, BYTES_PER_PIXEL};
use pixelboard::shared::Color;
use proptest::prelude::*;

fn grid_and_point() -> impl Strategy<Value = (u32, u32, u32, u32)> {
    (1u32..40, 1u32..40).prop_flat_map(|(w, h)| (Just(w), Just(h), 0..w, 0..h))
}

proptest! {
    #[test]
    fn test_set_pixel_changes_only_the_target(
        (width, height, x, y) in grid_and_point(),
        rgb in any::<[u8; 3]>(),
    ) {
        let mut grid = PixelGrid::new(width, height).unwrap();
        let before = grid.snapshot();
        grid.set_pixel(x, y, Color(rgb));
        let after = grid.snapshot();

        prop_assert_eq!(grid.get_pixel(x, y), Color(rgb));
        let target = (y as usize * width as usize + x as usize) * BYTES_PER_PIXEL;
        for (i, (old, new)) in before.iter().zip(after.iter()).enumerate() {
            if i < target || i >= target + 3 {
                prop_assert_eq!(old, new, "byte {} changed", i);
            }
        }
    }

    #[test]
    fn test_chunks_tile_the_grid(
        width in 1u32..30,
        height in 1u32..30,
        chunk_size in 1u32..12,
        edits in prop::collection::vec((any::<u16>(), any::<u16>(), any::<[u8; 3]>()), 0..20),
    ) {
        let mut grid = PixelGrid::new(width, height).unwrap();
        for (x, y, rgb) in edits {
            grid.set_pixel(x as u32 % width, y as u32 % height, Color(rgb));
        }

        let mut rebuilt = vec![0u8; grid.snapshot().len()];
        for chunk_y in 0..height.div_ceil(chunk_size) {
            for chunk_x in 0..width.div_ceil(chunk_size) {
                let (x0, y0, w, h) = grid.chunk_bounds(chunk_x, chunk_y, chunk_size);
                let bytes = grid.chunk_bytes(chunk_x, chunk_y, chunk_size);
                let row_len = w as usize * BYTES_PER_PIXEL;
                prop_assert_eq!(bytes.len(), row_len * h as usize);
                for row in 0..h as usize {
                    let dst = ((y0 as usize + row) * width as usize + x0 as usize) * BYTES_PER_PIXEL;
                    rebuilt[dst..dst + row_len].copy_from_slice(&bytes[row * row_len..(row + 1) * row_len]);
                }
            }
        }
        prop_assert_eq!(rebuilt, grid.snapshot());
    }
}
