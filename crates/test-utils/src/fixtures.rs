//! Common fixtures for pyramid tests.
//!
//! Each scenario records a source size together with the pyramid shape a
//! correct builder must produce for it at tile size 256, overlap 1.

/// Tile geometry used by most tests.
pub mod geometry {
    pub const TILE_SIZE: u32 = 256;
    pub const OVERLAP: u32 = 1;
}

/// A source size and the pyramid it must yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenario {
    pub width: u32,
    pub height: u32,
    pub num_levels: u32,
    /// Columns and rows at the finest level.
    pub top_grid: (u32, u32),
}

/// Known scenarios.
pub mod scenario {
    use super::Scenario;

    /// Non-square source with partial edge tiles.
    pub const LANDSCAPE: Scenario = Scenario {
        width: 1000,
        height: 600,
        num_levels: 11,
        top_grid: (4, 3),
    };

    /// Exactly one tile at the finest level.
    pub const ONE_TILE: Scenario = Scenario {
        width: 256,
        height: 256,
        num_levels: 9,
        top_grid: (1, 1),
    };

    /// Just over one tile in each direction.
    pub const JUST_OVER: Scenario = Scenario {
        width: 257,
        height: 257,
        num_levels: 10,
        top_grid: (2, 2),
    };

    /// Degenerate single-pixel source.
    pub const SINGLE_PIXEL: Scenario = Scenario {
        width: 1,
        height: 1,
        num_levels: 1,
        top_grid: (1, 1),
    };

    /// Tall thin strip.
    pub const TALL_STRIP: Scenario = Scenario {
        width: 3,
        height: 700,
        num_levels: 11,
        top_grid: (1, 3),
    };

    pub const ALL: [Scenario; 5] = [LANDSCAPE, ONE_TILE, JUST_OVER, SINGLE_PIXEL, TALL_STRIP];
}

/// Total tile count over every level of `scenario` at the default geometry.
pub fn expected_tile_count(scenario: &Scenario) -> u64 {
    let max_level = scenario.num_levels - 1;
    (0..scenario.num_levels)
        .map(|level| {
            let shift = max_level - level;
            let lw = ((scenario.width as u64 + (1u64 << shift) - 1) >> shift).max(1);
            let lh = ((scenario.height as u64 + (1u64 << shift) - 1) >> shift).max(1);
            let ts = geometry::TILE_SIZE as u64;
            lw.div_ceil(ts) * lh.div_ceil(ts)
        })
        .sum()
}
