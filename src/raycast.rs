use crate::map::WorldMap;
use crate::player::Player;

/// Stand-in for an infinite per-cell step when a ray component is zero.
const NO_STEP: f32 = 1e30;

/// Which grid line the ray crossed to reach its terminating cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitSide {
    /// Crossed a vertical grid line (stepped along X).
    X,
    /// Crossed a horizontal grid line (stepped along Y).
    Y,
}

/// Result of casting one screen column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallHit {
    /// Perpendicular distance to the wall face, in cell units. Measured
    /// along the direction vector's projection, so straight walls stay
    /// straight on screen (no fisheye).
    pub distance: f32,
    /// Cell code of the wall that stopped the ray.
    pub code: u8,
    pub side: HitSide,
}

/// Casts the ray for screen column `column` of `width` using grid DDA:
/// advance one cell-boundary crossing at a time, always along the axis
/// whose next crossing is nearer, until a solid cell is reached.
///
/// The map's solid border guarantees termination; the step bound only
/// turns a violated border invariant into a loud defect.
pub fn cast_column(map: &WorldMap, player: &Player, column: usize, width: usize) -> WallHit {
    // -1 at the left screen edge, +1 at the right, 0 dead center.
    let cam_x = 2.0 * column as f32 / width as f32 - 1.0;
    let ray = [
        player.dir[0] + player.plane[0] * cam_x,
        player.dir[1] + player.plane[1] * cam_x,
    ];

    let mut map_x = player.pos[0] as i32;
    let mut map_y = player.pos[1] as i32;

    // Distance along the ray to cross one full cell on each axis.
    let delta_x = if ray[0] == 0.0 {
        NO_STEP
    } else {
        (1.0 / ray[0]).abs()
    };
    let delta_y = if ray[1] == 0.0 {
        NO_STEP
    } else {
        (1.0 / ray[1]).abs()
    };

    // Distance to the first grid line crossing on each axis, and which way
    // the ray walks the grid.
    let (step_x, mut side_x) = if ray[0] < 0.0 {
        (-1, (player.pos[0] - map_x as f32) * delta_x)
    } else {
        (1, (map_x as f32 + 1.0 - player.pos[0]) * delta_x)
    };
    let (step_y, mut side_y) = if ray[1] < 0.0 {
        (-1, (player.pos[1] - map_y as f32) * delta_y)
    } else {
        (1, (map_y as f32 + 1.0 - player.pos[1]) * delta_y)
    };

    let max_steps = map.width() + map.height();
    for _ in 0..max_steps {
        let side = if side_x < side_y {
            side_x += delta_x;
            map_x += step_x;
            HitSide::X
        } else {
            side_y += delta_y;
            map_y += step_y;
            HitSide::Y
        };

        let code = map.cell(map_x, map_y);
        if code > 0 {
            // Back out the final increment so the distance lands on the
            // wall face rather than across the cell.
            let distance = match side {
                HitSide::X => side_x - delta_x,
                HitSide::Y => side_y - delta_y,
            };
            return WallHit {
                distance,
                code,
                side,
            };
        }
    }

    unreachable!("ray escaped the map; the border was validated solid at load")
}
