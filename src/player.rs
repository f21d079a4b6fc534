use crate::map::WorldMap;

/// Discrete movement commands, drained once per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Advance,
    Retreat,
    RotateLeft,
    RotateRight,
    Quit,
}

/// Viewer pose: continuous position plus the direction and camera-plane
/// vectors that define the view frustum.
///
/// `plane` stays perpendicular to `dir`; its magnitude sets the field of
/// view. Both are rotated together so the angle between them never drifts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    pub pos: [f32; 2],
    pub dir: [f32; 2],
    pub plane: [f32; 2],
}

impl Player {
    /// Applies one intent against the map. Blocked translations are silent
    /// no-ops on the blocked axis; rotation never consults the map.
    pub fn apply(&mut self, intent: Intent, map: &WorldMap, move_speed: f32, rot_speed: f32) {
        match intent {
            Intent::Advance => self.translate(map, move_speed),
            Intent::Retreat => self.translate(map, -move_speed),
            Intent::RotateLeft => self.rotate(rot_speed),
            Intent::RotateRight => self.rotate(-rot_speed),
            Intent::Quit => {}
        }
    }

    /// Moves along the direction vector, committing the X and Y components
    /// independently. Each candidate coordinate is tested together with the
    /// current coordinate on the other axis, so grazing a wall slides along
    /// the open axis instead of stopping.
    fn translate(&mut self, map: &WorldMap, distance: f32) {
        let nx = self.pos[0] + self.dir[0] * distance;
        if map.is_open(nx, self.pos[1]) {
            self.pos[0] = nx;
        }
        let ny = self.pos[1] + self.dir[1] * distance;
        if map.is_open(self.pos[0], ny) {
            self.pos[1] = ny;
        }
    }

    /// Rotates direction and camera plane by the same signed angle,
    /// preserving both magnitudes and the angle between them.
    fn rotate(&mut self, angle: f32) {
        let (sin, cos) = angle.sin_cos();
        self.dir = [
            self.dir[0] * cos - self.dir[1] * sin,
            self.dir[0] * sin + self.dir[1] * cos,
        ];
        self.plane = [
            self.plane[0] * cos - self.plane[1] * sin,
            self.plane[0] * sin + self.plane[1] * cos,
        ];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn open_room() -> WorldMap {
        let mut cells = vec![0u8; 64];
        for y in 0..8 {
            for x in 0..8 {
                if x == 0 || y == 0 || x == 7 || y == 7 {
                    cells[y * 8 + x] = 1;
                }
            }
        }
        WorldMap::new(8, 8, cells).unwrap()
    }

    fn player_at(x: f32, y: f32, dir: [f32; 2]) -> Player {
        Player {
            pos: [x, y],
            dir,
            plane: [dir[1], -dir[0]],
        }
    }

    fn len(v: [f32; 2]) -> f32 {
        (v[0] * v[0] + v[1] * v[1]).sqrt()
    }

    fn dot(a: [f32; 2], b: [f32; 2]) -> f32 {
        a[0] * b[0] + a[1] * b[1]
    }

    #[test]
    fn rotation_preserves_magnitudes_and_perpendicularity() {
        let map = open_room();
        let mut p = player_at(3.5, 3.5, [1.0, 0.0]);
        let dir_len = len(p.dir);
        let plane_len = len(p.plane);

        for _ in 0..17 {
            p.apply(Intent::RotateLeft, &map, 0.1, 0.3);
        }

        assert!((len(p.dir) - dir_len).abs() < EPS);
        assert!((len(p.plane) - plane_len).abs() < EPS);
        assert!(dot(p.dir, p.plane).abs() < EPS);
    }

    #[test]
    fn full_turn_returns_to_start() {
        let map = open_room();
        let mut p = player_at(3.5, 3.5, [1.0, 0.0]);
        let start = p;

        let steps = 48;
        let step = std::f32::consts::TAU / steps as f32;
        for _ in 0..steps {
            p.apply(Intent::RotateLeft, &map, 0.1, step);
        }

        assert!((p.dir[0] - start.dir[0]).abs() < EPS);
        assert!((p.dir[1] - start.dir[1]).abs() < EPS);
        assert!((p.plane[0] - start.plane[0]).abs() < EPS);
        assert!((p.plane[1] - start.plane[1]).abs() < EPS);
    }

    #[test]
    fn advance_moves_forward_in_open_space() {
        let map = open_room();
        let mut p = player_at(3.5, 3.5, [1.0, 0.0]);
        p.apply(Intent::Advance, &map, 0.5, 0.1);
        assert!((p.pos[0] - 4.0).abs() < EPS);
        assert!((p.pos[1] - 3.5).abs() < EPS);

        p.apply(Intent::Retreat, &map, 0.5, 0.1);
        assert!((p.pos[0] - 3.5).abs() < EPS);
    }

    #[test]
    fn advance_into_wall_slides_along_open_axis() {
        let map = open_room();
        // Facing up-right into the right border wall: x is blocked, y open.
        let mut p = player_at(6.5, 3.5, [0.8, 0.6]);
        p.apply(Intent::Advance, &map, 1.0, 0.1);
        assert!((p.pos[0] - 6.5).abs() < EPS, "x should stay put");
        assert!((p.pos[1] - 4.1).abs() < EPS, "y should slide");
    }

    #[test]
    fn blocked_on_both_axes_is_a_no_op() {
        let map = open_room();
        // In the corner cell, heading straight into it.
        let mut p = player_at(6.5, 6.5, [0.7, 0.7]);
        p.apply(Intent::Advance, &map, 1.0, 0.1);
        assert_eq!(p.pos, [6.5, 6.5]);
    }

    #[test]
    fn committed_position_never_enters_a_solid_cell() {
        let mut cells = vec![0u8; 64];
        for y in 0..8 {
            for x in 0..8 {
                if x == 0 || y == 0 || x == 7 || y == 7 {
                    cells[y * 8 + x] = 1;
                }
            }
        }
        cells[3 * 8 + 4] = 2;
        cells[5 * 8 + 2] = 3;
        let map = WorldMap::new(8, 8, cells).unwrap();

        let mut p = player_at(2.2, 2.7, [1.0, 0.0]);
        let script = [
            Intent::Advance,
            Intent::RotateLeft,
            Intent::Advance,
            Intent::Advance,
            Intent::RotateRight,
            Intent::Retreat,
            Intent::Advance,
            Intent::RotateLeft,
            Intent::Advance,
            Intent::Advance,
            Intent::Advance,
            Intent::Retreat,
        ];
        for intent in script.into_iter().cycle().take(240) {
            p.apply(intent, &map, 0.4, 0.6);
            assert_eq!(
                map.cell(p.pos[0] as i32, p.pos[1] as i32),
                0,
                "player escaped into a solid cell at {:?}",
                p.pos
            );
        }
    }

    #[test]
    fn quit_leaves_pose_untouched() {
        let map = open_room();
        let mut p = player_at(3.5, 3.5, [1.0, 0.0]);
        let before = p;
        p.apply(Intent::Quit, &map, 0.5, 0.5);
        assert_eq!(p, before);
    }
}
