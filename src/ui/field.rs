//! The playfield drawn in braille: every terminal cell holds a 2x4 grid of
//! dots, and the 800x600 world is scaled onto the dot grid.

use std::collections::HashMap;

use ratatui::prelude::*;

use crate::game::asteroid::AsteroidSize;
use crate::game::body::Body;
use crate::game::ship::THRUSTER;
use crate::game::ufo::UfoSize;
use crate::game::vector::Vec2;
use crate::game::{Game, HEIGHT, WIDTH};

const BACKGROUND: Color = Color::Rgb(5, 5, 15);
const BRAILLE_BASE: u32 = 0x2800;

/// Bit for each dot of a braille cell, indexed `[column][row]`.
const DOT_BITS: [[u8; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

/// Dots lit per terminal cell for one entity.
type DotMap = HashMap<(usize, usize), u8>;

/// Maps world units onto braille dots for a `w` x `h` cell area.
struct Projection {
    bw: i32,
    bh: i32,
    sx: f32,
    sy: f32,
}

impl Projection {
    fn new(w: usize, h: usize) -> Self {
        let bw = (w * 2) as i32;
        let bh = (h * 4) as i32;
        Self {
            bw,
            bh,
            sx: bw as f32 / WIDTH,
            sy: bh as f32 / HEIGHT,
        }
    }

    fn dot(&self, p: Vec2) -> (i32, i32) {
        ((p.x * self.sx) as i32, (p.y * self.sy) as i32)
    }

    /// Light one dot; anything off the grid is dropped.
    fn plot(&self, map: &mut DotMap, (bx, by): (i32, i32)) {
        if !(0..self.bw).contains(&bx) || !(0..self.bh).contains(&by) {
            return;
        }
        let (bx, by) = (bx as usize, by as usize);
        *map.entry((bx / 2, by / 4)).or_insert(0) |= DOT_BITS[bx % 2][by % 4];
    }

    /// Straight run of dots between two world points, ends included.
    fn segment(&self, map: &mut DotMap, from: Vec2, to: Vec2) {
        let (x0, y0) = self.dot(from);
        let (x1, y1) = self.dot(to);
        let steps = (x1 - x0).abs().max((y1 - y0).abs());
        if steps == 0 {
            self.plot(map, (x0, y0));
            return;
        }
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = x0 as f32 + (x1 - x0) as f32 * t;
            let y = y0 as f32 + (y1 - y0) as f32 * t;
            self.plot(map, (x.round() as i32, y.round() as i32));
        }
    }

    /// Closed polygon through `points`.
    fn polygon(&self, map: &mut DotMap, points: &[Vec2]) {
        for (i, &from) in points.iter().enumerate() {
            self.segment(map, from, points[(i + 1) % points.len()]);
        }
    }

    fn outline(&self, body: &Body) -> DotMap {
        let mut map = DotMap::new();
        self.polygon(&mut map, &body.world_outline());
        map
    }
}

/// Terminal cells being composed for one frame.
struct Canvas {
    cells: Vec<Vec<(char, Style)>>,
}

impl Canvas {
    fn new(w: usize, h: usize) -> Self {
        let blank = (' ', Style::default().bg(BACKGROUND));
        let mut cells = vec![vec![blank; w]; h];
        // Faint fixed star field behind everything
        for (y, row) in cells.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                let n = (x as u32).wrapping_mul(73_856_093) ^ (y as u32).wrapping_mul(19_349_663);
                if n % 173 == 0 {
                    let b = 40 + (n % 3) as u8 * 20;
                    *cell = ('.', Style::default().fg(Color::Rgb(b, b, b + 10)).bg(BACKGROUND));
                }
            }
        }
        Self { cells }
    }

    /// Lay `map` over the canvas. Dots already in a cell are kept; the cell
    /// takes the new colour.
    fn paint(&mut self, map: &DotMap, color: Color, bold: bool) {
        let mut style = Style::default().fg(color).bg(BACKGROUND);
        if bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        for (&(cx, cy), &bits) in map {
            let Some(cell) = self.cells.get_mut(cy).and_then(|row| row.get_mut(cx)) else {
                continue;
            };
            let under = match (cell.0 as u32).checked_sub(BRAILLE_BASE) {
                Some(old) if old < 0x100 => old as u8,
                _ => 0,
            };
            let ch = char::from_u32(BRAILLE_BASE + (under | bits) as u32).unwrap_or(' ');
            *cell = (ch, style);
        }
    }

    fn into_lines(self) -> Vec<Line<'static>> {
        self.cells
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(ch, style)| Span::styled(ch.to_string(), style))
                    .collect::<Vec<_>>()
                    .into()
            })
            .collect()
    }
}

fn asteroid_color(size: AsteroidSize) -> Color {
    match size {
        AsteroidSize::Large => Color::Rgb(170, 150, 130),
        AsteroidSize::Medium => Color::Rgb(190, 175, 150),
        AsteroidSize::Small => Color::Rgb(215, 205, 185),
    }
}

fn ufo_color(size: UfoSize) -> Color {
    match size {
        UfoSize::Large => Color::Rgb(230, 90, 230),
        UfoSize::Small => Color::Rgb(255, 120, 120),
    }
}

/// Rows of styled cells for a `w` x `h` area.
pub fn render_field(game: &Game, w: usize, h: usize) -> Vec<Line<'static>> {
    let projection = Projection::new(w, h);
    let mut canvas = Canvas::new(w, h);

    for asteroid in &game.asteroids {
        canvas.paint(&projection.outline(&asteroid.body), asteroid_color(asteroid.size), false);
    }

    for ufo in &game.ufos {
        canvas.paint(&projection.outline(&ufo.body), ufo_color(ufo.size), true);
    }

    for bullet in &game.bullets {
        let mut map = DotMap::new();
        projection.plot(&mut map, projection.dot(bullet.body.position));
        let color = if bullet.from_ufo {
            Color::Rgb(255, 90, 90)
        } else {
            Color::Rgb(255, 255, 80)
        };
        canvas.paint(&map, color, true);
    }

    let ship = &game.ship;
    if !game.is_over() && ship.is_visible() {
        let hull = projection.outline(&ship.body);
        if ship.thrusting {
            let flame: Vec<Vec2> = THRUSTER.iter().map(|&p| ship.body.to_world(p)).collect();
            let mut map = DotMap::new();
            projection.polygon(&mut map, &flame);
            map.retain(|cell, _| !hull.contains_key(cell));
            canvas.paint(&map, Color::Rgb(255, 160, 40), false);
        }
        let color = if ship.invincible {
            Color::Rgb(100, 230, 255)
        } else {
            Color::Rgb(80, 255, 140)
        };
        canvas.paint(&hull, color, true);
    }

    canvas.into_lines()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_bits_cover_cell() {
        let all = DOT_BITS.iter().flatten().fold(0u8, |acc, &b| acc | b);
        assert_eq!(all, 0xFF);
    }

    #[test]
    fn test_segment_includes_endpoints() {
        let p = Projection::new(400, 150);
        let mut map = DotMap::new();
        // One world unit per dot at this size
        p.segment(&mut map, Vec2::new(0.0, 0.0), Vec2::new(5.0, 2.0));
        let lit: u32 = map.values().map(|b| b.count_ones()).sum();
        assert_eq!(lit, 6);
        assert_eq!(map.get(&(0, 0)).map(|b| b & DOT_BITS[0][0]), Some(DOT_BITS[0][0]));
        assert_eq!(map.get(&(2, 0)).map(|b| b & DOT_BITS[1][2]), Some(DOT_BITS[1][2]));
    }

    #[test]
    fn test_projection_scales_world_to_dots() {
        let p = Projection::new(80, 30);
        assert_eq!(p.dot(Vec2::new(0.0, 0.0)), (0, 0));
        assert_eq!(p.dot(Vec2::new(400.0, 300.0)), (80, 60));
        let mut map = DotMap::new();
        p.plot(&mut map, (160, 0));
        p.plot(&mut map, (-1, 5));
        assert!(map.is_empty());
        p.plot(&mut map, (3, 5));
        assert_eq!(map.get(&(1, 1)), Some(&DOT_BITS[1][1]));
    }

    #[test]
    fn test_paint_merges_dots_in_shared_cell() {
        let mut canvas = Canvas::new(2, 1);
        canvas.cells[0] = vec![(' ', Style::default()); 2];
        let a = DotMap::from([((0, 0), 0x01)]);
        let b = DotMap::from([((0, 0), 0x08), ((5, 5), 0x01)]);
        canvas.paint(&a, Color::White, false);
        canvas.paint(&b, Color::Red, false);
        assert_eq!(canvas.cells[0][0].0, '\u{2809}');
        assert_eq!(canvas.cells[0][0].1.fg, Some(Color::Red));
        assert_eq!(canvas.cells[0][1].0, ' ');
    }
}
