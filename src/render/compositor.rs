//! Frame buffer and frame-to-frame diffing.
//!
//! A [`Compositor`] is one full frame: a 2D grid of [`StyledCell`]s. Painted
//! strips are placed into it, and [`Compositor::diff`] yields only the cells
//! that changed since the previous frame for the driver to write.

use crate::geometry::Region;

use super::strip::{Strip, StyledCell};

// ---------------------------------------------------------------------------
// CellUpdate
// ---------------------------------------------------------------------------

/// A single cell that changed between frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellUpdate {
    pub x: u16,
    pub y: u16,
    pub cell: StyledCell,
}

// ---------------------------------------------------------------------------
// Compositor
// ---------------------------------------------------------------------------

/// One frame of the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compositor {
    /// `screen[y][x]` is the cell at column x, row y.
    screen: Vec<Vec<StyledCell>>,
    pub width: u16,
    pub height: u16,
}

impl Compositor {
    /// A blank frame of the given dimensions.
    pub fn new(width: u16, height: u16) -> Self {
        let screen = (0..height)
            .map(|_| vec![StyledCell::blank(); width as usize])
            .collect();
        Self {
            screen,
            width,
            height,
        }
    }

    /// The whole screen as a region.
    pub fn bounds(&self) -> Region {
        Region::new(0, 0, i32::from(self.width), i32::from(self.height))
    }

    /// Write strips into the frame, clipped to `clip` and the screen bounds.
    pub fn place_strips(&mut self, strips: &[Strip], clip: Region) {
        let clip = clip.intersection(self.bounds());
        if clip.is_empty() {
            return;
        }
        for strip in strips {
            if strip.y < clip.y || strip.y >= clip.bottom() {
                continue;
            }
            let row = &mut self.screen[strip.y as usize];
            for (i, cell) in strip.cells.iter().enumerate() {
                let x = strip.x_offset + i as i32;
                if x >= clip.x && x < clip.right() {
                    row[x as usize] = cell.clone();
                }
            }
        }
    }

    /// Cells of `self` that differ from `previous`.
    ///
    /// When the sizes differ every cell of `self` is reported.
    pub fn diff(&self, previous: &Compositor) -> Vec<CellUpdate> {
        let full = self.width != previous.width || self.height != previous.height;
        let mut updates = Vec::new();
        for (y, row) in self.screen.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if full || previous.screen[y][x] != *cell {
                    updates.push(CellUpdate {
                        x: x as u16,
                        y: y as u16,
                        cell: cell.clone(),
                    });
                }
            }
        }
        updates
    }

    pub fn get_cell(&self, x: u16, y: u16) -> Option<&StyledCell> {
        self.screen
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
    }

    /// The frame as text: one line per row, trailing spaces trimmed.
    pub fn to_text(&self) -> String {
        let lines: Vec<String> = self
            .screen
            .iter()
            .map(|row| {
                let line: String = row.iter().map(|c| c.ch).collect();
                line.trim_end().to_owned()
            })
            .collect();
        let end = lines
            .iter()
            .rposition(|l| !l.is_empty())
            .map_or(0, |i| i + 1);
        lines[..end].join("\n")
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::strip::CellStyle;

    fn make_strip(y: i32, x_offset: i32, text: &str) -> Strip {
        let mut strip = Strip::new(y, x_offset);
        strip.push_str(text, &CellStyle::default());
        strip
    }

    #[test]
    fn new_is_blank() {
        let c = Compositor::new(4, 2);
        assert_eq!(c.get_cell(3, 1), Some(&StyledCell::blank()));
        assert_eq!(c.get_cell(4, 0), None);
        assert_eq!(c.to_text(), "");
    }

    #[test]
    fn place_strips_clips_to_region() {
        let mut c = Compositor::new(10, 3);
        c.place_strips(&[make_strip(1, 2, "abcdef")], Region::new(0, 0, 5, 3));
        assert_eq!(c.to_text(), "\n  abc");
    }

    #[test]
    fn place_strips_clips_to_screen() {
        let mut c = Compositor::new(3, 1);
        c.place_strips(
            &[make_strip(0, -1, "xyz"), make_strip(5, 0, "no")],
            Region::new(-10, -10, 100, 100),
        );
        assert_eq!(c.to_text(), "yz");
    }

    #[test]
    fn diff_reports_changed_cells_only() {
        let prev = Compositor::new(5, 1);
        let mut next = prev.clone();
        next.place_strips(&[make_strip(0, 1, "hi")], next.bounds());
        let updates = next.diff(&prev);
        assert_eq!(updates.len(), 2);
        assert_eq!((updates[0].x, updates[0].cell.ch), (1, 'h'));
        assert_eq!((updates[1].x, updates[1].cell.ch), (2, 'i'));
        assert!(next.diff(&next).is_empty());
    }

    #[test]
    fn diff_after_resize_is_full() {
        let prev = Compositor::new(2, 1);
        let next = Compositor::new(3, 2);
        assert_eq!(next.diff(&prev).len(), 6);
    }
}
