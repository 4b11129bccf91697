//! Snapshot rendering helpers.
//!
//! Functions for turning a headless surface into plain-text strings suitable
//! for snapshot testing and assertions.

use crate::geometry::Region;
use crate::surface::{ElementId, HeadlessSurface};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// The surface as plain text.
///
/// Uses the last flushed frame when there is one, otherwise composes the
/// current element tree. Each row is right-trimmed and trailing blank rows
/// are dropped.
///
/// # Examples
///
/// ```ignore
/// use trellis_tui::testing::surface_to_string;
///
/// let text = surface_to_string(&surface.borrow());
/// assert!(text.contains("RUNNING"));
/// ```
pub fn surface_to_string(surface: &HeadlessSurface) -> String {
    match surface.frame() {
        Some(frame) => frame.to_text(),
        None => surface.compose().to_text(),
    }
}

/// The text inside `region`, one line per row, trailing spaces trimmed.
pub fn region_to_string(surface: &HeadlessSurface, region: Region) -> String {
    let text = surface_to_string(surface);
    let lines: Vec<&str> = text.lines().collect();
    let mut out = Vec::new();
    for y in region.y.max(0)..region.bottom().max(0) {
        let row = lines.get(y as usize).copied().unwrap_or("");
        let cut: String = row
            .chars()
            .skip(region.x.max(0) as usize)
            .take(region.width.max(0) as usize)
            .collect();
        out.push(cut.trim_end().to_owned());
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

/// The text painted for one element, borders and padding included.
///
/// Returns an empty string for elements that are hidden or missing.
pub fn element_to_string(surface: &HeadlessSurface, id: ElementId) -> String {
    surface
        .layout()
        .into_iter()
        .find(|(element, _)| *element == id)
        .map(|(_, region)| region_to_string(surface, region))
        .unwrap_or_default()
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyleRecord;
    use crate::surface::Surface;

    fn surface_with(lines: &[&str]) -> HeadlessSurface {
        let mut surface = HeadlessSurface::new(20, 6);
        for line in lines {
            let id = surface.create_element(None, &StyleRecord::new()).unwrap();
            surface.set_content(id, line).unwrap();
        }
        surface
    }

    #[test]
    fn composes_when_nothing_flushed() {
        let surface = surface_with(&["first", "second"]);
        assert!(surface.frame().is_none());
        assert_eq!(surface_to_string(&surface), "first\nsecond");
    }

    #[test]
    fn uses_the_flushed_frame() {
        let mut surface = surface_with(&["hello"]);
        surface.render();
        assert_eq!(surface_to_string(&surface), "hello");
    }

    #[test]
    fn empty_surface_is_empty_text() {
        let surface = HeadlessSurface::new(10, 3);
        assert_eq!(surface_to_string(&surface), "");
    }

    #[test]
    fn region_cuts_columns_and_rows() {
        let surface = surface_with(&["abcdef", "ghijkl", "mnopqr"]);
        let text = region_to_string(&surface, Region::new(1, 1, 3, 2));
        assert_eq!(text, "hij\nnop");
    }

    #[test]
    fn element_text_follows_layout() {
        let mut surface = HeadlessSurface::new(20, 6);
        let a = surface.create_element(None, &StyleRecord::new()).unwrap();
        let b = surface.create_element(None, &StyleRecord::new()).unwrap();
        surface.set_content(a, "top").unwrap();
        surface.set_content(b, "bottom").unwrap();
        assert_eq!(element_to_string(&surface, b), "bottom");
        surface.hide(b).unwrap();
        assert_eq!(element_to_string(&surface, b), "");
    }
}
