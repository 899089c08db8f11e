//! Mapping between scene pixels and terminal cells.

use ratatui::layout::Rect as CellRect;

use till_engine::{Point, Rect, Size};

/// Linear scale from a fixed-size scene onto a terminal area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneMap {
    scene: Size,
    area: CellRect,
}

impl SceneMap {
    #[must_use]
    pub fn new(scene: Size, area: CellRect) -> Self {
        Self { scene, area }
    }

    #[must_use]
    pub fn area(&self) -> CellRect {
        self.area
    }

    pub fn resize(&mut self, area: CellRect) {
        self.area = area;
    }

    fn scale_x(&self) -> f64 {
        f64::from(self.area.width) / f64::from(self.scene.width.max(1))
    }

    fn scale_y(&self) -> f64 {
        f64::from(self.area.height) / f64::from(self.scene.height.max(1))
    }

    /// Scene point under the center of terminal cell `(column, row)`.
    #[must_use]
    pub fn to_scene(&self, column: u16, row: u16) -> Point {
        let col = f64::from(column.saturating_sub(self.area.x)) + 0.5;
        let row = f64::from(row.saturating_sub(self.area.y)) + 0.5;
        Point::new(
            (col * f64::from(self.scene.width) / f64::from(self.area.width.max(1))).floor() as i32,
            (row * f64::from(self.scene.height) / f64::from(self.area.height.max(1))).floor()
                as i32,
        )
    }

    /// Cells covered by a scene rectangle, clipped to the area. Anything
    /// on-screen gets at least one cell.
    #[must_use]
    pub fn to_cells(&self, rect: Rect) -> Option<CellRect> {
        let sx = self.scale_x();
        let sy = self.scale_y();
        let left = (f64::from(rect.x) * sx).round().max(0.0);
        let top = (f64::from(rect.y) * sy).round().max(0.0);
        let right = (f64::from(rect.right()) * sx)
            .round()
            .min(f64::from(self.area.width));
        let bottom = (f64::from(rect.bottom()) * sy)
            .round()
            .min(f64::from(self.area.height));
        if left >= f64::from(self.area.width) || top >= f64::from(self.area.height) {
            return None;
        }
        if rect.right() <= 0 || rect.bottom() <= 0 {
            return None;
        }
        let width = (right - left).max(1.0) as u16;
        let height = (bottom - top).max(1.0) as u16;
        let x = self.area.x + left as u16;
        let y = self.area.y + top as u16;
        Some(CellRect::new(x, y, width, height).intersection(self.area))
    }
}
