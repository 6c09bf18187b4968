use crate::layout::geometry::PageGeometry;

/// The mutable layout state of one render pass: cursor position, the left
/// margin currently in force, and the page the cursor is on.
///
/// Block emitters take `&mut LayoutContext` explicitly; nothing else moves the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutContext {
    pub x: f32,
    pub y: f32,
    left_margin: f32,
    /// 1-based index of the current page; 0 before the first page starts.
    page: usize,
}

impl LayoutContext {
    pub fn new(geometry: &PageGeometry) -> Self {
        Self {
            x: geometry.left_margin,
            y: geometry.top_margin,
            left_margin: geometry.left_margin,
            page: 0,
        }
    }

    pub fn left_margin(&self) -> f32 {
        self.left_margin
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Line feed: back to the left margin, `h` mm further down.
    pub fn ln(&mut self, h: f32) {
        self.x = self.left_margin;
        self.y += h;
    }

    pub fn set_x(&mut self, x: f32) {
        self.x = x;
    }

    /// Moves to `y` and back to the left margin.
    pub fn set_y(&mut self, y: f32) {
        self.x = self.left_margin;
        self.y = y;
    }

    /// Runs `f` with the left margin moved to `left_margin` (cursor placed on it),
    /// restoring the previous margin afterwards, including when `f` returns an error.
    ///
    /// Page breaks inside `f` land on the overridden margin, which is what keeps a
    /// hanging indent intact across pages.
    pub fn with_left_margin<T>(&mut self, left_margin: f32, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.left_margin;
        self.left_margin = left_margin;
        self.x = left_margin;
        let out = f(self);
        self.left_margin = saved;
        out
    }

    pub(crate) fn start_page(&mut self, geometry: &PageGeometry) {
        self.page += 1;
        self.x = self.left_margin;
        self.y = geometry.top_margin;
    }
}
