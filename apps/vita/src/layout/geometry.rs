pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// Bottom margin that triggers an automatic page break.
pub const AUTO_BREAK_MARGIN_MM: f32 = 15.0;

/// Horizontal padding inside every text cell.
pub const CELL_MARGIN_MM: f32 = 1.0;

/// Physical page layout, all values in millimetres from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub left_margin: f32,
    pub top_margin: f32,
    pub right_margin: f32,
    pub break_margin: f32,
    pub cell_margin: f32,
}

impl PageGeometry {
    /// A4 portrait with the given left/top/right margins.
    pub fn a4(left_margin: f32, top_margin: f32, right_margin: f32) -> Self {
        Self {
            width: A4_WIDTH_MM,
            height: A4_HEIGHT_MM,
            left_margin,
            top_margin,
            right_margin,
            break_margin: AUTO_BREAK_MARGIN_MM,
            cell_margin: CELL_MARGIN_MM,
        }
    }

    /// Lowest y a block may reach before it has to move to the next page.
    pub fn page_break_trigger(&self) -> f32 {
        self.height - self.break_margin
    }

    /// Width between the page margins.
    pub fn content_width(&self) -> f32 {
        self.width - self.left_margin - self.right_margin
    }

    /// x of the right margin.
    pub fn right_edge(&self) -> f32 {
        self.width - self.right_margin
    }
}

/// True when a block of `block_height` starting at `cursor_y` would cross `trigger`.
///
/// A block that ends exactly on the trigger still fits.
pub fn needs_page_break(cursor_y: f32, block_height: f32, trigger: f32) -> bool {
    cursor_y + block_height > trigger
}
