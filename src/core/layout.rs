use crate::core::Slot;

pub const EMU_PER_INCH: i64 = 914_400;

/// 千分之一英吋轉 EMU
pub const fn inches_milli(milli: i64) -> i64 {
    milli * EMU_PER_INCH / 1000
}

/// Position and size of a shape, in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Frame {
    pub const fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub columns: usize,
    pub cell: i64,
    pub spacing: i64,
    pub row_gap: i64,
    pub start_x: i64,
    pub start_y: i64,
    pub label_offset: i64,
    pub label_height: i64,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: 4,
            cell: inches_milli(1_500),
            spacing: inches_milli(300),
            row_gap: inches_milli(500),
            start_x: inches_milli(500),
            start_y: inches_milli(1_500),
            label_offset: inches_milli(100),
            label_height: inches_milli(300),
        }
    }
}

impl GridLayout {
    pub fn slot(&self, index: usize) -> Slot {
        Slot {
            row: index / self.columns,
            column: index % self.columns,
        }
    }

    pub fn icon_frame(&self, slot: Slot) -> Frame {
        let x = self.start_x + slot.column as i64 * (self.cell + self.spacing);
        let y = self.start_y + slot.row as i64 * (self.cell + self.spacing + self.row_gap);
        Frame::new(x, y, self.cell, self.cell)
    }

    /// 標籤放在圖示正下方
    pub fn label_frame(&self, slot: Slot) -> Frame {
        let icon = self.icon_frame(slot);
        Frame::new(
            icon.x,
            icon.y + self.cell + self.label_offset,
            self.cell,
            self.label_height,
        )
    }
}
