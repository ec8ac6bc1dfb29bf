use serde::{Deserialize, Serialize};

/// Search window inside the description image, in pixels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Roi {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Roi {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create ROI from bounds (x1, y1, x2, y2), end exclusive
    pub fn from_bounds(x1: u32, y1: u32, x2: u32, y2: u32) -> Result<Self, String> {
        if x2 <= x1 {
            return Err("x2 must be greater than x1".to_string());
        }
        if y2 <= y1 {
            return Err("y2 must be greater than y1".to_string());
        }

        Ok(Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        })
    }

    /// Whole image as one window
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn x2(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub fn y2(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.x2() && y >= self.y && y < self.y2()
    }

    /// Cut the window down to the image; `None` if nothing is left
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Roi> {
        let x1 = self.x.min(width);
        let y1 = self.y.min(height);
        let x2 = self.x2().min(width);
        let y2 = self.y2().min(height);

        Roi::from_bounds(x1, y1, x2, y2).ok()
    }

    /// Whether a `w`x`h` template placed anywhere fits inside
    pub fn fits(&self, w: u32, h: u32) -> bool {
        w > 0 && h > 0 && w <= self.width && h <= self.height
    }
}
