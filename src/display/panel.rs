use crate::frame_source::StreamKind;

/// One stream's pixels borrowed from the device for a single render.
#[derive(Debug, Clone, Copy)]
pub struct PanelImage<'a> {
    pub stream: StreamKind,
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8],
}

impl PanelImage<'_> {
    fn is_complete(&self) -> bool {
        let needed = self.width * self.height * self.stream.bytes_per_pixel();
        self.width > 0 && self.height > 0 && self.data.len() >= needed
    }

    /// BGR triple for source pixel `(x, y)`.
    fn bgr_at(&self, x: usize, y: usize) -> [u8; 3] {
        let idx = y * self.width + x;
        match self.stream.bytes_per_pixel() {
            3 => {
                let p = &self.data[idx * 3..idx * 3 + 3];
                [p[2], p[1], p[0]]
            }
            2 => {
                // Depth in native-endian u16; ~8 m maps to white.
                let d = u16::from_ne_bytes([self.data[idx * 2], self.data[idx * 2 + 1]]);
                let v = (d / 32).min(255) as u8;
                [v, v, v]
            }
            _ => {
                let v = self.data[idx];
                [v, v, v]
            }
        }
    }
}

/// Draw up to four panels into a BGR canvas as a 2x2 grid, scaling each with
/// nearest-neighbour sampling. Missing or short panels are left black.
pub fn compose_mosaic(
    canvas: &mut [u8],
    canvas_w: usize,
    canvas_h: usize,
    panels: &[Option<PanelImage<'_>>; 4],
) {
    canvas.fill(0);
    let half_w = canvas_w / 2;
    let half_h = canvas_h / 2;

    for (i, panel) in panels.iter().enumerate() {
        let Some(panel) = panel.filter(PanelImage::is_complete) else {
            continue;
        };
        let (x0, w) = if i % 2 == 0 { (0, half_w) } else { (half_w, canvas_w - half_w) };
        let (y0, h) = if i / 2 == 0 { (0, half_h) } else { (half_h, canvas_h - half_h) };

        for dy in 0..h {
            let sy = dy * panel.height / h;
            let row = (y0 + dy) * canvas_w;
            for dx in 0..w {
                let sx = dx * panel.width / w;
                let at = (row + x0 + dx) * 3;
                canvas[at..at + 3].copy_from_slice(&panel.bgr_at(sx, sy));
            }
        }
    }
}
