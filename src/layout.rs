//! Places several controller drawings on one canvas.

use crate::geometry::{Point, Size};

/// Gap between neighboring controllers along the stacking axis.
pub const PADDING: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Stack vertically on portrait canvases, horizontally otherwise.
    pub fn for_canvas(width: f32, height: f32) -> Self {
        if height > width {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        }
    }
}

/// Centers for one frame, in entry order. Scale is always 1.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    pub orientation: Orientation,
    pub centers: Vec<Point>,
}

/// Lay out entries of the given sizes on a `width` x `height` canvas. Sizes
/// may differ; each entry starts after the cumulative extent of the ones
/// before it, and the whole group is centered.
pub fn layout(sizes: &[Size], width: f32, height: f32) -> LayoutResult {
    let orientation = Orientation::for_canvas(width, height);
    let canvas_center = Point::new(width / 2.0, height / 2.0);

    let centers = match sizes.len() {
        0 => Vec::new(),
        1 => vec![canvas_center],
        _ => {
            let extent = |s: &Size| match orientation {
                Orientation::Horizontal => s.width,
                Orientation::Vertical => s.height,
            };
            let total: f32 = sizes.iter().map(extent).sum::<f32>() + PADDING * (sizes.len() - 1) as f32;
            let axis_len = match orientation {
                Orientation::Horizontal => width,
                Orientation::Vertical => height,
            };

            let mut cursor = (axis_len - total) / 2.0;
            let mut out = Vec::with_capacity(sizes.len());
            for size in sizes {
                let e = extent(size);
                let along = cursor + e / 2.0;
                out.push(match orientation {
                    Orientation::Horizontal => Point::new(along, canvas_center.y),
                    Orientation::Vertical => Point::new(canvas_center.x, along),
                });
                cursor += e + PADDING;
            }
            out
        }
    };

    LayoutResult { orientation, centers }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAD: Size = Size::new(558.0, 424.0);

    #[test]
    fn empty_is_noop() {
        assert!(layout(&[], 800.0, 600.0).centers.is_empty());
    }

    #[test]
    fn single_entry_is_centered() {
        let r = layout(&[PAD], 1000.0, 2000.0);
        assert_eq!(r.centers, vec![Point::new(500.0, 1000.0)]);
    }

    #[test]
    fn two_entries_landscape() {
        let r = layout(&[PAD, PAD], 800.0, 600.0);
        assert_eq!(r.orientation, Orientation::Horizontal);
        assert_eq!(r.centers, vec![Point::new(111.0, 300.0), Point::new(689.0, 300.0)]);
    }

    #[test]
    fn portrait_stacks_vertically() {
        let r = layout(&[PAD, PAD, PAD], 720.0, 1400.0);
        assert_eq!(r.orientation, Orientation::Vertical);
        // total = 3 * 424 + 2 * 20 = 1312, start = 44
        let ys: Vec<_> = r.centers.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![256.0, 700.0, 1144.0]);
        assert!(r.centers.iter().all(|p| p.x == 360.0));
    }

    #[test]
    fn square_canvas_is_horizontal() {
        assert_eq!(Orientation::for_canvas(500.0, 500.0), Orientation::Horizontal);
    }

    #[test]
    fn mixed_sizes_use_cumulative_offsets() {
        let small = Size::new(100.0, 50.0);
        let r = layout(&[small, PAD], 1000.0, 600.0);
        // total = 100 + 20 + 558 = 678, start = 161
        assert_eq!(r.centers[0].x, 211.0);
        assert_eq!(r.centers[1].x, 161.0 + 100.0 + 20.0 + 279.0);
    }

    #[test]
    fn layout_is_pure() {
        let sizes = [PAD, Size::new(558.0, 335.0), PAD];
        assert_eq!(layout(&sizes, 1280.0, 720.0), layout(&sizes, 1280.0, 720.0));
    }
}
