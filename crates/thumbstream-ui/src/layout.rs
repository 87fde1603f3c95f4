//! Layout helpers for placing thumbnails.

/// Where a fitted image sits inside its bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Centre,
    Top,
    Bottom,
    Left,
    Right,
}

/// Size of an image scaled to fit a `box_w` x `box_h` rectangle while
/// keeping its aspect ratio, then multiplied by `scale`.
///
/// Returns `(0.0, 0.0)` when either the box or the image is empty.
pub fn fit_dimensions(
    image_w: u32,
    image_h: u32,
    box_w: u32,
    box_h: u32,
    scale: f32,
) -> (f32, f32) {
    if image_w == 0 || image_h == 0 || box_w == 0 || box_h == 0 {
        return (0.0, 0.0);
    }

    let box_aspect = box_w as f32 / box_h as f32;
    let image_aspect = image_w as f32 / image_h as f32;

    let (w, h) = if image_aspect > box_aspect {
        let w = box_w as f32;
        (w, image_h as f32 * (w / image_w as f32))
    } else {
        let h = box_h as f32;
        (image_w as f32 * (h / image_h as f32), h)
    };

    (w * scale, h * scale)
}

/// Top-left corner of a `draw_w` x `draw_h` image aligned within the
/// box at `(x, y)` sized `box_w` x `box_h` (y grows downward).
pub fn align_in_box(
    x: f32,
    y: f32,
    box_w: f32,
    box_h: f32,
    draw_w: f32,
    draw_h: f32,
    alignment: Alignment,
) -> (f32, f32) {
    let centre_x = x + (box_w - draw_w) / 2.0;
    let centre_y = y + (box_h - draw_h) / 2.0;
    match alignment {
        Alignment::Centre => (centre_x, centre_y),
        Alignment::Top => (centre_x, y),
        Alignment::Bottom => (centre_x, y + box_h - draw_h),
        Alignment::Left => (x, centre_y),
        Alignment::Right => (x + box_w - draw_w, centre_y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_image_fills_width() {
        let (w, h) = fit_dimensions(200, 100, 100, 100, 1.0);
        assert_eq!((w, h), (100.0, 50.0));
    }

    #[test]
    fn tall_image_fills_height() {
        let (w, h) = fit_dimensions(100, 400, 100, 100, 1.0);
        assert_eq!((w, h), (25.0, 100.0));
    }

    #[test]
    fn scale_factor_applies_after_fit() {
        let (w, h) = fit_dimensions(100, 100, 50, 50, 2.0);
        assert_eq!((w, h), (100.0, 100.0));
    }

    #[test]
    fn empty_inputs_give_zero() {
        assert_eq!(fit_dimensions(0, 10, 100, 100, 1.0), (0.0, 0.0));
        assert_eq!(fit_dimensions(10, 10, 0, 100, 1.0), (0.0, 0.0));
    }

    #[test]
    fn alignment_positions() {
        let args = (10.0, 20.0, 100.0, 50.0, 40.0, 30.0);
        let at = |a| align_in_box(args.0, args.1, args.2, args.3, args.4, args.5, a);
        assert_eq!(at(Alignment::Centre), (40.0, 30.0));
        assert_eq!(at(Alignment::Top), (40.0, 20.0));
        assert_eq!(at(Alignment::Bottom), (40.0, 40.0));
        assert_eq!(at(Alignment::Left), (10.0, 30.0));
        assert_eq!(at(Alignment::Right), (70.0, 30.0));
    }
}
