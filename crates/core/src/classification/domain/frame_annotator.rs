use crate::shared::face_location::FaceLocation;
use crate::shared::frame::Frame;

pub const HIGHLIGHT_COLOR: [u8; 3] = [255, 0, 0];
pub const DEFAULT_COLOR: [u8; 3] = [0, 255, 0];

const BORDER_THICKNESS: i32 = 2;

/// Draws the outline of `location` onto an RGB frame.
///
/// The border is drawn inside the box and clipped to the frame. Boxes
/// entirely outside the frame are ignored.
pub fn draw_box(frame: &mut Frame, location: &FaceLocation, color: [u8; 3]) {
    if frame.channels() != 3 {
        return;
    }
    let clamped = location.clamp(frame.width(), frame.height());
    if clamped.is_empty() {
        return;
    }

    let t = BORDER_THICKNESS
        .min(clamped.width())
        .min(clamped.height());
    let mut pixels = frame.as_ndarray_mut();
    for y in clamped.top..clamped.bottom {
        let on_horizontal_edge = y < clamped.top + t || y >= clamped.bottom - t;
        for x in clamped.left..clamped.right {
            let on_vertical_edge = x < clamped.left + t || x >= clamped.right - t;
            if on_horizontal_edge || on_vertical_edge {
                for (c, value) in color.iter().enumerate() {
                    pixels[[y as usize, x as usize, c]] = *value;
                }
            }
        }
    }
}

/// Outlines each face, highlighting those whose flag is set.
pub fn annotate(frame: &mut Frame, faces: &[(FaceLocation, bool)]) {
    for (location, highlighted) in faces {
        let color = if *highlighted {
            HIGHLIGHT_COLOR
        } else {
            DEFAULT_COLOR
        };
        draw_box(frame, location, color);
    }
}
