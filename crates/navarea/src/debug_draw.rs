//! Optional line output for visual debugging.

use glam::Vec3;

/// A linear RGBA color for debug lines.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct DebugColor {
    /// Red channel, `[0, 1]`.
    pub red: f32,
    /// Green channel, `[0, 1]`.
    pub green: f32,
    /// Blue channel, `[0, 1]`.
    pub blue: f32,
    /// Alpha channel, `[0, 1]`.
    pub alpha: f32,
}

impl DebugColor {
    /// Used for the outline of the sampled region.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Used for contour edges.
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);

    /// An opaque color.
    pub const fn rgb(red: f32, green: f32, blue: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }
}

/// Something that can draw lines, usually a renderer's gizmo API.
pub trait DebugLineSink {
    /// Draws a line from `start` to `end`.
    fn draw_line(&mut self, start: Vec3, end: Vec3, color: DebugColor);
}

/// A [`DebugLineSink`] that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLineSink;

impl DebugLineSink for NoopLineSink {
    #[inline]
    fn draw_line(&mut self, _start: Vec3, _end: Vec3, _color: DebugColor) {}
}

/// Records the lines instead of drawing them.
impl DebugLineSink for Vec<(Vec3, Vec3, DebugColor)> {
    fn draw_line(&mut self, start: Vec3, end: Vec3, color: DebugColor) {
        self.push((start, end, color));
    }
}

impl<T: DebugLineSink + ?Sized> DebugLineSink for &mut T {
    #[inline]
    fn draw_line(&mut self, start: Vec3, end: Vec3, color: DebugColor) {
        (**self).draw_line(start, end, color);
    }
}

/// Draws the twelve edges of an axis-aligned box.
pub(crate) fn draw_wire_box(
    sink: &mut impl DebugLineSink,
    center: Vec3,
    size: Vec3,
    color: DebugColor,
) {
    let half = size / 2.0;
    let corner = |x: f32, y: f32, z: f32| center + half * Vec3::new(x, y, z);
    for (a, b) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
        .into_iter()
        .zip([(1.0, -1.0), (1.0, 1.0), (-1.0, 1.0), (-1.0, -1.0)])
    {
        // Bottom ring, top ring, then the vertical edge at `a`.
        sink.draw_line(corner(a.0, -1.0, a.1), corner(b.0, -1.0, b.1), color);
        sink.draw_line(corner(a.0, 1.0, a.1), corner(b.0, 1.0, b.1), color);
        sink.draw_line(corner(a.0, -1.0, a.1), corner(a.0, 1.0, a.1), color);
    }
}
