//! Persistent RGB image the turtles leave their trails on.

use crate::{Dimensions, Point, Rgb};

/// Fixed-size RGB pixel buffer.
///
/// The buffer never changes size after construction. Drawing operations
/// silently skip pixels that fall outside of it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    dimensions: Dimensions,
    pixels: Vec<Rgb>,
}

impl Raster {
    /// Allocates a raster filled with `background`.
    #[must_use]
    pub fn new(dimensions: Dimensions, background: Rgb) -> Self {
        Self {
            dimensions,
            pixels: vec![background; dimensions.area()],
        }
    }

    /// Extent of the raster.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Overwrites every pixel with `color`.
    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Colour of the pixel at `(x, y)`, if it lies inside the raster.
    #[must_use]
    pub fn pixel(&self, x: i64, y: i64) -> Option<Rgb> {
        self.index(x, y).map(|index| self.pixels[index])
    }

    /// Row-major view of every pixel.
    #[must_use]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Overwrites a single pixel.
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Rgb) {
        if let Some(index) = self.index(x, y) {
            self.pixels[index] = color;
        }
    }

    /// Mixes `color` into a single pixel, weighted by `coverage` in `0.0..=1.0`.
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Rgb, coverage: f64) {
        if coverage <= 0.0 {
            return;
        }

        if let Some(index) = self.index(x, y) {
            let below = self.pixels[index];
            self.pixels[index] = below.mix(color, coverage);
        }
    }

    /// Draws an anti-aliased segment between two pixel centres, both inclusive.
    ///
    /// Each column (or row, for steep segments) receives two pixels whose
    /// coverage is split by the distance of the ideal line from them.
    pub fn draw_line(&mut self, from: Point, to: Point, color: Rgb) {
        let (x0, y0) = (i64::from(from.x), i64::from(from.y));
        let (x1, y1) = (i64::from(to.x), i64::from(to.y));

        if (x0, y0) == (x1, y1) {
            self.set_pixel(x0, y0, color);
            return;
        }

        let steep = (y1 - y0).abs() > (x1 - x0).abs();
        let (mut a0, mut b0, mut a1, mut b1) = if steep {
            (y0, x0, y1, x1)
        } else {
            (x0, y0, x1, y1)
        };
        if a0 > a1 {
            std::mem::swap(&mut a0, &mut a1);
            std::mem::swap(&mut b0, &mut b1);
        }

        let gradient = (b1 - b0) as f64 / (a1 - a0) as f64;
        for major in a0..=a1 {
            let ideal = b0 as f64 + gradient * (major - a0) as f64;
            let minor = ideal.floor();
            let fraction = ideal - minor;
            let minor = minor as i64;

            if steep {
                self.blend_pixel(minor, major, color, 1.0 - fraction);
                self.blend_pixel(minor + 1, major, color, fraction);
            } else {
                self.blend_pixel(major, minor, color, 1.0 - fraction);
                self.blend_pixel(major, minor + 1, color, fraction);
            }
        }
    }

    /// Fills every pixel whose centre lies within `radius` of `(center_x, center_y)`.
    pub fn fill_circle(&mut self, center_x: f32, center_y: f32, radius: f32, color: Rgb) {
        if radius <= 0.0 {
            return;
        }

        let last_x = i64::from(self.dimensions.width()) - 1;
        let last_y = i64::from(self.dimensions.height()) - 1;
        let left = ((center_x - radius).floor() as i64).max(0);
        let right = ((center_x + radius).ceil() as i64).min(last_x);
        let top = ((center_y - radius).floor() as i64).max(0);
        let bottom = ((center_y + radius).ceil() as i64).min(last_y);
        if left > right || top > bottom {
            return;
        }

        let radius_squared = radius * radius;

        for y in top..=bottom {
            for x in left..=right {
                let dx = x as f32 + 0.5 - center_x;
                let dy = y as f32 + 0.5 - center_y;
                if dx * dx + dy * dy <= radius_squared {
                    self.set_pixel(x, y, color);
                }
            }
        }
    }

    /// Expands the raster into opaque RGBA bytes, suitable for texture upload.
    #[must_use]
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|pixel| [pixel.red, pixel.green, pixel.blue, u8::MAX])
            .collect()
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        let width = i64::from(self.dimensions.width());
        let height = i64::from(self.dimensions.height());
        if x < 0 || y < 0 || x >= width || y >= height {
            return None;
        }

        usize::try_from(y * width + x).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INK: Rgb = Rgb::new(10, 20, 30);

    fn raster(width: i32, height: i32) -> Raster {
        Raster::new(
            Dimensions::new(width, height).expect("valid dimensions"),
            Rgb::WHITE,
        )
    }

    #[test]
    fn new_raster_is_filled_with_background() {
        let raster = raster(4, 3);

        assert_eq!(raster.pixels().len(), 12);
        assert!(raster.pixels().iter().all(|pixel| *pixel == Rgb::WHITE));
        assert_eq!(raster.pixel(4, 0), None);
        assert_eq!(raster.pixel(-1, 0), None);
    }

    #[test]
    fn horizontal_line_covers_every_column_fully() {
        let mut raster = raster(40, 10);
        raster.draw_line(Point::new(5, 4), Point::new(25, 4), INK);

        for x in 5..=25 {
            assert_eq!(raster.pixel(x, 4), Some(INK), "column {x}");
            assert_eq!(raster.pixel(x, 5), Some(Rgb::WHITE), "column {x}");
        }
        assert_eq!(raster.pixel(4, 4), Some(Rgb::WHITE));
        assert_eq!(raster.pixel(26, 4), Some(Rgb::WHITE));
    }

    #[test]
    fn steep_line_is_symmetric_in_direction() {
        let mut forward = raster(20, 20);
        let mut backward = raster(20, 20);
        forward.draw_line(Point::new(3, 1), Point::new(7, 18), INK);
        backward.draw_line(Point::new(7, 18), Point::new(3, 1), INK);

        assert_eq!(forward, backward);
        assert_eq!(forward.pixel(3, 1), Some(INK));
        assert_eq!(forward.pixel(7, 18), Some(INK));
    }

    #[test]
    fn diagonal_line_blends_partial_coverage() {
        let mut raster = raster(10, 10);
        raster.draw_line(Point::new(0, 0), Point::new(8, 4), INK);

        // Halfway between rows 0 and 1 at column 1 both rows receive half the ink.
        let upper = raster.pixel(1, 0).expect("inside");
        let lower = raster.pixel(1, 1).expect("inside");
        assert_eq!(upper, Rgb::WHITE.mix(INK, 0.5));
        assert_eq!(lower, Rgb::WHITE.mix(INK, 0.5));
        assert_eq!(raster.pixel(2, 1), Some(INK));
    }

    #[test]
    fn degenerate_line_plots_a_single_pixel() {
        let mut raster = raster(5, 5);
        raster.draw_line(Point::new(2, 2), Point::new(2, 2), INK);

        let inked = raster.pixels().iter().filter(|pixel| **pixel == INK).count();
        assert_eq!(inked, 1);
        assert_eq!(raster.pixel(2, 2), Some(INK));
    }

    #[test]
    fn lines_leaving_the_raster_are_clipped() {
        let mut raster = raster(5, 5);
        raster.draw_line(Point::new(-10, 2), Point::new(10, 2), INK);

        for x in 0..5 {
            assert_eq!(raster.pixel(x, 2), Some(INK));
        }
    }

    #[test]
    fn fill_circle_marks_pixels_within_radius() {
        let mut raster = raster(20, 20);
        raster.fill_circle(10.0, 10.0, 3.0, INK);

        assert_eq!(raster.pixel(10, 10), Some(INK));
        assert_eq!(raster.pixel(9, 9), Some(INK));
        assert_eq!(raster.pixel(12, 10), Some(INK));
        assert_eq!(raster.pixel(14, 10), Some(Rgb::WHITE));
        assert_eq!(raster.pixel(7, 7), Some(Rgb::WHITE));
    }

    #[test]
    fn huge_circles_are_clipped_to_the_raster() {
        let mut raster = raster(10, 10);
        raster.fill_circle(5.0, 5.0, 1.0e12, INK);

        assert!(raster.pixels().iter().all(|pixel| *pixel == INK));
    }

    #[test]
    fn circles_outside_the_raster_draw_nothing() {
        let mut raster = raster(10, 10);
        raster.fill_circle(-500.0, 40.0, 20.0, INK);
        raster.fill_circle(5.0, 5.0e9, 1.0e6, INK);

        assert!(raster.pixels().iter().all(|pixel| *pixel == Rgb::WHITE));
    }

    #[test]
    fn rgba_export_is_row_major_and_opaque() {
        let mut raster = raster(2, 1);
        raster.set_pixel(1, 0, INK);

        assert_eq!(raster.to_rgba8(), vec![255, 255, 255, 255, 10, 20, 30, 255]);
    }
}
