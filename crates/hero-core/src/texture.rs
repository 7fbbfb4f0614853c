//! Procedurally painted surface textures.
//!
//! A gradient base layer plus randomized decorative marks (snow dots, glyph
//! rings, gold highlights). Output is RGBA8, row-major, top row first. Mark
//! sizes are authored against a 512px canvas and scaled to the target size.

use crate::color::Rgb;
use crate::constants::{TEXTURE_MARK_COUNT_MAX, TEXTURE_MARK_EXTENT_MAX, TEXTURE_REFERENCE_SIZE};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientDirection {
    #[default]
    Vertical,
    Diagonal,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgb,
}

impl ColorStop {
    pub const fn new(offset: f32, color: Rgb) -> Self {
        Self { offset, color }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Marks {
    /// Soft filled dots concentrated in the top `band` of the image.
    Snow {
        count: u32,
        color: Rgb,
        min_radius: f32,
        max_radius: f32,
        min_alpha: f32,
        max_alpha: f32,
        band: f32,
    },
    /// Stroked rings with a cross through the middle.
    Glyphs {
        count: u32,
        color: Rgb,
        line_width: f32,
        min_radius: f32,
        max_radius: f32,
    },
    /// Short 45° strokes.
    Highlights {
        count: u32,
        color: Rgb,
        line_width: f32,
        min_length: f32,
        max_length: f32,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureStyle {
    pub direction: GradientDirection,
    pub stops: Vec<ColorStop>,
    pub marks: Vec<Marks>,
}

impl Default for TextureStyle {
    fn default() -> Self {
        Self::snowcap()
    }
}

impl TextureStyle {
    /// White peak fading to slate at the base, dusted with snow.
    pub fn snowcap() -> Self {
        Self {
            direction: GradientDirection::Vertical,
            stops: vec![
                ColorStop::new(0.0, Rgb::from_hex(0xffffff)),
                ColorStop::new(0.3, Rgb::from_hex(0xf0f8ff)),
                ColorStop::new(0.6, Rgb::from_hex(0x778899)),
                ColorStop::new(1.0, Rgb::from_hex(0x2f4f4f)),
            ],
            marks: vec![Marks::Snow {
                count: 200,
                color: Rgb::WHITE,
                min_radius: 1.0,
                max_radius: 5.0,
                min_alpha: 0.3,
                max_alpha: 0.7,
                band: 0.5,
            }],
        }
    }

    /// Weathered sandstone with carved rings and gold scratches.
    pub fn sandstone() -> Self {
        Self {
            direction: GradientDirection::Diagonal,
            stops: vec![
                ColorStop::new(0.0, Rgb::from_hex(0x8b7d6b)),
                ColorStop::new(0.5, Rgb::from_hex(0xa0927b)),
                ColorStop::new(1.0, Rgb::from_hex(0x6b5b4d)),
            ],
            marks: vec![
                Marks::Glyphs {
                    count: 20,
                    color: Rgb::from_hex(0x4a3b2a),
                    line_width: 3.0,
                    min_radius: 10.0,
                    max_radius: 40.0,
                },
                Marks::Highlights {
                    count: 50,
                    color: Rgb::from_hex(0xffd700),
                    line_width: 1.0,
                    min_length: 5.0,
                    max_length: 25.0,
                },
            ],
        }
    }

    /// Reject parameters the painter cannot sample from.
    pub fn validate(&self) -> Result<(), String> {
        for stop in &self.stops {
            if !(0.0..=1.0).contains(&stop.offset) {
                return Err(format!("gradient stop offset {} outside 0..=1", stop.offset));
            }
        }
        for (i, marks) in self.marks.iter().enumerate() {
            marks.validate().map_err(|e| format!("marks {i}: {e}"))?;
        }
        Ok(())
    }
}

fn check_extent(name: &str, v: f32) -> Result<(), String> {
    if (0.0..=TEXTURE_MARK_EXTENT_MAX).contains(&v) {
        Ok(())
    } else {
        Err(format!("{name} {v} outside 0..={TEXTURE_MARK_EXTENT_MAX}"))
    }
}

fn check_span(name: &str, lo: f32, hi: f32) -> Result<(), String> {
    check_extent(&format!("min_{name}"), lo)?;
    check_extent(&format!("max_{name}"), hi)?;
    if hi < lo {
        return Err(format!("max_{name} {hi} below min_{name} {lo}"));
    }
    Ok(())
}

impl Marks {
    fn count(&self) -> u32 {
        match self {
            Marks::Snow { count, .. } | Marks::Glyphs { count, .. } | Marks::Highlights { count, .. } => {
                *count
            }
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.count() > TEXTURE_MARK_COUNT_MAX {
            return Err(format!(
                "count {} above {TEXTURE_MARK_COUNT_MAX}",
                self.count()
            ));
        }
        match *self {
            Marks::Snow {
                min_radius,
                max_radius,
                min_alpha,
                max_alpha,
                band,
                ..
            } => {
                check_span("radius", min_radius, max_radius)?;
                let unit = 0.0..=1.0;
                if !(unit.contains(&min_alpha) && unit.contains(&max_alpha) && unit.contains(&band)) {
                    return Err("alpha and band must lie in 0..=1".into());
                }
                if max_alpha < min_alpha {
                    return Err(format!("max_alpha {max_alpha} below min_alpha {min_alpha}"));
                }
                Ok(())
            }
            Marks::Glyphs {
                line_width,
                min_radius,
                max_radius,
                ..
            } => {
                check_extent("line_width", line_width)?;
                check_span("radius", min_radius, max_radius)
            }
            Marks::Highlights {
                line_width,
                min_length,
                max_length,
                ..
            } => {
                check_extent("line_width", line_width)?;
                check_span("length", min_length, max_length)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureImage {
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
        }
    }

    /// 1x1 white texture for meshes that only use vertex colors.
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![255; 4],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }

    fn put(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let i = ((y * self.width + x) * 4) as usize;
        self.pixels[i] = rgb[0];
        self.pixels[i + 1] = rgb[1];
        self.pixels[i + 2] = rgb[2];
        self.pixels[i + 3] = 255;
    }

    fn blend(&mut self, x: i32, y: i32, color: Rgb, alpha: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let a = alpha.clamp(0.0, 1.0);
        let i = ((y as u32 * self.width + x as u32) * 4) as usize;
        let src = color.to_rgba8();
        for c in 0..3 {
            let dst = self.pixels[i + c] as f32;
            self.pixels[i + c] = (dst + (src[c] as f32 - dst) * a).round() as u8;
        }
        self.pixels[i + 3] = 255;
    }

    pub fn fill_gradient(&mut self, direction: GradientDirection, stops: &[ColorStop]) {
        let w = self.width;
        let h = self.height;
        for y in 0..h {
            for x in 0..w {
                let t = match direction {
                    GradientDirection::Vertical => y as f32 / (h.max(2) - 1) as f32,
                    GradientDirection::Diagonal => (x + y) as f32 / (w + h).saturating_sub(2).max(1) as f32,
                };
                self.put(x, y, sample_stops(stops, t).to_rgba8());
            }
        }
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Rgb, alpha: f32) {
        let (x0, x1) = ((cx - r).floor() as i32, (cx + r).ceil() as i32);
        let (y0, y1) = ((cy - r).floor() as i32, (cy + r).ceil() as i32);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r * r {
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }

    pub fn stroke_circle(&mut self, cx: f32, cy: f32, r: f32, width: f32, color: Rgb, alpha: f32) {
        let outer = r + width * 0.5;
        let inner = (r - width * 0.5).max(0.0);
        let (x0, x1) = ((cx - outer).floor() as i32, (cx + outer).ceil() as i32);
        let (y0, y1) = ((cy - outer).floor() as i32, (cy + outer).ceil() as i32);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let d = (dx * dx + dy * dy).sqrt();
                if d >= inner && d <= outer {
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }

    pub fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgb, alpha: f32) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let steps = ((dx * dx + dy * dy).sqrt() * 2.0).ceil().max(1.0) as u32;
        let r = (width * 0.5).max(0.5);
        for s in 0..=steps {
            let t = s as f32 / steps as f32;
            self.fill_circle(from.0 + dx * t, from.1 + dy * t, r, color, alpha);
        }
    }
}

fn sample_stops(stops: &[ColorStop], t: f32) -> Rgb {
    match stops {
        [] => Rgb::WHITE,
        [only] => only.color,
        _ => {
            let t = t.clamp(0.0, 1.0);
            if t <= stops[0].offset {
                return stops[0].color;
            }
            for pair in stops.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                if t <= b.offset {
                    let span = (b.offset - a.offset).max(1e-6);
                    return a.color.lerp(b.color, (t - a.offset) / span);
                }
            }
            stops[stops.len() - 1].color
        }
    }
}

fn range(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

/// Paint a square texture of `size` pixels in the given style.
pub fn paint_surface(style: &TextureStyle, size: u32, rng: &mut impl Rng) -> TextureImage {
    let mut img = TextureImage::new(size, size);
    img.fill_gradient(style.direction, &style.stops);
    let w = img.width as f32;
    let h = img.height as f32;
    let k = w / TEXTURE_REFERENCE_SIZE;

    for marks in &style.marks {
        match marks {
            Marks::Snow {
                count,
                color,
                min_radius,
                max_radius,
                min_alpha,
                max_alpha,
                band,
            } => {
                for _ in 0..*count {
                    let x = rng.gen::<f32>() * w;
                    let y = rng.gen::<f32>() * h * band.clamp(0.0, 1.0);
                    let r = range(rng, *min_radius, *max_radius) * k;
                    let a = range(rng, *min_alpha, *max_alpha);
                    img.fill_circle(x, y, r.max(0.5), *color, a);
                }
            }
            Marks::Glyphs {
                count,
                color,
                line_width,
                min_radius,
                max_radius,
            } => {
                let lw = (line_width * k).max(1.0);
                for _ in 0..*count {
                    let x = rng.gen::<f32>() * w;
                    let y = rng.gen::<f32>() * h;
                    let r = range(rng, *min_radius, *max_radius) * k;
                    img.stroke_circle(x, y, r, lw, *color, 1.0);
                    img.stroke_line((x - r / 2.0, y), (x + r / 2.0, y), lw, *color, 1.0);
                    img.stroke_line((x, y - r / 2.0), (x, y + r / 2.0), lw, *color, 1.0);
                }
            }
            Marks::Highlights {
                count,
                color,
                line_width,
                min_length,
                max_length,
            } => {
                let lw = (line_width * k).max(1.0);
                for _ in 0..*count {
                    let x = rng.gen::<f32>() * w;
                    let y = rng.gen::<f32>() * h;
                    let len = range(rng, *min_length, *max_length) * k;
                    img.stroke_line((x, y), (x + len, y + len), lw, *color, 1.0);
                }
            }
        }
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn gradient_runs_top_to_bottom() {
        let style = TextureStyle {
            marks: Vec::new(),
            ..TextureStyle::snowcap()
        };
        let img = paint_surface(&style, 32, &mut StdRng::seed_from_u64(3));
        assert_eq!(img.pixel(5, 0), [255, 255, 255, 255]);
        let bottom = img.pixel(5, 31);
        assert_eq!(&bottom[..3], &Rgb::from_hex(0x2f4f4f).to_rgba8());
    }

    #[test]
    fn every_pixel_is_opaque() {
        let img = paint_surface(&TextureStyle::sandstone(), 64, &mut StdRng::seed_from_u64(4));
        assert_eq!(img.pixels.len(), 64 * 64 * 4);
        assert!(img.pixels.chunks_exact(4).all(|p| p[3] == 255));
    }
}
