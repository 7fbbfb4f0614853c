use serde::{Deserialize, Serialize};

/// Linear-ish RGB color in `[0, 1]` per channel.
///
/// Serialized as a `#rrggbb` string so configs read like the CSS colors they
/// were authored from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub [f32; 3]);

impl Rgb {
    pub const WHITE: Rgb = Rgb([1.0, 1.0, 1.0]);
    pub const BLACK: Rgb = Rgb([0.0, 0.0, 0.0]);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Rgb([r, g, b])
    }

    /// Build from a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xff) as f32 / 255.0;
        let g = ((hex >> 8) & 0xff) as f32 / 255.0;
        let b = (hex & 0xff) as f32 / 255.0;
        Rgb([r, g, b])
    }

    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        Rgb([
            self.0[0] + (other.0[0] - self.0[0]) * t,
            self.0[1] + (other.0[1] - self.0[1]) * t,
            self.0[2] + (other.0[2] - self.0[2]) * t,
        ])
    }

    pub fn scaled(self, s: f32) -> Rgb {
        Rgb([self.0[0] * s, self.0[1] * s, self.0[2] * s])
    }

    pub fn to_rgba8(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.0[0]), q(self.0[1]), q(self.0[2])]
    }

    pub fn to_array(self) -> [f32; 3] {
        self.0
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let digits = value.trim().trim_start_matches('#');
        if digits.len() != 6 {
            return Err(format!("expected #rrggbb, got `{value}`"));
        }
        u32::from_str_radix(digits, 16)
            .map(Rgb::from_hex)
            .map_err(|_| format!("expected #rrggbb, got `{value}`"))
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        let [r, g, b] = c.to_rgba8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}
