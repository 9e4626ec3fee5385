//! Ambient lighting color extraction.
//!
//! A photo is sampled on a small fixed grid, its average color is converted
//! to HSL and then pushed towards a muted near-background tone that depends
//! on the page theme.

use crate::config::AMBIENT_SAMPLE_SIZE;
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use std::fmt;
use std::str::FromStr;

/// Errors that prevent reading pixels from an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleError {
    /// Pixel access is not allowed, e.g. a cross-origin image.
    Denied(String),
    /// The image has no pixels.
    Empty,
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Denied(reason) => write!(f, "Pixel sampling denied: {}", reason),
            Self::Empty => write!(f, "Image has no pixels"),
        }
    }
}

impl std::error::Error for SampleError {}

/// Something that can be drawn onto a small sampling canvas.
pub trait PixelSource {
    /// Draws the whole source scaled to `width` x `height` and returns the
    /// resulting pixels.
    fn sample(&self, width: u32, height: u32) -> Result<RgbaImage, SampleError>;
}

impl PixelSource for DynamicImage {
    fn sample(&self, width: u32, height: u32) -> Result<RgbaImage, SampleError> {
        if self.width() == 0 || self.height() == 0 {
            return Err(SampleError::Empty);
        }
        Ok(self
            .resize_exact(width, height, FilterType::Triangle)
            .to_rgba8())
    }
}

/// Page color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {}", other)),
        }
    }
}

/// 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// HSL with hue in whole degrees and saturation/lightness in whole percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsl {
    pub h: u32,
    pub s: u32,
    pub l: u32,
}

/// Converts RGB to HSL.
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    let (h, s) = if max == min {
        (0.0, 0.0)
    } else {
        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        (h / 6.0, s)
    };

    Hsl {
        h: (h * 360.0).round() as u32,
        s: (s * 100.0).round() as u32,
        l: (l * 100.0).round() as u32,
    }
}

/// Background color derived from a photo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientColor {
    pub hue: u32,
    pub saturation: f64,
    pub lightness: f64,
}

impl AmbientColor {
    /// Remaps an average color for the given theme: very dark and barely
    /// saturated in dark mode, very light in light mode.
    pub fn from_average(average: Rgb, theme: Theme) -> Self {
        let hsl = rgb_to_hsl(average);
        let s = f64::from(hsl.s);
        let l = f64::from(hsl.l);

        let (saturation, lightness) = match theme {
            Theme::Dark => ((s * 0.3).min(12.0), (l * 0.2).min(10.0)),
            Theme::Light => ((s * 0.5).min(25.0), (98.0 - l * 0.15).max(88.0)),
        };

        Self {
            hue: hsl.h,
            saturation,
            lightness,
        }
    }
}

impl fmt::Display for AmbientColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// Average color of the source sampled on the fixed ambient grid. Alpha is
/// ignored and each channel mean is truncated.
pub fn average_color(source: &dyn PixelSource) -> Result<Rgb, SampleError> {
    let pixels = source.sample(AMBIENT_SAMPLE_SIZE, AMBIENT_SAMPLE_SIZE)?;

    let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
    let mut count = 0u64;
    for pixel in pixels.pixels() {
        r += u64::from(pixel[0]);
        g += u64::from(pixel[1]);
        b += u64::from(pixel[2]);
        count += 1;
    }
    if count == 0 {
        return Err(SampleError::Empty);
    }

    Ok(Rgb {
        r: (r / count) as u8,
        g: (g / count) as u8,
        b: (b / count) as u8,
    })
}

/// Computes the ambient color for a source image.
pub fn ambient_color(source: &dyn PixelSource, theme: Theme) -> Result<AmbientColor, SampleError> {
    average_color(source).map(|average| AmbientColor::from_average(average, theme))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb as Pixel, RgbImage};

    struct Tainted;

    impl PixelSource for Tainted {
        fn sample(&self, _width: u32, _height: u32) -> Result<RgbaImage, SampleError> {
            Err(SampleError::Denied("cross-origin".into()))
        }
    }

    fn rgb(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }

    fn hsl(h: u32, s: u32, l: u32) -> Hsl {
        Hsl { h, s, l }
    }

    fn uniform(width: u32, height: u32, r: u8, g: u8, b: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Pixel([r, g, b])))
    }

    #[test]
    fn hsl_of_primary_and_grey_colors() {
        assert_eq!(rgb_to_hsl(rgb(255, 0, 0)), hsl(0, 100, 50));
        assert_eq!(rgb_to_hsl(rgb(0, 255, 0)), hsl(120, 100, 50));
        assert_eq!(rgb_to_hsl(rgb(0, 0, 255)), hsl(240, 100, 50));
        assert_eq!(rgb_to_hsl(rgb(128, 128, 128)), hsl(0, 0, 50));
        assert_eq!(rgb_to_hsl(rgb(255, 0, 128)), hsl(330, 100, 50));
    }

    #[test]
    fn uniform_image_in_light_theme() {
        // (200,150,100) -> hsl(30, 48%, 59%)
        let image = uniform(120, 80, 200, 150, 100);
        assert_eq!(average_color(&image), Ok(rgb(200, 150, 100)));

        let color = ambient_color(&image, Theme::Light).unwrap();
        assert_eq!(color.to_string(), "hsl(30, 24%, 89.15%)");
    }

    #[test]
    fn uniform_image_in_dark_theme() {
        let image = uniform(64, 64, 200, 150, 100);
        let color = ambient_color(&image, Theme::Dark).unwrap();
        assert_eq!(color.to_string(), "hsl(30, 12%, 10%)");
    }

    #[test]
    fn light_theme_lightness_never_drops_below_88() {
        let white = AmbientColor::from_average(rgb(255, 255, 255), Theme::Light);
        assert_eq!(white.lightness, 88.0);
        let black = AmbientColor::from_average(rgb(0, 0, 0), Theme::Light);
        assert_eq!(black.lightness, 98.0);
        assert_eq!(black.to_string(), "hsl(0, 0%, 98%)");
    }

    #[test]
    fn keeps_float_formatting_of_the_browser() {
        // s = 10 -> 10 * 0.3 is not exactly 3 in binary floating point
        let color = AmbientColor {
            hue: 0,
            saturation: 10.0 * 0.3,
            lightness: 5.0,
        };
        assert_eq!(color.to_string(), "hsl(0, 3.0000000000000004%, 5%)");
    }

    #[test]
    fn averages_two_halves() {
        let mut image = RgbImage::from_pixel(100, 100, Pixel([0, 0, 0]));
        for y in 0..100 {
            for x in 50..100 {
                image.put_pixel(x, y, Pixel([255, 255, 255]));
            }
        }
        let average = average_color(&DynamicImage::ImageRgb8(image)).unwrap();
        // Half black, half white: the mean lands near the middle.
        assert!((120..=135).contains(&average.r), "{average:?}");
        assert_eq!(average.r, average.g);
        assert_eq!(average.g, average.b);
    }

    #[test]
    fn denied_sampling_is_an_error() {
        assert_eq!(
            ambient_color(&Tainted, Theme::Light),
            Err(SampleError::Denied("cross-origin".into()))
        );
    }

    #[test]
    fn empty_image_is_an_error() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        assert_eq!(average_color(&image), Err(SampleError::Empty));
    }

    #[test]
    fn theme_parses() {
        assert_eq!("Dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!("light".parse::<Theme>(), Ok(Theme::Light));
        assert!("sepia".parse::<Theme>().is_err());
    }
}
