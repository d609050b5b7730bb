//! Primary image synthesizer
//!
//! Renders a visualization record as a PNG "glass swatch": a disc in the
//! base color, darker towards the center for deep wines, more opaque for
//! full-bodied ones, with a rim tinted by oak and a bubble pattern for
//! sparkling wines. Rendering is a pure function of the record and size.

use cow_common::params::WineVisualizationParameters;
use cow_common::{Error, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Smallest rendered edge length in pixels
pub const MIN_IMAGE_SIZE: u32 = 64;
/// Largest rendered edge length in pixels
pub const MAX_IMAGE_SIZE: u32 = 1024;

/// Renderer name stored alongside swatch images
pub const SWATCH_RENDERER: &str = "swatch";

const BACKGROUND: [f64; 3] = [255.0, 255.0, 255.0];
const OAK_TONE: [f64; 3] = [139.0, 90.0, 43.0];
const BUBBLES_AT_FULL_EFFERVESCENCE: f64 = 48.0;
const BUBBLE_SEED: u64 = 0x9E37_79B9_7F4A_7C15;
const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Turns a visualization record into image bytes
pub trait ImageSynthesizer: Send + Sync {
    /// Stored in the `renderer` column
    fn name(&self) -> &'static str;

    /// Render `params` as a square PNG
    fn render(&self, params: &WineVisualizationParameters, size: u32) -> Result<Vec<u8>>;
}

/// Clamp a requested size into the supported range
pub fn clamp_size(size: u32) -> u32 {
    size.clamp(MIN_IMAGE_SIZE, MAX_IMAGE_SIZE)
}

/// True if `bytes` start with the PNG signature
pub fn is_png(bytes: &[u8]) -> bool {
    bytes.starts_with(&PNG_SIGNATURE)
}

/// Deterministic glass swatch renderer
#[derive(Debug, Default, Clone, Copy)]
pub struct SwatchSynthesizer;

struct Bubble {
    x: f64,
    y: f64,
    r: f64,
}

impl ImageSynthesizer for SwatchSynthesizer {
    fn name(&self) -> &'static str {
        SWATCH_RENDERER
    }

    fn render(&self, params: &WineVisualizationParameters, size: u32) -> Result<Vec<u8>> {
        params.validate()?;
        let size = clamp_size(size);
        let base = params.base_rgb()?.map(f64::from);

        let pixels = paint(params, base, size);
        encode_png(&pixels, size)
    }
}

fn paint(params: &WineVisualizationParameters, base: [f64; 3], size: u32) -> Vec<u8> {
    let edge = size as f64;
    let center = edge / 2.0;
    let radius = edge * 0.42;
    let rim_width = (edge / 40.0).max(2.0);
    let rim_color = mix(base, OAK_TONE, params.oak_intensity * 0.6);
    let bubbles = bubbles(params.effervescence, center, radius, edge);

    let mut pixels = Vec::with_capacity((size * size * 3) as usize);
    for py in 0..size {
        for px in 0..size {
            let x = px as f64 + 0.5;
            let y = py as f64 + 0.5;
            let dist = ((x - center).powi(2) + (y - center).powi(2)).sqrt();

            let rgb = if dist > radius {
                BACKGROUND
            } else if dist > radius - rim_width {
                rim_color
            } else {
                let t = dist / radius;
                let shaded = scale(base, 1.0 - 0.4 * params.depth * (1.0 - t));
                let opacity = (0.6 + 0.4 * params.body) * (1.0 - 0.25 * t);
                let glass = mix(BACKGROUND, shaded, opacity);

                if bubbles
                    .iter()
                    .any(|b| (x - b.x).powi(2) + (y - b.y).powi(2) <= b.r * b.r)
                {
                    mix(glass, BACKGROUND, 0.6)
                } else {
                    glass
                }
            };

            pixels.extend(rgb.iter().map(|c| c.round().clamp(0.0, 255.0) as u8));
        }
    }
    pixels
}

/// Fixed pseudo-random bubble layout inside the disc
fn bubbles(effervescence: f64, center: f64, radius: f64, edge: f64) -> Vec<Bubble> {
    let count = (effervescence * BUBBLES_AT_FULL_EFFERVESCENCE).round() as usize;
    let mut rng = ChaCha8Rng::seed_from_u64(BUBBLE_SEED);

    (0..count)
        .map(|_| {
            let angle = rng.gen::<f64>() * std::f64::consts::TAU;
            // sqrt spreads bubbles evenly over the disc area
            let dist = rng.gen::<f64>().sqrt() * radius * 0.85;
            Bubble {
                x: center + dist * angle.cos(),
                y: center + dist * angle.sin(),
                r: edge / 90.0 * (1.0 + rng.gen::<f64>()),
            }
        })
        .collect()
}

fn mix(a: [f64; 3], b: [f64; 3], amount: f64) -> [f64; 3] {
    let amount = amount.clamp(0.0, 1.0);
    [
        a[0] + (b[0] - a[0]) * amount,
        a[1] + (b[1] - a[1]) * amount,
        a[2] + (b[2] - a[2]) * amount,
    ]
}

fn scale(c: [f64; 3], factor: f64) -> [f64; 3] {
    [c[0] * factor, c[1] * factor, c[2] * factor]
}

fn encode_png(pixels: &[u8], size: u32) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, size, size);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| Error::Internal(format!("PNG header: {}", e)))?;
        writer
            .write_image_data(pixels)
            .map_err(|e| Error::Internal(format!("PNG data: {}", e)))?;
        writer
            .finish()
            .map_err(|e| Error::Internal(format!("PNG finish: {}", e)))?;
    }
    Ok(buf)
}
