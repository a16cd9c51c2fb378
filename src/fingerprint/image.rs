//! Per-request beacon image.
//!
//! Every call produces a PNG whose dimensions and pixel layout depend on
//! two fresh random bytes, so caches and proxies keyed on content never
//! see the same payload twice in a row. Uniqueness is best-effort and must
//! not be relied on for anything security related.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

/// Content type of the encoded image.
pub const CONTENT_TYPE: &str = "image/png";

/// Largest width or height an image can have (`255 / 5 + 1`).
pub const MAX_DIMENSION: u32 = 52;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Errors that can occur while synthesizing an image.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// The random source could not produce bytes.
    #[error("random source failure: {0}")]
    Random(#[from] rand::Error),

    /// The PNG encoder rejected the raster.
    #[error("image encoding failure: {0}")]
    Encode(#[from] image::ImageError),
}

/// An encoded beacon image.
#[derive(Debug, Clone)]
pub struct SyntheticImage {
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

/// Produces a fresh random source for each image.
pub type RngFactory = fn() -> Box<dyn RngCore>;

fn os_rng() -> Box<dyn RngCore> {
    Box::new(OsRng)
}

/// Image generator bound to a random source.
///
/// The default draws from the operating system's CSPRNG, which is safe to
/// share between tasks without locking.
#[derive(Debug, Clone, Copy)]
pub struct Synthesizer {
    rng: RngFactory,
}

impl Synthesizer {
    pub fn new(rng: RngFactory) -> Self {
        Self { rng }
    }

    /// Synthesize one image.
    pub fn synthesize(&self) -> Result<SyntheticImage, SynthesisError> {
        let mut rng = (self.rng)();
        synthesize_with(&mut *rng)
    }
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new(os_rng)
    }
}

/// Synthesize an image drawing its two random bytes from `rng`.
pub fn synthesize_with<R: RngCore + ?Sized>(rng: &mut R) -> Result<SyntheticImage, SynthesisError> {
    let mut seed = [0u8; 2];
    rng.try_fill_bytes(&mut seed)?;

    let width = dimension(seed[0]);
    let height = dimension(seed[1]);

    let mut raster = RgbaImage::new(width, height);
    mark(&mut raster, width / 3, height / 2);
    mark(&mut raster, height / 4, width / 4);

    let mut bytes = Vec::new();
    raster.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

    Ok(SyntheticImage { width, height, bytes })
}

/// Map a random byte onto `[1, MAX_DIMENSION]`.
fn dimension(byte: u8) -> u32 {
    u32::from(byte) / 5 + 1
}

/// Paint one opaque white pixel, skipping coordinates outside the raster.
fn mark(raster: &mut RgbaImage, x: u32, y: u32) {
    if let Some(pixel) = raster.get_pixel_mut_checked(x, y) {
        *pixel = WHITE;
    }
}
