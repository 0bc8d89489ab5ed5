// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the energy of an image
//!
//! The carver does not care how energy is measured; it takes any
//! `EnergyFilter` that maps a buffer to a same-shaped map of `f64`
//! scores.  Two gradient filters are provided: the classic dual
//! gradient from [Avidan & Shamir (2007)], computed on the luma
//! channel, and a 3x3 Sobel magnitude.

use crate::error::SeamError;
use crate::pixelbuffer::PixelBuffer;
use image::{GrayImage, ImageBuffer, Luma, Pixel};
use num_traits::NumCast;
use std::str::FromStr;

/// Maps a buffer to an energy map of identical logical shape.
pub trait EnergyFilter<T: Copy> {
    fn energy(&self, image: &PixelBuffer<T>) -> PixelBuffer<f64>;
}

impl<T, F> EnergyFilter<T> for F
where
    T: Copy,
    F: Fn(&PixelBuffer<T>) -> PixelBuffer<f64>,
{
    fn energy(&self, image: &PixelBuffer<T>) -> PixelBuffer<f64> {
        self(image)
    }
}

/// Run `filter` against `image`, refusing any map whose shape differs
/// from the image's.
pub fn compute_energy<T, F>(
    image: &PixelBuffer<T>,
    filter: &F,
) -> Result<PixelBuffer<f64>, SeamError>
where
    T: Copy,
    F: EnergyFilter<T> + ?Sized,
{
    let energy = filter.energy(image);
    if energy.size() != image.size() {
        return Err(SeamError::InvalidFilterOutput {
            expected: image.size(),
            found: energy.size(),
        });
    }
    Ok(energy)
}

#[inline]
fn lumachannel<P: Pixel>(p: &P) -> f64 {
    let c = p.to_luma().channels()[0];
    <f64 as NumCast>::from(c).unwrap_or(0.0)
}

fn luma_of<P: Pixel>(image: &PixelBuffer<P>) -> PixelBuffer<f64> {
    PixelBuffer::from_fn(image.height(), image.width(), |row, col| {
        lumachannel(image.at(row, col))
    })
}

/// Squared luma difference across the horizontal neighbours plus the
/// same across the vertical ones.  A neighbour that falls off the edge
/// is replaced by the pixel itself.
#[derive(Debug, Default, Copy, Clone)]
pub struct DualGradient;

impl<P: Pixel> EnergyFilter<P> for DualGradient {
    fn energy(&self, image: &PixelBuffer<P>) -> PixelBuffer<f64> {
        let luma = luma_of(image);
        let (mh, mw) = (luma.height() - 1, luma.width() - 1);
        PixelBuffer::from_fn(luma.height(), luma.width(), |y, x| {
            let current = luma[(y, x)];
            let (left, right, up, down) = (
                if x == 0 { current } else { luma[(y, x - 1)] },
                if x >= mw { current } else { luma[(y, x + 1)] },
                if y == 0 { current } else { luma[(y - 1, x)] },
                if y >= mh { current } else { luma[(y + 1, x)] },
            );
            let sum = (left - right).powi(2) + (up - down).powi(2);
            if cfg!(feature = "square_root") {
                sum.sqrt()
            } else {
                sum
            }
        })
    }
}

const SOBEL_X: [[f64; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_Y: [[f64; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Gradient magnitude from the 3x3 Sobel kernels, with the border
/// clamped to the nearest edge pixel.
#[derive(Debug, Default, Copy, Clone)]
pub struct Sobel;

impl<P: Pixel> EnergyFilter<P> for Sobel {
    fn energy(&self, image: &PixelBuffer<P>) -> PixelBuffer<f64> {
        let luma = luma_of(image);
        let (height, width) = (luma.height(), luma.width());
        let clamp = |v: usize, d: usize, max: usize| (v + d).saturating_sub(1).min(max - 1);
        PixelBuffer::from_fn(height, width, |y, x| {
            let (mut gx, mut gy) = (0.0, 0.0);
            for ky in 0..3 {
                for kx in 0..3 {
                    let l = luma[(clamp(y, ky, height), clamp(x, kx, width))];
                    gx += l * SOBEL_X[ky][kx];
                    gy += l * SOBEL_Y[ky][kx];
                }
            }
            (gx * gx + gy * gy).sqrt()
        })
    }
}

/// The filters selectable by name, for callers that choose at run
/// time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FilterKind {
    DualGradient,
    Sobel,
}

impl FromStr for FilterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dual-gradient" => Ok(FilterKind::DualGradient),
            "sobel" => Ok(FilterKind::Sobel),
            _ => Err(format!("unknown energy filter '{}'", s)),
        }
    }
}

impl<P: Pixel> EnergyFilter<P> for FilterKind {
    fn energy(&self, image: &PixelBuffer<P>) -> PixelBuffer<f64> {
        match self {
            FilterKind::DualGradient => DualGradient.energy(image),
            FilterKind::Sobel => Sobel.energy(image),
        }
    }
}

/// Render an energy map as a greyscale image, the highest energy in
/// the map mapping to white.
pub fn energy_to_image(energy: &PixelBuffer<f64>) -> GrayImage {
    let factor = energy
        .to_vec()
        .into_iter()
        .filter(|e| e.is_finite())
        .fold(0.0_f64, f64::max);
    let size = energy.size();
    ImageBuffer::from_fn(size.width as u32, size.height as u32, |x, y| {
        let e = energy[(y as usize, x as usize)];
        if factor > 0.0 && e.is_finite() {
            Luma([(e * 255.0 / factor).round().clamp(0.0, 255.0) as u8])
        } else {
            Luma([0])
        }
    })
}
