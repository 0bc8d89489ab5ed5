// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seamcarve - The main function
//!
//! Seams always run across the columns of the working buffer and
//! removing one takes a row away.  Width is carved by transposing the
//! buffer first, so there is only one removal routine.

use crate::energy::EnergyFilter;
use crate::error::SeamError;
use crate::pixelbuffer::{PixelBuffer, Size};
use crate::seamfinder::{low_energy_path, SeamPoint};
use image::{ImageBuffer, Pixel};
use log::{debug, info};

/// Delete the pixel the seam names in every column, moving everything
/// below it up by one, then drop the last row.
pub fn remove_row<T: Copy>(seam: &[SeamPoint], from: &mut PixelBuffer<T>) {
    let (height, width) = (from.height(), from.width());
    assert_eq!(seam.len(), width, "seam does not cover every column");
    assert!(height > 1, "cannot remove the only row");

    // The seam is stored last column first; address it by column.
    let mut rows = vec![0; width];
    for point in seam {
        rows[point.col] = point.row;
    }

    for (col, &seam_row) in rows.iter().enumerate() {
        for row in seam_row..height - 1 {
            from[(row, col)] = from[(row + 1, col)];
        }
    }
    *from = from.crop(0..height - 1, 0..width);
}

/// Remove `k` seams from `buffer`, recomputing the energy each time.
pub fn remove_rows<T, F>(
    buffer: &mut PixelBuffer<T>,
    k: usize,
    filter: &F,
) -> Result<(), SeamError>
where
    T: Copy,
    F: EnergyFilter<T> + ?Sized,
{
    for _ in 0..k {
        let seam = low_energy_path(buffer, filter)?;
        remove_row(&seam, buffer);
    }
    Ok(())
}

fn check_target(target: Size) -> Result<(), SeamError> {
    if target.width == 0 || target.height == 0 {
        return Err(SeamError::InvalidTargetSize(target));
    }
    Ok(())
}

/// Shrink a copy of `input` towards `target`.  Height is carved
/// first, then width; an axis already at or below its target is left
/// alone, so a 640x480 image asked for 600x500 comes back 600x480.
pub fn shrink_to_fit<T, F>(
    input: &PixelBuffer<T>,
    target: Size,
    filter: &F,
) -> Result<PixelBuffer<T>, SeamError>
where
    T: Copy,
    F: EnergyFilter<T> + ?Sized,
{
    check_target(target)?;
    let source = input.size();
    info!("shrinking {} towards {}", source, target);

    let mut scratch = input.clone();
    if source.height > target.height {
        let seams = source.height - target.height;
        debug!("removing {} horizontal seams", seams);
        remove_rows(&mut scratch, seams, filter)?;
    }
    if source.width > target.width {
        let seams = source.width - target.width;
        debug!("removing {} vertical seams", seams);
        scratch.transpose();
        remove_rows(&mut scratch, seams, filter)?;
        scratch.transpose();
    }
    Ok(scratch.into_physical())
}

/// Grow `input` to `target` by seam insertion.  Not implemented: it
/// always fails without producing an image.
pub fn expand_to_fit<T, F>(
    input: &PixelBuffer<T>,
    target: Size,
    _filter: &F,
) -> Result<PixelBuffer<T>, SeamError>
where
    T: Copy,
    F: EnergyFilter<T> + ?Sized,
{
    check_target(target)?;
    debug!("refusing to expand {} to {}", input.size(), target);
    Err(SeamError::NotImplemented("expand_to_fit"))
}

/// `shrink_to_fit` for an `image` buffer.
pub fn shrink_image<P, F>(
    image: &ImageBuffer<P, Vec<P::Subpixel>>,
    target: Size,
    filter: &F,
) -> Result<ImageBuffer<P, Vec<P::Subpixel>>, SeamError>
where
    P: Pixel,
    F: EnergyFilter<P> + ?Sized,
{
    let buffer = PixelBuffer::from_image(image);
    Ok(shrink_to_fit(&buffer, target, filter)?.to_image())
}

/// `expand_to_fit` for an `image` buffer.
pub fn expand_image<P, F>(
    image: &ImageBuffer<P, Vec<P::Subpixel>>,
    target: Size,
    filter: &F,
) -> Result<ImageBuffer<P, Vec<P::Subpixel>>, SeamError>
where
    P: Pixel,
    F: EnergyFilter<P> + ?Sized,
{
    let buffer = PixelBuffer::from_image(image);
    Ok(expand_to_fit(&buffer, target, filter)?.to_image())
}
