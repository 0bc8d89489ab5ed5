// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A transposable two-dimensional buffer
//!
//! Everything the carver touches (the image being carved, the energy
//! map, the cumulative cost table) is held in a `PixelBuffer`.  The
//! buffer carries an orientation flag: when it is set, every row
//! becomes a column and vice versa, without moving a single byte.
//! That lets the one row-removal routine shrink either dimension.

use crate::error::SeamError;
use image::{GenericImageView, ImageBuffer, Pixel};
use std::fmt;
use std::ops::{Index, IndexMut, Range};

/// A width and height pair, in that order, the way `image` reports
/// dimensions.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    pub fn new(width: usize, height: usize) -> Self {
        Size { width, height }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An addressable two-dimensional field of `T`, addressed by
/// `(row, col)`.  `T` is a pixel for image data, or `f64` for energy
/// and cost tables.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer<T: Copy> {
    rows: usize,
    cols: usize,
    transposed: bool,
    data: Vec<T>,
}

impl<T: Copy + Default> PixelBuffer<T> {
    /// A new buffer with every element set to `T::default()`.
    pub fn new(height: usize, width: usize) -> Self {
        Self::filled(height, width, T::default())
    }
}

impl<T: Copy> PixelBuffer<T> {
    pub fn filled(height: usize, width: usize, value: T) -> Self {
        assert!(height > 0 && width > 0, "empty buffer {}x{}", width, height);
        PixelBuffer {
            rows: height,
            cols: width,
            transposed: false,
            data: vec![value; height * width],
        }
    }

    /// Wrap row-major `data` as a `height` by `width` buffer.
    pub fn from_vec(height: usize, width: usize, data: Vec<T>) -> Result<Self, SeamError> {
        if height == 0 || width == 0 || data.len() != height * width {
            return Err(SeamError::ShapeMismatch {
                expected: height * width,
                found: data.len(),
            });
        }
        Ok(PixelBuffer {
            rows: height,
            cols: width,
            transposed: false,
            data,
        })
    }

    pub fn from_fn<F>(height: usize, width: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        assert!(height > 0 && width > 0, "empty buffer {}x{}", width, height);
        let mut data = Vec::with_capacity(height * width);
        for row in 0..height {
            for col in 0..width {
                data.push(f(row, col));
            }
        }
        PixelBuffer {
            rows: height,
            cols: width,
            transposed: false,
            data,
        }
    }

    /// Logical height, honouring the orientation flag.
    pub fn height(&self) -> usize {
        if self.transposed {
            self.cols
        } else {
            self.rows
        }
    }

    /// Logical width, honouring the orientation flag.
    pub fn width(&self) -> usize {
        if self.transposed {
            self.rows
        } else {
            self.cols
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn is_transposed(&self) -> bool {
        self.transposed
    }

    /// Swap the meaning of rows and columns.  Only the flag changes.
    pub fn transpose(&mut self) {
        self.transposed = !self.transposed;
    }

    /// Adopt the orientation of `other`, keeping this buffer's
    /// logical content addressable the same way `other` is.
    pub fn set_orientation<U: Copy>(&mut self, other: &PixelBuffer<U>) {
        self.transposed = other.transposed;
    }

    // Absolutely, the number one name of this game is keep the index
    // math in a singular location and never, ever mess with it.
    fn get_index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.height() && col < self.width(),
            "index ({}, {}) out of range for {} buffer",
            row,
            col,
            self.size()
        );
        let (prow, pcol) = if self.transposed { (col, row) } else { (row, col) };
        prow * self.cols + pcol
    }

    pub fn at(&self, row: usize, col: usize) -> &T {
        &self.data[self.get_index(row, col)]
    }

    pub fn at_mut(&mut self, row: usize, col: usize) -> &mut T {
        let index = self.get_index(row, col);
        &mut self.data[index]
    }

    /// A new buffer holding the logical sub-range `rows` by `cols`.
    /// The orientation flag carries over to the result.
    pub fn crop(&self, rows: Range<usize>, cols: Range<usize>) -> Self {
        assert!(
            rows.start < rows.end && rows.end <= self.height(),
            "row range {:?} invalid for {} buffer",
            rows,
            self.size()
        );
        assert!(
            cols.start < cols.end && cols.end <= self.width(),
            "column range {:?} invalid for {} buffer",
            cols,
            self.size()
        );
        let (prows, pcols) = if self.transposed { (cols, rows) } else { (rows, cols) };
        let mut data = Vec::with_capacity(prows.len() * pcols.len());
        for prow in prows.clone() {
            let start = prow * self.cols;
            data.extend_from_slice(&self.data[start + pcols.start..start + pcols.end]);
        }
        PixelBuffer {
            rows: prows.len(),
            cols: pcols.len(),
            transposed: self.transposed,
            data,
        }
    }

    /// Logical contents, row-major.
    pub fn to_vec(&self) -> Vec<T> {
        if !self.transposed {
            return self.data.clone();
        }
        let (height, width) = (self.height(), self.width());
        let mut out = Vec::with_capacity(height * width);
        for row in 0..height {
            for col in 0..width {
                out.push(*self.at(row, col));
            }
        }
        out
    }

    /// Rewrite storage so the physical layout matches the logical one
    /// and the orientation flag is clear.
    pub fn into_physical(self) -> Self {
        if !self.transposed {
            return self;
        }
        let (height, width) = (self.height(), self.width());
        PixelBuffer {
            data: self.to_vec(),
            rows: height,
            cols: width,
            transposed: false,
        }
    }
}

impl<P: Pixel> PixelBuffer<P> {
    /// Copy an image into a buffer; image `y` becomes the row and
    /// image `x` the column.
    pub fn from_image<I>(image: &I) -> Self
    where
        I: GenericImageView<Pixel = P>,
    {
        let (width, height) = image.dimensions();
        PixelBuffer::from_fn(height as usize, width as usize, |row, col| {
            image.get_pixel(col as u32, row as u32)
        })
    }

    pub fn to_image(&self) -> ImageBuffer<P, Vec<P::Subpixel>> {
        let size = self.size();
        ImageBuffer::from_fn(size.width as u32, size.height as u32, |x, y| {
            *self.at(y as usize, x as usize)
        })
    }
}

impl<T: Copy> Index<(usize, usize)> for PixelBuffer<T> {
    type Output = T;

    /// A convenience addressing mode for getting values.
    fn index(&self, (row, col): (usize, usize)) -> &T {
        self.at(row, col)
    }
}

impl<T: Copy> IndexMut<(usize, usize)> for PixelBuffer<T> {
    /// A convenience addressing mode for setting values.
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        self.at_mut(row, col)
    }
}
