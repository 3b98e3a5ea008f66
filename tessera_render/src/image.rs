// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw image blobs and the image blit.
//!
//! A blob is an 8-byte [`RawImageHeader`] followed by row-major pixels with
//! no padding. Pixels are stored little endian at 8 bits (RGB332), 16 bits
//! (RGB565) or in a 32-bit `0x00RRGGBB` word (depth 24 or 32), and are
//! converted to the display depth while blitting.
//!
//! Only the visible rows are read: the blit seeks to the first visible pixel
//! of each row and reads just the visible columns. Upscaling is chosen by the
//! caller, so one blob can be drawn at either size.
//!
//! Images that cannot be loaded are not an error for the caller. A
//! placeholder box with a caption is drawn instead and an
//! [`ImageFallbackEvent`](tessera_core::trace::ImageFallbackEvent) is
//! traced.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use bytemuck::{Pod, Zeroable};
use tessera_core::area::{Area, Coord};
use tessera_core::color::{Color, ColorDepth, OPA_COVER, Opa};
use tessera_core::painter::{ImageSource, Painter, TextFlags};
use tessera_core::style::Style;
use tessera_core::trace::FallbackReason;

use crate::raster::MapOptions;

/// Size of [`RawImageHeader`] in bytes.
pub const HEADER_SIZE: usize = 8;

/// Header flag: pixels equal to the transparency key are skipped.
pub const FLAG_TRANSPARENT: u16 = 1 << 0;

/// Caption of the placeholder drawn for an image without a source.
pub const NO_DATA: &str = "No\ndata";

/// The fixed header at the start of every image blob.
///
/// Fields are little endian on disk; [`RawImageHeader::from_bytes`] and
/// [`RawImageHeader::to_bytes`] convert.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct RawImageHeader {
    /// Width in source pixels.
    pub width: u16,
    /// Height in source pixels.
    pub height: u16,
    /// Bits per stored pixel: 8, 16, 24 or 32.
    pub color_depth: u16,
    /// Bit 0 is [`FLAG_TRANSPARENT`]. The other bits are padding and ignored.
    pub flags: u16,
}

impl RawImageHeader {
    /// Decodes a little-endian header.
    #[must_use]
    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Self {
        let raw: Self = bytemuck::pod_read_unaligned(bytes);
        Self {
            width: u16::from_le(raw.width),
            height: u16::from_le(raw.height),
            color_depth: u16::from_le(raw.color_depth),
            flags: u16::from_le(raw.flags),
        }
    }

    /// Encodes the header little endian.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        bytemuck::cast(Self {
            width: self.width.to_le(),
            height: self.height.to_le(),
            color_depth: self.color_depth.to_le(),
            flags: self.flags.to_le(),
        })
    }

    /// Whether keyed pixels are skipped.
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.flags & FLAG_TRANSPARENT != 0
    }

    /// Bytes per stored pixel.
    pub fn pixel_size(&self) -> Result<usize, ImageError> {
        match self.color_depth {
            8 => Ok(1),
            16 => Ok(2),
            24 | 32 => Ok(4),
            d => Err(ImageError::UnsupportedDepth(d)),
        }
    }
}

/// Why an image could not be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageError {
    /// The loader knows no image with that name.
    NotFound,
    /// The underlying storage failed.
    Io,
    /// The blob is shorter than the header.
    TruncatedHeader,
    /// The header names a pixel depth that cannot be decoded.
    UnsupportedDepth(u16),
    /// The blob ends before the last visible pixel.
    TruncatedData,
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("image not found"),
            Self::Io => f.write_str("image read failed"),
            Self::TruncatedHeader => f.write_str("image header truncated"),
            Self::UnsupportedDepth(d) => write!(f, "unsupported image color depth {d}"),
            Self::TruncatedData => f.write_str("image pixel data truncated"),
        }
    }
}

impl core::error::Error for ImageError {}

/// Sequential access to one image blob.
pub trait ImageReader {
    /// Moves to absolute byte offset `pos`.
    fn seek(&mut self, pos: u64) -> Result<(), ImageError>;

    /// Fills `buf` from the current position and advances past it.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), ImageError>;
}

/// Resolves [`ImageSource::File`] names to readers.
pub trait ImageLoader {
    /// Opens the blob called `name`.
    fn open(&self, name: &str) -> Result<Box<dyn ImageReader + '_>, ImageError>;
}

/// Named in-memory blobs.
#[derive(Clone, Debug, Default)]
pub struct MemoryLoader {
    blobs: BTreeMap<String, Arc<[u8]>>,
}

impl MemoryLoader {
    /// An empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the blob called `name`.
    pub fn insert(&mut self, name: impl Into<String>, blob: impl Into<Arc<[u8]>>) {
        self.blobs.insert(name.into(), blob.into());
    }

    /// Number of blobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Whether no blob is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

struct SliceReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl ImageReader for SliceReader<'_> {
    fn seek(&mut self, pos: u64) -> Result<(), ImageError> {
        self.pos = usize::try_from(pos).map_err(|_| ImageError::TruncatedData)?;
        Ok(())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), ImageError> {
        let end = self.pos.checked_add(buf.len()).ok_or(ImageError::TruncatedData)?;
        let src = self
            .data
            .get(self.pos..end)
            .ok_or(ImageError::TruncatedData)?;
        buf.copy_from_slice(src);
        self.pos = end;
        Ok(())
    }
}

impl ImageLoader for MemoryLoader {
    fn open(&self, name: &str) -> Result<Box<dyn ImageReader + '_>, ImageError> {
        let data = self.blobs.get(name).ok_or(ImageError::NotFound)?;
        Ok(Box::new(SliceReader { data, pos: 0 }))
    }
}

#[cfg(feature = "std")]
pub use fs::FsLoader;

#[cfg(feature = "std")]
mod fs {
    use std::fs::File;
    use std::io::{self, BufReader, Read, Seek, SeekFrom};
    use std::path::PathBuf;

    use super::{Box, ImageError, ImageLoader, ImageReader};

    /// Loads blobs from files below a root directory.
    #[derive(Clone, Debug)]
    pub struct FsLoader {
        root: PathBuf,
    }

    impl FsLoader {
        /// A loader resolving names relative to `root`.
        #[must_use]
        pub fn new(root: impl Into<PathBuf>) -> Self {
            Self { root: root.into() }
        }
    }

    fn map_io(e: &io::Error) -> ImageError {
        match e.kind() {
            io::ErrorKind::NotFound => ImageError::NotFound,
            io::ErrorKind::UnexpectedEof => ImageError::TruncatedData,
            _ => ImageError::Io,
        }
    }

    struct FileReader(BufReader<File>);

    impl ImageReader for FileReader {
        fn seek(&mut self, pos: u64) -> Result<(), ImageError> {
            self.0.seek(SeekFrom::Start(pos)).map_err(|e| map_io(&e))?;
            Ok(())
        }

        fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), ImageError> {
            self.0.read_exact(buf).map_err(|e| map_io(&e))
        }
    }

    impl ImageLoader for FsLoader {
        fn open(&self, name: &str) -> Result<Box<dyn ImageReader + '_>, ImageError> {
            let file = File::open(self.root.join(name)).map_err(|e| map_io(&e))?;
            Ok(Box::new(FileReader(BufReader::new(file))))
        }
    }
}

/// Converts stored pixels to `depth`, replacing the contents of `out`.
fn decode(color_depth: u16, raw: &[u8], depth: ColorDepth, out: &mut Vec<Color>) {
    out.clear();
    match color_depth {
        8 => out.extend(
            raw.iter()
                .map(|b| Color::from_full(ColorDepth::Rgb332, u32::from(*b)).to_depth(depth)),
        ),
        16 => out.extend(raw.chunks_exact(2).map(|c| {
            let v = u16::from_le_bytes([c[0], c[1]]);
            Color::from_full(ColorDepth::Rgb565, u32::from(v)).to_depth(depth)
        })),
        _ => out.extend(raw.chunks_exact(4).map(|c| {
            let v = u32::from_le_bytes([c[0], c[1], c[2], c[3]]);
            Color::from_full(ColorDepth::Rgb888, v).to_depth(depth)
        })),
    }
}

/// A painter that can also copy pixel rows.
pub trait ImageTarget: Painter {
    /// Pixel format rows are converted to.
    fn depth(&self) -> ColorDepth;

    /// Copies one row of pixels starting at `area`'s top-left corner.
    fn blit_row(&mut self, area: &Area, mask: &Area, pixels: &[Color], opts: &MapOptions);

    /// Reports that a placeholder replaced the image.
    fn image_fallback(&mut self, area: &Area, reason: FallbackReason);
}

/// Draws `src` inside `area`, as 2x2 blocks per pixel when `upscale` is set.
///
/// Symbols are drawn as text. Missing or unreadable images become a
/// `placeholder`-styled box captioned [`NO_DATA`] or the file name.
pub fn draw_image<T: ImageTarget + ?Sized>(
    target: &mut T,
    loader: &dyn ImageLoader,
    placeholder: &Style,
    area: &Area,
    mask: &Area,
    style: &Style,
    opa: Opa,
    src: &ImageSource,
    upscale: bool,
) {
    let (reason, caption) = match src {
        ImageSource::Symbol(text) => {
            target.draw_label(area, mask, style, opa, text, TextFlags::default());
            return;
        }
        ImageSource::File(name) => {
            match blit_file(target, loader, name, area, mask, style, opa, upscale) {
                Ok(()) => return,
                Err(_) => (FallbackReason::LoadFailed, name.as_str()),
            }
        }
        ImageSource::None => (FallbackReason::NoSource, NO_DATA),
    };
    target.image_fallback(area, reason);
    target.draw_rect(area, mask, placeholder, OPA_COVER);
    target.draw_label(area, mask, placeholder, OPA_COVER, caption, TextFlags::default());
}

fn blit_file<T: ImageTarget + ?Sized>(
    target: &mut T,
    loader: &dyn ImageLoader,
    name: &str,
    area: &Area,
    mask: &Area,
    style: &Style,
    opa: Opa,
    upscale: bool,
) -> Result<(), ImageError> {
    let mut reader = loader.open(name)?;
    let mut head = [0_u8; HEADER_SIZE];
    reader.read_exact(&mut head).map_err(|e| match e {
        ImageError::TruncatedData => ImageError::TruncatedHeader,
        e => e,
    })?;
    let header = RawImageHeader::from_bytes(&head);
    let px_size = header.pixel_size()?;

    let scale: Coord = if upscale { 2 } else { 1 };
    let width = Coord::from(header.width);
    let image = Area::from_origin_size(
        area.x1,
        area.y1,
        width * scale,
        Coord::from(header.height) * scale,
    );
    let Some(clip) = area.intersect(mask) else {
        return Ok(());
    };
    let Some(mut vis) = image.intersect(&clip) else {
        return Ok(());
    };
    if scale == 2 {
        // Whole 2x2 blocks only: even start, odd end.
        vis.x1 -= (vis.x1 - image.x1) & 1;
        vis.y1 -= (vis.y1 - image.y1) & 1;
        vis.x2 += 1 - ((vis.x2 - image.x1) & 1);
        vis.y2 += 1 - ((vis.y2 - image.y1) & 1);
    }

    let col0 = (vis.x1 - image.x1) / scale;
    let row0 = (vis.y1 - image.y1) / scale;
    let cols = vis.width() / scale;
    let stride = usize::from(header.width) * px_size;

    let opts = MapOptions {
        opa,
        chroma_key: header.is_transparent(),
        recolor: style.image.recolor,
        intensity: style.image.intensity,
        upscale,
    };
    let depth = target.depth();
    let mut raw = vec![0_u8; cols.unsigned_abs() as usize * px_size];
    let mut line = Vec::with_capacity(raw.len() / px_size);
    let mut pos = HEADER_SIZE
        + row0.unsigned_abs() as usize * stride
        + col0.unsigned_abs() as usize * px_size;
    let mut y = vis.y1;
    while y <= vis.y2 {
        reader.seek(pos as u64)?;
        reader.read_exact(&mut raw)?;
        decode(header.color_depth, &raw, depth, &mut line);
        let row = Area::new(vis.x1, y, vis.x2, y + scale - 1);
        target.blit_row(&row, &clip, &line, &opts);
        pos += stride;
        y += scale;
    }
    Ok(())
}
