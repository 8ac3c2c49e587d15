// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — decoding, RGB flattening, and bounded downscaling.

pub mod normalize;
pub mod processor;

pub use normalize::{ProcessedImage, normalize};
pub use processor::ImageProcessor;
