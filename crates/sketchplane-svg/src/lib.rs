//! SVG markup backend for sketchplane surfaces.
//!
//! Walks a retained [`MemorySurface`] tree and serializes it to SVG
//! markup. Purely a function of the tree; interactivity stays in core.
//!
//! [`MemorySurface`]: sketchplane_core::MemorySurface

mod markup;

pub use markup::{render_markup, write_markup};
