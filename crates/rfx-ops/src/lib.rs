//! # rfx-ops
//!
//! Pixel operators, neighborhood filters and composable effects for 8-bit
//! BGRA surfaces.
//!
//! # Modules
//!
//! - [`pixel_ops`] - single-pixel operators (desaturate, posterize, warmth)
//! - [`level`] - input/output levels with gamma
//! - [`blend`] - two-input blend modes with alpha compositing
//! - [`histogram`] - sliding circular-neighborhood histograms
//! - [`effect`] - the [`Effect`] contract and configuration hook
//! - [`effects`] - concrete effects and [`EffectKind`]
//! - [`pipeline`] - ordered multi-stage effects
//! - [`params`] - parameter records and descriptor tables
//! - [`render`] - region driver, cancellation, row parallelism
//!
//! # Example
//!
//! ```rust
//! use rfx_core::{ColorBgra, Surface};
//! use rfx_ops::effects::{MedianData, MedianEffect};
//! use rfx_ops::Effect;
//!
//! let src = Surface::filled(32, 32, ColorBgra::gray(40));
//! let mut dst = Surface::new(32, 32);
//! let median = MedianEffect::new(MedianData { radius: 4, percentile: 50 });
//! median.render(&src, &mut dst, &src.bounds().split_rows(4)).unwrap();
//! assert_eq!(dst, src);
//! ```
//!
//! # Regions
//!
//! Every render takes a list of disjoint [`Rect`](rfx_core::Rect) regions
//! and writes only inside them. Rendering a partition of an area region by
//! region yields the same pixels as rendering the area in one call.
//!
//! # Feature Flags
//!
//! - `parallel` - row-parallel rendering via rayon (enabled by default)
//! - `serde` - serialization of parameter records

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod blend;
pub mod effect;
pub mod effects;
pub mod histogram;
pub mod level;
pub mod params;
pub mod pipeline;
pub mod pixel_ops;
pub mod render;

pub use blend::{BinaryPixelOp, BlendMode, BlendOp};
pub use effect::{ConfigDialog, Effect};
pub use effects::EffectKind;
pub use error::{OpsError, OpsResult};
pub use histogram::{HistogramQuery, HistogramState, KernelShape, LocalHistogramEngine, PercentileQuery};
pub use level::Level;
pub use params::{EffectParameters, ParamDescriptor, ParamKind, ParamValue};
pub use pipeline::{Pipeline, Stage};
pub use pixel_ops::UnaryPixelOp;
pub use render::{CancelToken, RenderContext, RenderStatus};
