//! The effect contract.
//!
//! An [`Effect`] reads a source [`Surface`], writes a destination surface of
//! the same size, and touches only pixels inside the supplied regions. The
//! caller owns both surfaces and the region list; the effect owns its
//! parameters and the operator compiled from them.
//!
//! Effects are built from a parameter record (`MedianEffect::new(data)`,
//! ...). Changing parameters means building a new effect or calling
//! `set_data`, which recompiles; a compiled operator is never mutated while
//! a render is running.
//!
//! # Configuration
//!
//! Editing parameters interactively goes through a [`ConfigDialog`]
//! supplied by the host. Effects whose configuration UI has not been built
//! report [`OpsError::NotImplemented`]; that error is a signal to the host,
//! not a render failure.
//!
//! # Example
//!
//! ```rust
//! use rfx_core::{ColorBgra, Surface};
//! use rfx_ops::effects::{PosterizeData, PosterizeEffect};
//! use rfx_ops::Effect;
//!
//! let src = Surface::filled(4, 4, ColorBgra::gray(100));
//! let mut dst = Surface::new(4, 4);
//! let effect = PosterizeEffect::new(PosterizeData::uniform(2));
//! effect.render(&src, &mut dst, &[src.bounds()]).unwrap();
//! assert_eq!(dst.pixel(0, 0), ColorBgra::BLACK);
//! ```

use crate::params::EffectParameters;
use crate::render::{RenderContext, RenderStatus};
use crate::{OpsError, OpsResult};
use rfx_core::{Rect, Surface};

/// Host-side parameter editor.
pub trait ConfigDialog {
    /// Lets the user edit `params` for the effect named `title`.
    ///
    /// Returns `true` if the user accepted the edit.
    fn edit(&self, title: &str, params: &mut dyn EffectParameters) -> bool;
}

/// A region-restricted image effect.
pub trait Effect: Send + Sync {
    /// Display name.
    fn name(&self) -> &'static str;

    /// Current parameters.
    fn parameters(&self) -> &dyn EffectParameters;

    /// How many pixels beyond a destination pixel the effect reads from
    /// the source, in each direction. Zero for per-pixel effects.
    fn read_margin(&self) -> i32 {
        0
    }

    /// `true` if the effect has a configuration dialog.
    fn is_configurable(&self) -> bool {
        true
    }

    /// Renders `rois` of `src` into `dst`.
    ///
    /// # Errors
    ///
    /// Size mismatch, regions outside the surfaces, or invalid parameters.
    fn render_with(
        &self,
        src: &Surface,
        dst: &mut Surface,
        rois: &[Rect],
        ctx: &RenderContext,
    ) -> OpsResult<RenderStatus>;

    /// [`render_with`](Self::render_with) using a default context.
    fn render(&self, src: &Surface, dst: &mut Surface, rois: &[Rect]) -> OpsResult<RenderStatus> {
        self.render_with(src, dst, rois, &RenderContext::default())
    }

    /// Renders `rois` of `surface` onto itself via a scratch copy of the
    /// source. Safe for neighborhood effects.
    fn render_in_place(
        &self,
        surface: &mut Surface,
        rois: &[Rect],
        ctx: &RenderContext,
    ) -> OpsResult<RenderStatus> {
        let src = surface.clone();
        self.render_with(&src, surface, rois, ctx)
    }

    /// Opens the configuration dialog.
    ///
    /// Returns `Ok(true)` if new parameters were accepted.
    ///
    /// # Errors
    ///
    /// [`OpsError::NotImplemented`] when no dialog is available.
    fn launch_configuration(&mut self, dialog: Option<&dyn ConfigDialog>) -> OpsResult<bool>;
}

/// Runs `dialog` on a draft copy of `current`.
///
/// Returns the validated draft if the user accepted, `None` if they
/// cancelled.
///
/// # Errors
///
/// [`OpsError::NotImplemented`] when `dialog` is `None`; validation errors
/// for an accepted but out-of-range draft.
pub fn edit_with_dialog<P>(name: &str, dialog: Option<&dyn ConfigDialog>, current: &P) -> OpsResult<Option<P>>
where
    P: EffectParameters + Clone,
{
    let Some(dialog) = dialog else {
        return Err(not_configurable(name));
    };
    let mut draft = current.clone();
    if !dialog.edit(name, &mut draft) {
        return Ok(None);
    }
    draft.validate()?;
    Ok(Some(draft))
}

/// The error reported when an effect has no configuration UI.
pub fn not_configurable(name: &str) -> OpsError {
    OpsError::NotImplemented(format!("configuration dialog for {name}"))
}
