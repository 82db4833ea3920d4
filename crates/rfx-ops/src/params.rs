//! Effect parameter records and their descriptor tables.
//!
//! Each effect owns a plain parameter struct (`MedianData`,
//! `PosterizeData`, ...). The struct carries only values. Captions and
//! ranges live in a static [`ParamDescriptor`] table so a configuration
//! front end can build controls without the core knowing about them.
//!
//! [`EffectParameters`] is object-safe: dialogs edit parameters through
//! `&mut dyn EffectParameters` using names from the descriptor table.

use crate::{OpsError, OpsResult};
use rfx_core::ColorBgra;
use std::fmt;

/// A single parameter value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    /// Integer.
    Int(i32),
    /// Floating point.
    Float(f64),
    /// Color.
    Color(ColorBgra),
}

impl ParamValue {
    /// Integer value, also accepting integral floats.
    pub fn as_int(self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(v),
            Self::Float(v) if v.fract() == 0.0 && v >= i32::MIN as f64 && v <= i32::MAX as f64 => {
                Some(v as i32)
            }
            _ => None,
        }
    }

    /// Float value, also accepting integers.
    pub fn as_float(self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(v as f64),
            Self::Float(v) => Some(v),
            Self::Color(_) => None,
        }
    }

    /// Color value.
    pub fn as_color(self) -> Option<ColorBgra> {
        match self {
            Self::Color(c) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Color(c) => write!(f, "{c}"),
        }
    }
}

/// Value type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// [`ParamValue::Int`].
    Int,
    /// [`ParamValue::Float`].
    Float,
    /// [`ParamValue::Color`].
    Color,
}

/// Name, caption and inclusive range of one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Key used by [`EffectParameters::get`] and [`EffectParameters::set`].
    pub name: &'static str,
    /// Human readable label.
    pub caption: &'static str,
    /// Value type.
    pub kind: ParamKind,
    /// Inclusive minimum (unused for colors).
    pub min: f64,
    /// Inclusive maximum (unused for colors).
    pub max: f64,
}

impl ParamDescriptor {
    /// Integer parameter in `[min, max]`.
    pub const fn int(name: &'static str, caption: &'static str, min: i32, max: i32) -> Self {
        Self {
            name,
            caption,
            kind: ParamKind::Int,
            min: min as f64,
            max: max as f64,
        }
    }

    /// Float parameter in `[min, max]`.
    pub const fn float(name: &'static str, caption: &'static str, min: f64, max: f64) -> Self {
        Self {
            name,
            caption,
            kind: ParamKind::Float,
            min,
            max,
        }
    }

    /// Color parameter.
    pub const fn color(name: &'static str, caption: &'static str) -> Self {
        Self {
            name,
            caption,
            kind: ParamKind::Color,
            min: 0.0,
            max: 0.0,
        }
    }

    /// Checks kind and range.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidParameter`] naming the parameter.
    pub fn check(&self, value: ParamValue) -> OpsResult<()> {
        let numeric = match (self.kind, value) {
            (ParamKind::Color, ParamValue::Color(_)) => return Ok(()),
            (ParamKind::Int, v) => v.as_int().map(f64::from),
            (ParamKind::Float, v) => v.as_float(),
            (ParamKind::Color, _) => None,
        };
        let Some(v) = numeric else {
            return Err(OpsError::InvalidParameter(format!(
                "{}: expected {:?}, got {value}",
                self.name, self.kind
            )));
        };
        if !(self.min..=self.max).contains(&v) {
            return Err(OpsError::InvalidParameter(format!(
                "{} = {value} outside [{}, {}]",
                self.name, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// A cloneable, validated configuration record for one effect.
pub trait EffectParameters: fmt::Debug + Send + Sync {
    /// Name of the record type, used in error messages.
    fn record_name(&self) -> &'static str;

    /// Descriptor table, one entry per parameter.
    fn descriptors(&self) -> &'static [ParamDescriptor];

    /// Current value of `name`, or `None` for an unknown name.
    fn get(&self, name: &str) -> Option<ParamValue>;

    /// Stores `value` without range checks. Called by [`set`](Self::set)
    /// after validation.
    ///
    /// # Errors
    ///
    /// [`OpsError::UnknownParameter`] or a kind mismatch.
    fn store(&mut self, name: &str, value: ParamValue) -> OpsResult<()>;

    /// Boxed copy.
    fn clone_box(&self) -> Box<dyn EffectParameters>;

    /// `true` if the record equals its defaults.
    fn is_default(&self) -> bool;

    /// Looks up the descriptor for `name`.
    fn descriptor(&self, name: &str) -> Option<&'static ParamDescriptor> {
        self.descriptors().iter().find(|d| d.name == name)
    }

    /// Validates and stores `value`.
    ///
    /// # Errors
    ///
    /// Unknown names, kind mismatches and out-of-range values.
    fn set(&mut self, name: &str, value: ParamValue) -> OpsResult<()> {
        let Some(descriptor) = self.descriptor(name) else {
            return Err(OpsError::UnknownParameter {
                record: self.record_name(),
                name: name.to_string(),
            });
        };
        descriptor.check(value)?;
        self.store(name, value)
    }

    /// Checks every parameter against its descriptor.
    ///
    /// # Errors
    ///
    /// The first out-of-range parameter.
    fn validate(&self) -> OpsResult<()> {
        for d in self.descriptors() {
            let value = self.get(d.name).ok_or_else(|| OpsError::UnknownParameter {
                record: self.record_name(),
                name: d.name.to_string(),
            })?;
            d.check(value)?;
        }
        Ok(())
    }
}

impl Clone for Box<dyn EffectParameters> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Extracts an integer for `store` implementations.
pub(crate) fn expect_int(record: &'static str, name: &str, value: ParamValue) -> OpsResult<i32> {
    value
        .as_int()
        .ok_or_else(|| OpsError::InvalidParameter(format!("{record}.{name}: expected integer, got {value}")))
}

/// Extracts a float for `store` implementations.
pub(crate) fn expect_float(record: &'static str, name: &str, value: ParamValue) -> OpsResult<f64> {
    value
        .as_float()
        .ok_or_else(|| OpsError::InvalidParameter(format!("{record}.{name}: expected number, got {value}")))
}

/// Extracts a color for `store` implementations.
pub(crate) fn expect_color(record: &'static str, name: &str, value: ParamValue) -> OpsResult<ColorBgra> {
    value
        .as_color()
        .ok_or_else(|| OpsError::InvalidParameter(format!("{record}.{name}: expected color, got {value}")))
}

/// Error for a name missing from `store`.
pub(crate) fn unknown(record: &'static str, name: &str) -> OpsError {
    OpsError::UnknownParameter {
        record,
        name: name.to_string(),
    }
}
