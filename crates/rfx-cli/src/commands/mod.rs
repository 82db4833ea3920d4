//! CLI command implementations

pub mod palette;
pub mod params;
pub mod render;

use anyhow::{bail, Context, Result};
use rfx_core::{ColorBgra, Surface};
use rfx_ops::{EffectKind, EffectParameters, ParamKind, ParamValue};
use std::path::Path;

/// Parses an effect name.
pub fn parse_effect(name: &str) -> Result<EffectKind> {
    name.parse::<EffectKind>().map_err(anyhow::Error::msg)
}

/// Parses `AxB` into two positive integers.
pub fn parse_pair(s: &str, what: &str) -> Result<(usize, usize)> {
    let (a, b) = s
        .split_once(['x', 'X'])
        .with_context(|| format!("{what} must look like AxB, got '{s}'"))?;
    let a: usize = a.trim().parse().with_context(|| format!("bad {what}: '{s}'"))?;
    let b: usize = b.trim().parse().with_context(|| format!("bad {what}: '{s}'"))?;
    if a == 0 || b == 0 {
        bail!("{what} must be non-zero, got '{s}'");
    }
    Ok((a, b))
}

/// Synthetic test patterns.
pub fn make_pattern(name: &str, width: i32, height: i32) -> Result<Surface> {
    let surface = match name.to_ascii_lowercase().as_str() {
        "checker" | "checkerboard" => Surface::from_fn(width, height, |x, y| {
            if ((x / 8) + (y / 8)) % 2 == 0 { ColorBgra::WHITE } else { ColorBgra::BLACK }
        }),
        "gradient" => Surface::from_fn(width, height, |x, y| {
            let r = (x * 255 / (width - 1).max(1)) as u8;
            let g = (y * 255 / (height - 1).max(1)) as u8;
            ColorBgra::from_rgba(r, g, 255 - r / 2 - g / 2, 255)
        }),
        "noise" => Surface::from_fn(width, height, |x, y| {
            let h = mix((y as u64) << 32 | x as u64);
            ColorBgra::from_bgra(h as u8, (h >> 8) as u8, (h >> 16) as u8, 255)
        }),
        other => bail!("unknown pattern '{other}' (expected checker, gradient or noise)"),
    };
    Ok(surface)
}

/// splitmix64 finalizer.
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Reads `name: value` overrides from a YAML mapping.
///
/// Values are typed by the effect's descriptor table: integers and floats
/// as YAML numbers, colors as `"#RRGGBB"` or `"#RRGGBBAA"` strings.
pub fn load_overrides(path: &Path, params: &dyn EffectParameters) -> Result<Vec<(String, ParamValue)>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read: {}", path.display()))?;
    parse_overrides(&text, params).with_context(|| format!("Invalid parameters in {}", path.display()))
}

/// Parses a YAML override mapping. See [`load_overrides`].
pub fn parse_overrides(text: &str, params: &dyn EffectParameters) -> Result<Vec<(String, ParamValue)>> {
    let doc: serde_yaml::Value = serde_yaml::from_str(text)?;
    let map = match doc {
        serde_yaml::Value::Mapping(map) => map,
        serde_yaml::Value::Null => return Ok(Vec::new()),
        _ => bail!("expected a mapping of parameter names to values"),
    };

    let mut out = Vec::with_capacity(map.len());
    for (key, value) in map {
        let name = key.as_str().context("parameter names must be strings")?;
        let desc = params
            .descriptor(name)
            .with_context(|| format!("{} has no parameter '{name}'", params.record_name()))?;
        let parsed = match desc.kind {
            ParamKind::Int => value
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .map(ParamValue::Int),
            ParamKind::Float => value.as_f64().map(ParamValue::Float),
            ParamKind::Color => value.as_str().and_then(ColorBgra::from_hex).map(ParamValue::Color),
        };
        let parsed = parsed.with_context(|| format!("'{name}' expects {:?}, got {value:?}", desc.kind))?;
        out.push((name.to_string(), parsed));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfx_ops::effects::{LevelsData, MedianData};

    #[test]
    fn test_parse_pair() {
        assert_eq!(parse_pair("640x480", "size").unwrap(), (640, 480));
        assert_eq!(parse_pair("4X2", "tiles").unwrap(), (4, 2));
        assert!(parse_pair("0x4", "tiles").is_err());
        assert!(parse_pair("64", "size").is_err());
    }

    #[test]
    fn test_parse_overrides_typed_by_descriptor() {
        let got = parse_overrides("radius: 3\npercentile: 75\n", &MedianData::default()).unwrap();
        assert_eq!(
            got,
            vec![("radius".to_string(), ParamValue::Int(3)), ("percentile".to_string(), ParamValue::Int(75))]
        );

        let got = parse_overrides("gamma_red: 2\ninput_high: '#C0C0C0'\n", &LevelsData::default()).unwrap();
        assert_eq!(got[0].1, ParamValue::Float(2.0));
        assert_eq!(got[1].1, ParamValue::Color(ColorBgra::from_rgba(192, 192, 192, 255)));

        assert!(parse_overrides("radius: big\n", &MedianData::default()).is_err());
        assert!(parse_overrides("sigma: 1\n", &MedianData::default()).is_err());
        assert!(parse_overrides("", &MedianData::default()).unwrap().is_empty());
    }

    #[test]
    fn test_patterns_and_digest() {
        let a = make_pattern("noise", 16, 16).unwrap();
        let b = make_pattern("noise", 16, 16).unwrap();
        assert_eq!(a.digest(), b.digest());
        assert_eq!(a.digest().len(), 64);
        assert_ne!(a.digest(), make_pattern("checker", 16, 16).unwrap().digest());
        assert!(make_pattern("plasma", 4, 4).is_err());
    }
}
