//! Params command
//!
//! Prints an effect's descriptor table and its default values as YAML, in
//! the same shape `render --params` reads back.

use crate::ParamsArgs;
use anyhow::Result;
use rfx_ops::{EffectParameters, ParamKind, ParamValue};
use serde::Serialize;

#[derive(Serialize)]
struct ParamRow {
    name: &'static str,
    caption: &'static str,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    range: Option<[f64; 2]>,
    default: serde_yaml::Value,
}

#[derive(Serialize)]
struct EffectSheet {
    effect: String,
    record: &'static str,
    configurable: bool,
    parameters: Vec<ParamRow>,
}

fn yaml_value(value: ParamValue) -> serde_yaml::Value {
    match value {
        ParamValue::Int(v) => serde_yaml::Value::from(v),
        ParamValue::Float(v) => serde_yaml::Value::from(v),
        ParamValue::Color(c) => serde_yaml::Value::from(c.to_hex()),
    }
}

fn rows(params: &dyn EffectParameters) -> Vec<ParamRow> {
    params
        .descriptors()
        .iter()
        .map(|d| ParamRow {
            name: d.name,
            caption: d.caption,
            kind: match d.kind {
                ParamKind::Int => "int",
                ParamKind::Float => "float",
                ParamKind::Color => "color",
            },
            range: (d.kind != ParamKind::Color).then_some([d.min, d.max]),
            default: params.get(d.name).map(yaml_value).unwrap_or(serde_yaml::Value::Null),
        })
        .collect()
}

pub fn run(args: ParamsArgs) -> Result<()> {
    let kind = super::parse_effect(&args.effect)?;
    let effect = kind.create_default();
    let sheet = EffectSheet {
        effect: kind.to_string(),
        record: effect.parameters().record_name(),
        configurable: effect.is_configurable(),
        parameters: rows(effect.parameters()),
    };
    print!("{}", serde_yaml::to_string(&sheet)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfx_ops::effects::PosterizeData;

    #[test]
    fn test_rows_feed_back_into_overrides() {
        let data = PosterizeData::default();
        let rows = rows(&data);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].range, Some([2.0, 64.0]));

        let yaml: String = rows
            .iter()
            .map(|r| format!("{}: {}", r.name, serde_yaml::to_string(&r.default).unwrap_or_default()))
            .collect();
        let parsed = super::super::parse_overrides(&yaml, &data).unwrap();
        assert_eq!(parsed.len(), 3);
        assert!(parsed.iter().all(|(_, v)| *v == ParamValue::Int(16)));
    }
}
