//! Palette model and format registry working together.

use rfx_core::ColorBgra;
use rfx_palette::{
    Palette, PaletteError, PaletteFormat, PaletteFormatRegistry, PaletteLoader, PaletteResult, PaletteSaver,
    DEFAULT_PALETTE_LEN,
};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Whitespace-separated `R G B` triples, one per line, after a `RGB` header.
struct Triples;

impl PaletteLoader for Triples {
    fn load(&self, path: &Path) -> PaletteResult<Vec<ColorBgra>> {
        let text = std::fs::read_to_string(path)?;
        let mut lines = text.lines();
        if lines.next().map(str::trim) != Some("RGB") {
            return Err(PaletteError::load_failed("Triples", "missing RGB header"));
        }
        lines
            .filter(|l| !l.trim().is_empty())
            .map(|l| {
                let v: Vec<u8> = l
                    .split_whitespace()
                    .map(|t| t.parse::<u8>().map_err(|e| PaletteError::load_failed("Triples", e)))
                    .collect::<PaletteResult<_>>()?;
                match v.as_slice() {
                    [r, g, b] => Ok(ColorBgra::from_rgba(*r, *g, *b, 255)),
                    _ => Err(PaletteError::load_failed("Triples", format!("bad line '{l}'"))),
                }
            })
            .collect()
    }
}

impl PaletteSaver for Triples {
    fn save(&self, colors: &[ColorBgra], path: &Path) -> PaletteResult<()> {
        let mut text = String::from("RGB\n");
        for c in colors {
            text.push_str(&format!("{} {} {}\n", c.r, c.g, c.b));
        }
        std::fs::write(path, text)?;
        Ok(())
    }
}

/// Rejects everything.
struct Never;

impl PaletteLoader for Never {
    fn load(&self, _path: &Path) -> PaletteResult<Vec<ColorBgra>> {
        Err(PaletteError::load_failed("Never", "unrecognized"))
    }
}

fn registry() -> PaletteFormatRegistry {
    let triples = Arc::new(Triples);
    let mut registry = PaletteFormatRegistry::new();
    registry.register(PaletteFormat::new("Never", &["nev", "NEV"]).with_loader(Arc::new(Never)));
    registry.register(PaletteFormat::new("Triples", &["rgb"]).with_loader(triples.clone()).with_saver(triples));
    registry.register(PaletteFormat::new("WriteOnly", &["wo"]).with_saver(Arc::new(Triples)));
    registry
}

#[test]
fn test_save_then_load_with_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let saved = dir.path().join("swatches.rgb");
    let renamed = dir.path().join("swatches.dat");
    let reg = registry();

    let mut palette = Palette::default();
    palette.resize(3);
    palette.set(2, ColorBgra::from_rgba(10, 20, 30, 255)).unwrap();
    reg.save(&palette, &saved, "Triples").unwrap();
    std::fs::rename(&saved, &renamed).unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut loaded = Palette::default();
    let sink = Arc::clone(&seen);
    loaded.subscribe(move |colors| sink.lock().unwrap().push(colors.len()));

    reg.load(&mut loaded, &renamed).unwrap();
    assert_eq!(loaded.colors(), palette.colors());
    assert_eq!(*seen.lock().unwrap(), vec![3]);
}

#[test]
fn test_failed_load_keeps_palette_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.bin");
    std::fs::write(&path, "\u{1}\u{2}\u{3}").unwrap();
    let reg = registry();

    let seen = Arc::new(Mutex::new(0usize));
    let mut palette = Palette::default();
    let sink = Arc::clone(&seen);
    palette.subscribe(move |_| *sink.lock().unwrap() += 1);

    let err = reg.load(&mut palette, &path).unwrap_err();
    let PaletteError::UnsupportedFormat { extensions, details, path: reported } = err else {
        panic!("expected UnsupportedFormat");
    };
    assert_eq!(reported, path);
    assert_eq!(extensions, vec!["nev".to_string(), "rgb".to_string()]);
    assert!(details.contains("Failed to load palette as Never:"));
    assert!(details.contains("Failed to load palette as Triples:"));
    assert!(!details.contains("WriteOnly"));
    assert_eq!(palette.len(), DEFAULT_PALETTE_LEN);
    assert_eq!(*seen.lock().unwrap(), 0);
}

#[test]
fn test_extension_lookup_is_case_insensitive() {
    let reg = registry();
    assert_eq!(reg.format_for_path(Path::new("x.NeV")).map(|f| f.name.as_str()), Some("Never"));
    assert_eq!(reg.format_for_path(Path::new("x.RGB")).map(|f| f.name.as_str()), Some("Triples"));
    assert!(reg.format_for_path(Path::new("x.png")).is_none());
}

#[test]
fn test_missing_file_with_known_extension_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = registry().read(&dir.path().join("absent.rgb")).unwrap_err();
    assert!(matches!(err, PaletteError::Io(_)));
}
