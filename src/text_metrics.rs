use crate::surface::{block_extent, ApproxMetrics, TextExtent, TextMeasure};
use crate::symbol::TextStyle;
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::Mutex;
use ttf_parser::{Face, GlyphId};

static TEXT_MEASURER: Lazy<Mutex<TextMeasurer>> = Lazy::new(|| Mutex::new(TextMeasurer::new()));

/// Width of a single line of text in the first installed font matching
/// `font_family`, or `None` when no face can be resolved.
pub fn measure_text_width(text: &str, font_size: f64, font_family: &str) -> Option<f64> {
    if text.is_empty() || font_size <= 0.0 {
        return Some(0.0);
    }
    let mut guard = TEXT_MEASURER.lock().ok()?;
    guard
        .measure(text, font_size as f32, font_family)
        .map(|width| width as f64)
}

/// Resolves the face for `font_family` ahead of measurement and stores it in
/// the on-disk font cache (`$XDG_CACHE_HOME/mlc/font-cache`). Returns whether
/// a face was found.
pub fn preload_font(font_family: &str) -> bool {
    let Ok(mut guard) = TEXT_MEASURER.lock() else {
        return false;
    };
    guard.preload(font_family)
}

/// Text metrics backed by system fonts. Lines whose family cannot be
/// resolved fall back to [`ApproxMetrics`].
///
/// Measuring only reads: system fonts and faces already in the on-disk cache.
/// The cache is written by [`FontMetrics::preload`], never while measuring.
#[derive(Debug, Clone, Copy, Default)]
pub struct FontMetrics;

impl FontMetrics {
    pub fn preload(&self, style: &TextStyle) -> bool {
        preload_font(&style.font_family)
    }
}

impl TextMeasure for FontMetrics {
    fn measure_text(&self, text: &str, style: &TextStyle) -> TextExtent {
        block_extent(text, style, |line| {
            measure_text_width(line, style.font_size, &style.font_family)
                .unwrap_or_else(|| ApproxMetrics::line_width(line, style.font_size))
        })
    }
}

struct TextMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    cache: HashMap<String, Option<FontFace>>,
}

impl TextMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            cache: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let family_key = normalize_family_key(font_family);
        if !self.cache.contains_key(&family_key) {
            let face = self.load_face(font_family, false);
            if face.is_none() {
                log::debug!("no font face resolved for family {family_key:?}");
            }
            self.cache.insert(family_key.clone(), face);
        }
        let face = self.cache.get_mut(&family_key)?.as_mut()?;
        let normalized = text.replace('\t', "    ");
        face.measure_width(&normalized, font_size)
    }

    fn preload(&mut self, font_family: &str) -> bool {
        let family_key = normalize_family_key(font_family);
        if let Some(Some(_)) = self.cache.get(&family_key) {
            return true;
        }
        let face = self.load_face(font_family, true);
        let found = face.is_some();
        self.cache.insert(family_key, face);
        found
    }

    /// Loads the face for `font_family`, from the disk cache first. With
    /// `persist`, a face found among system fonts is written to the cache.
    fn load_face(&mut self, font_family: &str, persist: bool) -> Option<FontFace> {
        let family_key = normalize_family_key(font_family);
        if let Some(face) = load_cached_face(&family_key) {
            return Some(face);
        }
        #[derive(Clone, Copy)]
        enum FamilyToken {
            Generic(fontdb::Family<'static>),
            Name(usize),
        }

        let mut names: Vec<String> = Vec::new();
        let mut order: Vec<FamilyToken> = Vec::new();
        for part in font_family.split(',') {
            let raw = part.trim().trim_matches('"').trim_matches('\'');
            if raw.is_empty() {
                continue;
            }
            match raw.to_ascii_lowercase().as_str() {
                "serif" => order.push(FamilyToken::Generic(Family::Serif)),
                "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                    order.push(FamilyToken::Generic(Family::SansSerif))
                }
                "monospace" | "ui-monospace" => order.push(FamilyToken::Generic(Family::Monospace)),
                "cursive" => order.push(FamilyToken::Generic(Family::Cursive)),
                "fantasy" => order.push(FamilyToken::Generic(Family::Fantasy)),
                _ => {
                    order.push(FamilyToken::Name(names.len()));
                    names.push(raw.to_string());
                }
            }
        }
        if order.is_empty() {
            order.push(FamilyToken::Generic(Family::SansSerif));
        }

        let families: Vec<Family<'_>> = order
            .into_iter()
            .map(|token| match token {
                FamilyToken::Generic(family) => family,
                FamilyToken::Name(idx) => Family::Name(names[idx].as_str()),
            })
            .collect();

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        let mut loaded: Option<FontFace> = None;
        self.db.with_face_data(id, |data, index| {
            let Some(face) = FontFace::new(data, index) else {
                return;
            };
            if persist
                && let Some((font_path, meta_path)) = cache_paths(&family_key)
                && !font_path.exists()
            {
                if let Some(parent) = font_path.parent() {
                    let _ = fs::create_dir_all(parent);
                }
                let _ = fs::write(&font_path, data);
                let _ = fs::write(&meta_path, index.to_string());
            }
            loaded = Some(face);
        });
        loaded
    }
}

/// Horizontal advances of one parsed face, resolved up front so no borrow
/// of the font bytes outlives parsing.
struct FontFace {
    units_per_em: u16,
    ascii_advances: [u16; 128],
    advances: HashMap<char, Option<u16>>,
}

impl FontFace {
    fn new(data: &[u8], index: u32) -> Option<Self> {
        let face = Face::parse(data, index).ok()?;
        let units_per_em = face.units_per_em().max(1);
        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph_id) = face.glyph_index(byte as char) {
                ascii_advances[byte as usize] = face.glyph_hor_advance(glyph_id).unwrap_or(0);
            }
        }
        // Non-ASCII advances for the glyphs a map is likely to label with.
        let mut advances = HashMap::new();
        for ch in ('\u{00A0}'..='\u{024F}').chain('\u{0370}'..='\u{04FF}') {
            let advance = face
                .glyph_index(ch)
                .map(|glyph: GlyphId| face.glyph_hor_advance(glyph).unwrap_or(0));
            advances.insert(ch, advance);
        }
        Some(Self {
            units_per_em,
            ascii_advances,
            advances,
        })
    }

    fn measure_width(&mut self, text: &str, font_size: f32) -> Option<f32> {
        let scale = font_size / self.units_per_em as f32;
        let fallback = font_size * 0.56;
        let mut width = 0.0f32;
        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            let advance = if ch.is_ascii() {
                Some(self.ascii_advances[ch as usize])
            } else {
                self.advances.get(&ch).copied().flatten()
            };
            match advance {
                Some(advance) if advance > 0 => width += advance as f32 * scale,
                _ => width += fallback,
            }
        }
        Some(width.max(0.0))
    }
}

fn normalize_family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}

fn cache_paths(family_key: &str) -> Option<(PathBuf, PathBuf)> {
    let base = std::env::var_os("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache")))?;
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    family_key.hash(&mut hasher);
    let hash = hasher.finish();
    let dir = base.join("mlc").join("font-cache");
    let font_path = dir.join(format!("{hash:x}.font"));
    let meta_path = dir.join(format!("{hash:x}.meta"));
    Some((font_path, meta_path))
}

fn load_cached_face(family_key: &str) -> Option<FontFace> {
    let (font_path, meta_path) = cache_paths(family_key)?;
    if !font_path.exists() || !meta_path.exists() {
        return None;
    }
    let bytes = fs::read(font_path).ok()?;
    let index: u32 = fs::read_to_string(meta_path).ok()?.trim().parse().ok()?;
    FontFace::new(&bytes, index)
}
