use crate::assets::AssetLoader;
use std::collections::HashMap;

/// Selection key meaning "no transform, show the source unchanged"
pub const ORIGINAL: &str = "original";

/// What the user picked from the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteSelection {
    Original,
    Named { name: String, colors: Vec<String> },
}

impl PaletteSelection {
    pub fn named(name: impl Into<String>, colors: Vec<String>) -> Self {
        PaletteSelection::Named {
            name: name.into(),
            colors,
        }
    }

    /// Cache key; palette identity is its name, not its colors.
    pub fn key(&self) -> &str {
        match self {
            PaletteSelection::Original => ORIGINAL,
            PaletteSelection::Named { name, .. } => name,
        }
    }

    pub fn is_original(&self) -> bool {
        matches!(self, PaletteSelection::Original)
    }
}

/// Named palettes loaded from palettes.yaml (name -> list of `#rrggbb`)
///
/// Colors are kept as strings; they are parsed and validated when a
/// conversion prepares the palette.
#[derive(Debug, Clone, Default)]
pub struct PaletteCatalog {
    palettes: HashMap<String, Vec<String>>,
}

impl PaletteCatalog {
    /// Parse a catalog from YAML.
    ///
    /// An entry named `original` is dropped, since that key is reserved.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        let mut palettes: HashMap<String, Vec<String>> = serde_yaml::from_str(content)?;
        if palettes.remove(ORIGINAL).is_some() {
            tracing::warn!("Ignoring catalog entry named {ORIGINAL:?}, the key is reserved");
        }
        Ok(Self { palettes })
    }

    /// Load the catalog from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_palettes_string() {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(catalog) => {
                    tracing::info!(palettes = catalog.len(), "Loaded palette catalog");
                    catalog
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse palette catalog, no palettes available");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read palette catalog, no palettes available");
                Self::default()
            }
        }
    }

    /// Number of named palettes (the `original` sentinel not counted)
    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }

    /// All selectable names: `original` first, then the palettes sorted
    /// case-insensitively.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.palettes.keys().map(String::as_str).collect();
        names.sort_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        });
        names.insert(0, ORIGINAL);
        names
    }

    /// Names containing `term`, ignoring case, in [`names`](Self::names) order.
    pub fn search(&self, term: &str) -> Vec<&str> {
        let term = term.to_lowercase();
        self.names()
            .into_iter()
            .filter(|name| name.to_lowercase().contains(&term))
            .collect()
    }

    pub fn colors(&self, name: &str) -> Option<&[String]> {
        self.palettes.get(name).map(Vec::as_slice)
    }

    /// Look up a selection by name.
    ///
    /// An exact match wins; otherwise the first case-insensitive match in
    /// [`names`](Self::names) order is used. The `original` sentinel only
    /// matches exactly.
    pub fn select(&self, name: &str) -> Option<PaletteSelection> {
        if name == ORIGINAL {
            return Some(PaletteSelection::Original);
        }
        if let Some(colors) = self.palettes.get(name) {
            return Some(PaletteSelection::named(name, colors.clone()));
        }

        let wanted = name.to_lowercase();
        let found = self
            .names()
            .into_iter()
            .skip(1)
            .find(|candidate| candidate.to_lowercase() == wanted)?;
        self.palettes
            .get(found)
            .map(|colors| PaletteSelection::named(found, colors.clone()))
    }
}

/// File name for a recolored download: `<stem>-<palette>.png`.
///
/// The stem is the source name up to its first `.`; whitespace runs in the
/// palette name become a single `-`.
pub fn output_file_name(source_name: &str, palette: &str) -> String {
    let stem = source_name.split('.').next().unwrap_or(source_name);
    let palette = palette.split_whitespace().collect::<Vec<_>>().join("-");
    format!("{stem}-{palette}.png")
}
