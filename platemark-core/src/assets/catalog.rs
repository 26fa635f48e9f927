use std::{collections::BTreeMap, path::PathBuf, sync::OnceLock};

use anyhow::Context as _;
use regex::Regex;

use crate::{
    config::model::IconRef,
    foundation::error::PlatemarkResult,
    render::compose::{IconArtwork, IconLookup},
};

/// Fallback viewBox for icons whose root element carries none.
const DEFAULT_VIEW_BOX: &str = "0 0 24 24";

/// One catalogued icon.
#[derive(Clone, Debug)]
pub struct IconEntry {
    /// Taxonomy reference parsed from the file name.
    pub icon: IconRef,
    /// The on-disk file name.
    pub file_name: String,
}

/// Directory-backed icon catalog.
///
/// Icons are flat SVG files named `category[_subcategory]_name.svg`; the
/// catalog groups them into a category → subcategory → entries tree for
/// browsing and resolves [`IconRef`]s back to artwork on demand.
pub struct IconCatalog {
    root: PathBuf,
    tree: BTreeMap<String, BTreeMap<String, Vec<IconEntry>>>,
}

impl IconCatalog {
    /// Scan `root` for catalog files. Unparseable names are skipped.
    pub fn scan(root: impl Into<PathBuf>) -> PlatemarkResult<Self> {
        let root = root.into();
        let mut tree: BTreeMap<String, BTreeMap<String, Vec<IconEntry>>> = BTreeMap::new();

        let entries = std::fs::read_dir(&root)
            .with_context(|| format!("read icon directory '{}'", root.display()))?;
        for entry in entries {
            let entry = entry.context("read icon directory entry")?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let Some(icon) = IconRef::from_file_name(&file_name) else {
                continue;
            };
            tree.entry(icon.category.clone())
                .or_default()
                .entry(icon.subcategory.clone())
                .or_default()
                .push(IconEntry { icon, file_name });
        }
        for subtree in tree.values_mut() {
            for entries in subtree.values_mut() {
                entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
            }
        }

        Ok(Self { root, tree })
    }

    /// Total number of catalogued icons.
    pub fn len(&self) -> usize {
        self.tree
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    /// Whether the catalog holds no icons.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Category names in sorted order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.tree.keys().map(String::as_str)
    }

    /// Entries under one category/subcategory pair.
    pub fn entries(&self, category: &str, subcategory: &str) -> &[IconEntry] {
        self.tree
            .get(category)
            .and_then(|sub| sub.get(subcategory))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn resolve_path(&self, icon: &IconRef) -> Option<PathBuf> {
        icon.file_name_candidates()
            .into_iter()
            .map(|name| self.root.join(name))
            .find(|path| path.is_file())
    }
}

impl IconLookup for IconCatalog {
    fn lookup(&self, icon: &IconRef) -> PlatemarkResult<Option<IconArtwork>> {
        let Some(path) = self.resolve_path(icon) else {
            return Ok(None);
        };
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("read icon file '{}'", path.display()))?;
        Ok(extract_svg_fragment(&contents))
    }
}

/// Pull the inner markup and viewBox out of a standalone SVG document.
pub(crate) fn extract_svg_fragment(svg: &str) -> Option<IconArtwork> {
    static VIEW_BOX: OnceLock<Regex> = OnceLock::new();
    let view_box_re =
        VIEW_BOX.get_or_init(|| Regex::new(r#"viewBox\s*=\s*"([^"]*)""#).expect("static regex"));

    let open_start = svg.find("<svg")?;
    let open_end = open_start + svg[open_start..].find('>')?;
    let close = svg.rfind("</svg>")?;
    if close <= open_end {
        return None;
    }

    let open_tag = &svg[open_start..=open_end];
    let view_box = view_box_re
        .captures(open_tag)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_VIEW_BOX.to_string());

    Some(IconArtwork {
        markup: svg[open_end + 1..close].trim().to_string(),
        view_box,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/catalog.rs"]
mod tests;
