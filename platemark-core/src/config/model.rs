use crate::foundation::{
    core::MmSize,
    error::{PlatemarkError, PlatemarkResult},
};

/// Lower bound for the icon/text scale sliders, in percent.
pub const MIN_SCALE_PERCENT: u8 = 10;
/// Upper bound for the icon/text scale sliders, in percent.
pub const MAX_SCALE_PERCENT: u8 = 100;

/// Discrete plate widths. All classes share the same 10.5 mm height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SizeClass {
    /// 34.5 mm wide plate.
    #[default]
    #[serde(rename = "1u")]
    U1,
    /// 76.5 mm wide plate.
    #[serde(rename = "2u")]
    U2,
    /// 118.5 mm wide plate.
    #[serde(rename = "3u")]
    U3,
}

impl SizeClass {
    /// Physical dimensions of this class in mm.
    pub fn dimensions_mm(self) -> MmSize {
        let width = match self {
            Self::U1 => 34.5,
            Self::U2 => 76.5,
            Self::U3 => 118.5,
        };
        MmSize {
            width,
            height: 10.5,
        }
    }

    /// Short display label ("1u", "2u", "3u").
    pub fn label(self) -> &'static str {
        match self {
            Self::U1 => "1u",
            Self::U2 => "2u",
            Self::U3 => "3u",
        }
    }
}

impl std::str::FromStr for SizeClass {
    type Err = PlatemarkError;

    fn from_str(s: &str) -> PlatemarkResult<Self> {
        match s {
            "1u" => Ok(Self::U1),
            "2u" => Ok(Self::U2),
            "3u" => Ok(Self::U3),
            other => Err(PlatemarkError::validation(format!(
                "unknown size class '{other}' (expected 1u, 2u or 3u)"
            ))),
        }
    }
}

/// How icons occupy the left side of the plate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LeftLayout {
    /// No icons; the text block may take the full width.
    #[serde(rename = "0")]
    None,
    /// One icon.
    #[default]
    #[serde(rename = "1")]
    Single,
    /// Two icons side by side.
    #[serde(rename = "2h")]
    DoubleSide,
    /// Two icons stacked vertically.
    #[serde(rename = "2v")]
    DoubleStack,
    /// Icons in a band above the text instead of beside it.
    #[serde(rename = "2t")]
    TopBand,
}

impl LeftLayout {
    /// Number of icon slots this layout exposes.
    pub fn icon_count(self) -> usize {
        match self {
            Self::None => 0,
            Self::Single => 1,
            Self::DoubleSide | Self::DoubleStack | Self::TopBand => 2,
        }
    }

    /// Whether icons sit in a band above the text rather than beside it.
    pub fn is_top_band(self) -> bool {
        matches!(self, Self::TopBand)
    }
}

/// How text occupies the right side of the plate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RightLayout {
    /// No text.
    #[serde(rename = "0")]
    None,
    /// A single text line.
    #[default]
    #[serde(rename = "1")]
    OneLine,
    /// Two stacked text lines.
    #[serde(rename = "2")]
    TwoLine,
}

impl RightLayout {
    /// Number of text slots this layout exposes.
    pub fn text_count(self) -> usize {
        match self {
            Self::None => 0,
            Self::OneLine => 1,
            Self::TwoLine => 2,
        }
    }
}

/// Horizontal text alignment within a text zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Left edge of the zone, compensated for glyph side bearing.
    Left,
    /// Horizontal centre of the zone.
    #[default]
    Center,
}

/// Reference to a catalogued icon by its taxonomy position.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IconRef {
    /// Top-level category (e.g. "Electrical").
    pub category: String,
    /// Second-level grouping; "General" for two-part file names.
    pub subcategory: String,
    /// Icon name within the subcategory.
    pub name: String,
}

impl IconRef {
    /// Parse a catalog file name of the form `category[_subcategory]_name.svg`.
    ///
    /// Two underscore-separated parts map to category + name with the
    /// "General" subcategory; three or more parts map to category,
    /// subcategory and a dash-joined name.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(".svg")?;
        let parts: Vec<&str> = stem.split('_').collect();
        match parts.as_slice() {
            [category, name] => Some(Self {
                category: title_case(category),
                subcategory: "General".to_string(),
                name: (*name).to_string(),
            }),
            [category, subcategory, rest @ ..] if !rest.is_empty() => Some(Self {
                category: title_case(category),
                subcategory: title_case(subcategory),
                name: rest.join("-"),
            }),
            _ => None,
        }
    }

    /// Candidate catalog file names, most specific first.
    pub fn file_name_candidates(&self) -> Vec<String> {
        let name = self.name.replace('-', "_").to_ascii_lowercase();
        let category = self.category.to_ascii_lowercase();
        let subcategory = self.subcategory.to_ascii_lowercase();
        let mut out = vec![format!("{category}_{subcategory}_{name}.svg")];
        if subcategory == "general" {
            out.push(format!("{category}_{name}.svg"));
        }
        out
    }

    /// Human-readable name: uppercased, dashes and underscores as spaces.
    pub fn display_name(&self) -> String {
        self.name
            .replace(['-', '_'], " ")
            .to_uppercase()
            .trim()
            .to_string()
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Complete description of one tag: geometry, content and styling.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TagConfig {
    /// Plate size class.
    pub size: SizeClass,
    /// Icon-side layout.
    pub left: LeftLayout,
    /// Text-side layout.
    pub right: RightLayout,
    /// Icon slot contents; only the first `left.icon_count()` entries are read.
    #[serde(default)]
    pub icons: [Option<IconRef>; 2],
    /// Text slot contents; only the first `right.text_count()` entries are read.
    #[serde(default)]
    pub texts: [String; 2],
    /// Horizontal alignment for text zones.
    #[serde(default)]
    pub text_align: TextAlign,
    /// Icon scale in percent, clamped to `[MIN_SCALE_PERCENT, MAX_SCALE_PERCENT]`.
    #[serde(default = "default_scale")]
    pub icon_scale: u8,
    /// Text scale in percent, clamped like `icon_scale`.
    #[serde(default = "default_scale")]
    pub text_scale: u8,
    /// Foreground (content) colour as a CSS colour string.
    #[serde(default = "default_foreground")]
    pub foreground: String,
    /// Background colour as a CSS colour string.
    #[serde(default = "default_background")]
    pub background: String,
}

fn default_scale() -> u8 {
    MAX_SCALE_PERCENT
}

fn default_foreground() -> String {
    "#000000".to_string()
}

fn default_background() -> String {
    "#ffffff".to_string()
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            size: SizeClass::default(),
            left: LeftLayout::default(),
            right: RightLayout::default(),
            icons: [None, None],
            texts: [String::new(), String::new()],
            text_align: TextAlign::default(),
            icon_scale: default_scale(),
            text_scale: default_scale(),
            foreground: default_foreground(),
            background: default_background(),
        }
    }
}

impl TagConfig {
    /// Check structural invariants without mutating the config.
    pub fn validate(&self) -> PlatemarkResult<()> {
        for (label, value) in [("icon_scale", self.icon_scale), ("text_scale", self.text_scale)] {
            if !(MIN_SCALE_PERCENT..=MAX_SCALE_PERCENT).contains(&value) {
                return Err(PlatemarkError::validation(format!(
                    "{label} must be within [{MIN_SCALE_PERCENT}, {MAX_SCALE_PERCENT}], got {value}"
                )));
            }
        }
        if self.foreground.trim().is_empty() || self.background.trim().is_empty() {
            return Err(PlatemarkError::validation(
                "foreground/background colours must be non-empty",
            ));
        }
        Ok(())
    }

    /// Clamp scales into range and clear slots beyond the active counts, so
    /// that stale content from a previous layout choice never renders.
    pub fn normalize(&mut self) {
        self.icon_scale = self
            .icon_scale
            .clamp(MIN_SCALE_PERCENT, MAX_SCALE_PERCENT);
        self.text_scale = self
            .text_scale
            .clamp(MIN_SCALE_PERCENT, MAX_SCALE_PERCENT);
        for slot in self.icons.iter_mut().skip(self.left.icon_count()) {
            *slot = None;
        }
        for slot in self.texts.iter_mut().skip(self.right.text_count()) {
            slot.clear();
        }
    }

    /// Icon scale as a unit fraction.
    pub fn icon_scale_factor(&self) -> f64 {
        f64::from(self.icon_scale) / 100.0
    }

    /// Text scale as a unit fraction.
    pub fn text_scale_factor(&self) -> f64 {
        f64::from(self.text_scale) / 100.0
    }

    /// Whether any active slot carries content worth rendering or saving.
    pub fn has_content(&self) -> bool {
        let icons = self.icons[..self.left.icon_count().min(self.icons.len())]
            .iter()
            .any(Option::is_some);
        let texts = self.texts[..self.right.text_count().min(self.texts.len())]
            .iter()
            .any(|t| !t.trim().is_empty());
        icons || texts
    }
}

/// Snapshot-based editing session over a [`TagConfig`].
///
/// `begin` captures the current state; edits accumulate on the working copy
/// and mark the session dirty. `commit` keeps them, `cancel` restores the
/// snapshot. Mirrors how an interactive editor offers apply/revert.
#[derive(Clone, Debug)]
pub struct EditSession {
    working: TagConfig,
    snapshot: TagConfig,
    dirty: bool,
}

impl EditSession {
    /// Open a session over `config`, snapshotting its current state.
    pub fn begin(config: TagConfig) -> Self {
        Self {
            snapshot: config.clone(),
            working: config,
            dirty: false,
        }
    }

    /// Read-only view of the working copy.
    pub fn config(&self) -> &TagConfig {
        &self.working
    }

    /// Mutable access to the working copy; marks the session dirty.
    pub fn config_mut(&mut self) -> &mut TagConfig {
        self.dirty = true;
        &mut self.working
    }

    /// Whether any mutable access happened since `begin`.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Keep the edits, returning the normalized working copy.
    pub fn commit(mut self) -> PlatemarkResult<TagConfig> {
        self.working.normalize();
        self.working.validate()?;
        Ok(self.working)
    }

    /// Discard the edits, returning the pre-session snapshot.
    pub fn cancel(self) -> TagConfig {
        self.snapshot
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
