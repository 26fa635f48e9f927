use crate::{
    config::model::{LeftLayout, TagConfig},
    foundation::core::{MmSize, Rect},
};

/// Margin between the plate edge and the printable area, in mm.
pub const EDGE_MARGIN_MM: f64 = 0.6;
/// Gap between the icon block and the text block, in mm.
pub const ICON_TEXT_GAP_MM: f64 = 0.25;
/// Gap between sibling slots (icon/icon or line/line), in mm.
pub const SLOT_GAP_MM: f64 = 0.6;

/// What kind of content a zone holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SlotKind {
    /// An icon slot.
    Icon,
    /// A text slot.
    Text,
}

/// One rectangle of the printable-area partition, in percent of the
/// printable area (margins excluded). `index` addresses the config slot.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Zone {
    /// Which slot family this zone belongs to.
    pub slot: SlotKind,
    /// Slot index within its family.
    pub index: usize,
    /// Left edge, percent of printable width.
    pub left: f64,
    /// Top edge, percent of printable height.
    pub top: f64,
    /// Width, percent of printable width.
    pub width: f64,
    /// Height, percent of printable height.
    pub height: f64,
}

impl Zone {
    /// Map the percent rectangle into plate mm coordinates.
    pub fn rect_mm(&self, size: MmSize) -> Rect {
        let printable = printable_rect_mm(size);
        let w = printable.width();
        let h = printable.height();
        let x0 = printable.x0 + self.left / 100.0 * w;
        let y0 = printable.y0 + self.top / 100.0 * h;
        Rect::new(
            x0,
            y0,
            x0 + self.width / 100.0 * w,
            y0 + self.height / 100.0 * h,
        )
    }
}

/// The printable rectangle: the plate inset by [`EDGE_MARGIN_MM`] on all sides.
pub fn printable_rect_mm(size: MmSize) -> Rect {
    Rect::new(
        EDGE_MARGIN_MM,
        EDGE_MARGIN_MM,
        size.width - EDGE_MARGIN_MM,
        size.height - EDGE_MARGIN_MM,
    )
}

/// Edge length in mm of the square icons for this configuration.
///
/// Icons are height-bound: side-by-side and single icons span the printable
/// height, stacked icons split it (minus the slot gap), and the top band
/// uses half the printable height. The icon scale then shrinks the square.
pub fn icon_side_mm(config: &TagConfig) -> f64 {
    let avail_h = config.size.dimensions_mm().height - 2.0 * EDGE_MARGIN_MM;
    let scale = config.icon_scale_factor();
    match config.left {
        LeftLayout::DoubleStack => (avail_h - SLOT_GAP_MM) / 2.0 * scale,
        LeftLayout::TopBand if config.right.text_count() > 0 => avail_h / 2.0 * scale,
        _ => avail_h * scale,
    }
}

/// Partition the printable area into per-slot zones.
///
/// Deterministic and pure. Two geometry families:
/// - *top band* (icons above text): two equal-height bands, the icon band
///   split evenly among icon slots, the text band one full-width zone;
/// - *horizontal* (icons beside text): the icon block width derives from the
///   height-bound icon squares plus gaps, the rest belongs to the text block.
///
/// When one family is absent the other expands to the full printable area,
/// so the returned zones always tile it completely. A configuration with no
/// icon and no text slots yields no zones.
pub fn compute_zones(config: &TagConfig) -> Vec<Zone> {
    let dims = config.size.dimensions_mm();
    let avail_w = dims.width - 2.0 * EDGE_MARGIN_MM;

    let icon_count = config.left.icon_count();
    let text_count = config.right.text_count();
    let has_icons = icon_count > 0;
    let has_text = text_count > 0;

    let mut zones = Vec::with_capacity(icon_count + text_count);

    if config.left.is_top_band() && has_text {
        let band_w = 100.0 / icon_count as f64;
        for i in 0..icon_count {
            zones.push(Zone {
                slot: SlotKind::Icon,
                index: i,
                left: i as f64 * band_w,
                top: 0.0,
                width: band_w,
                height: 50.0,
            });
        }
        zones.push(Zone {
            slot: SlotKind::Text,
            index: 0,
            left: 0.0,
            top: 50.0,
            width: 100.0,
            height: 50.0,
        });
        return zones;
    }

    let mut block_pct = 0.0;
    if has_icons {
        let side = icon_side_mm(config);
        let block_mm = if matches!(config.left, LeftLayout::DoubleStack) {
            side + ICON_TEXT_GAP_MM
        } else {
            icon_count as f64 * side
                + (icon_count as f64 - 1.0) * SLOT_GAP_MM
                + ICON_TEXT_GAP_MM
        };
        // With no text the icon block owns the full printable width.
        block_pct = if has_text {
            (block_mm / avail_w * 100.0).min(100.0)
        } else {
            100.0
        };

        if matches!(config.left, LeftLayout::DoubleStack) {
            for i in 0..icon_count {
                zones.push(Zone {
                    slot: SlotKind::Icon,
                    index: i,
                    left: 0.0,
                    top: i as f64 * 50.0,
                    width: block_pct,
                    height: 50.0,
                });
            }
        } else {
            let col_w = block_pct / icon_count as f64;
            for i in 0..icon_count {
                zones.push(Zone {
                    slot: SlotKind::Icon,
                    index: i,
                    left: i as f64 * col_w,
                    top: 0.0,
                    width: col_w,
                    height: 100.0,
                });
            }
        }
    }

    if has_text {
        let start = block_pct;
        let width = 100.0 - start;
        if text_count == 1 {
            zones.push(Zone {
                slot: SlotKind::Text,
                index: 0,
                left: start,
                top: 0.0,
                width,
                height: 100.0,
            });
        } else {
            for i in 0..text_count {
                zones.push(Zone {
                    slot: SlotKind::Text,
                    index: i,
                    left: start,
                    top: i as f64 * 50.0,
                    width,
                    height: 50.0,
                });
            }
        }
    }

    zones
}

#[cfg(test)]
#[path = "../../tests/unit/layout/zones.rs"]
mod tests;
