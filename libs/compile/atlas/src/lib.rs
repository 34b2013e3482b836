// This file is part of BigBoxDB.
//
// BigBoxDB is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// BigBoxDB is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with BigBoxDB.  If not, see <http://www.gnu.org/licenses/>.

// Row-based shelf packing of named surfaces into one texture atlas. The
// walk is fully determined by the input set: entries are sorted by
// decreasing height with a lexicographic tiebreak, and the shelf width cap
// is twice the tallest entry's width. Output dimensions are rounded up to
// multiples of 4 for the ETC1S encoder.

use anyhow::{ensure, Result};
use image::{GenericImage, RgbaImage};
use log::debug;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasLayout {
    regions: BTreeMap<String, Region>,
    /// Padded dimensions, always multiples of 4.
    pub width: u32,
    pub height: u32,
    /// Tight bounds before padding.
    pub content_width: u32,
    pub content_height: u32,
}

impl AtlasLayout {
    pub fn region(&self, key: &str) -> Option<&Region> {
        self.regions.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Region)> {
        self.regions.iter().map(|(k, r)| (k.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

fn round_up4(v: u32) -> u32 {
    (v + 3) / 4 * 4
}

/// Pack every entry into a single transparent surface; returns the layout
/// and the composed atlas.
pub fn pack(entries: &BTreeMap<String, RgbaImage>) -> Result<(AtlasLayout, RgbaImage)> {
    ensure!(!entries.is_empty(), "cannot pack an empty atlas");

    let mut order: Vec<(&String, &RgbaImage)> = entries.iter().collect();
    order.sort_by(|(a_name, a), (b_name, b)| {
        b.height().cmp(&a.height()).then_with(|| a_name.cmp(b_name))
    });

    let max_width = order[0].1.width() * 2;
    debug!("packing {} textures, shelf cap {}px", order.len(), max_width);

    let mut regions = BTreeMap::new();
    let mut cursor_x = 0u32;
    let mut cursor_y = 0u32;
    let mut shelf_height = 0u32;
    let mut content_width = 0u32;
    for (name, img) in &order {
        let (w, h) = img.dimensions();
        ensure!(w > 0 && h > 0, "surface '{}' is empty", name);
        if cursor_x + w > max_width {
            cursor_y += shelf_height;
            cursor_x = 0;
            shelf_height = 0;
        }
        debug!("  '{}': pos=({},{}) size=({},{})", name, cursor_x, cursor_y, w, h);
        regions.insert(
            (*name).clone(),
            Region {
                x: cursor_x,
                y: cursor_y,
                width: w,
                height: h,
            },
        );
        cursor_x += w;
        shelf_height = shelf_height.max(h);
        content_width = content_width.max(cursor_x);
    }
    let content_height = cursor_y + shelf_height;

    let layout = AtlasLayout {
        width: round_up4(content_width),
        height: round_up4(content_height),
        content_width,
        content_height,
        regions,
    };
    debug!(
        "atlas dimensions: {}x{} (content: {}x{})",
        layout.width, layout.height, layout.content_width, layout.content_height
    );

    // RgbaImage::new zero-fills, which is fully transparent.
    let mut surface = RgbaImage::new(layout.width, layout.height);
    for (name, region) in &layout.regions {
        surface.copy_from(&entries[name], region.x, region.y)?;
    }

    Ok((layout, surface))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(w: u32, h: u32, v: u8) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([v, v, v, 255]))
    }

    fn entries(list: &[(&str, u32, u32, u8)]) -> BTreeMap<String, RgbaImage> {
        list.iter()
            .map(|(name, w, h, v)| (name.to_string(), solid(*w, *h, *v)))
            .collect()
    }

    fn overlaps(a: &Region, b: &Region) -> bool {
        a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
    }

    #[test]
    fn dimensions_are_multiples_of_four() -> Result<()> {
        let (layout, surface) = pack(&entries(&[("front", 10, 13, 1), ("back", 7, 5, 2)]))?;
        assert_eq!(layout.width % 4, 0);
        assert_eq!(layout.height % 4, 0);
        assert_eq!(surface.dimensions(), (layout.width, layout.height));
        assert!(layout.width >= layout.content_width);
        assert!(layout.height >= layout.content_height);
        Ok(())
    }

    #[test]
    fn regions_never_overlap() -> Result<()> {
        let (layout, _) = pack(&entries(&[
            ("front", 64, 76, 1),
            ("back", 64, 76, 2),
            ("left", 20, 76, 3),
            ("right", 20, 76, 4),
            ("top", 64, 20, 5),
            ("bottom", 64, 20, 6),
        ]))?;
        let all: Vec<_> = layout.iter().collect();
        for (i, (_, a)) in all.iter().enumerate() {
            for (_, b) in &all[i + 1..] {
                assert!(!overlaps(a, b));
            }
        }
        Ok(())
    }

    #[test]
    fn packing_is_deterministic() -> Result<()> {
        let set = entries(&[
            ("front", 64, 76, 1),
            ("back", 64, 76, 2),
            ("top", 64, 20, 3),
            ("bottom", 64, 20, 4),
        ]);
        let (a, img_a) = pack(&set)?;
        let (b, img_b) = pack(&set)?;
        assert_eq!(a, b);
        assert_eq!(img_a.as_raw(), img_b.as_raw());
        Ok(())
    }

    #[test]
    fn equal_heights_break_ties_by_name() -> Result<()> {
        let (layout, _) = pack(&entries(&[("zeta", 10, 10, 1), ("alpha", 10, 10, 2)]))?;
        let alpha = layout.region("alpha").unwrap();
        let zeta = layout.region("zeta").unwrap();
        assert_eq!((alpha.x, alpha.y), (0, 0));
        assert_eq!((zeta.x, zeta.y), (10, 0));
        Ok(())
    }

    #[test]
    fn overflow_starts_a_new_shelf_below_the_tallest() -> Result<()> {
        // Cap is 2 * 10 = 20; the third entry wraps under the 12-tall shelf.
        let (layout, _) = pack(&entries(&[
            ("a", 10, 12, 1),
            ("b", 10, 8, 2),
            ("c", 10, 6, 3),
        ]))?;
        assert_eq!(layout.region("a").unwrap().x, 0);
        assert_eq!(layout.region("b").unwrap().x, 10);
        let c = layout.region("c").unwrap();
        assert_eq!((c.x, c.y), (0, 12));
        assert_eq!(layout.content_height, 18);
        assert_eq!(layout.height, 20);
        Ok(())
    }

    #[test]
    fn the_composite_carries_every_entry_and_transparent_padding() -> Result<()> {
        let (layout, surface) = pack(&entries(&[("a", 6, 6, 10), ("b", 5, 5, 20)]))?;
        let a = layout.region("a").unwrap();
        let b = layout.region("b").unwrap();
        assert_eq!(surface.get_pixel(a.x, a.y).0, [10, 10, 10, 255]);
        assert_eq!(
            surface.get_pixel(b.x + b.width - 1, b.y + b.height - 1).0,
            [20, 20, 20, 255]
        );
        // The padding row at the bottom stays transparent.
        assert_eq!(
            surface.get_pixel(0, layout.height - 1).0[3],
            0,
            "padding must be transparent"
        );
        Ok(())
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(pack(&BTreeMap::new()).is_err());
    }
}
