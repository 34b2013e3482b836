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
use anyhow::{anyhow, bail, Result};
use atlas::AtlasLayout;

/// Half-pixel pull-in on every window edge so mip sampling never bleeds a
/// neighboring slot into a face.
pub const INSET: f32 = 0.5;

/// Adjustments applied to a slot's UV window before it lands on a face.
/// Rotation wins outright: a rotated window skips the trapezoid warp, as
/// no rotated face is ever trapezoidal.
#[derive(Debug, Clone, Copy, Default)]
pub struct UvFlags {
    /// top-width / bottom-width; set only for the warped faces of a
    /// trapezoidal box.
    pub trap_ratio: Option<f32>,
    /// Swap which edge of the warp is the narrow one.
    pub invert_trap: bool,
    pub flip_h: bool,
    /// Vertical order override. The unset default samples flipped, which is
    /// what every face wants for scans stored top-down.
    pub flip_v: Option<bool>,
    /// Quarter-turn rotation in degrees: -90, 0, 90, 180 or 270.
    pub rotation: i32,
}

impl UvFlags {
    pub fn trapezoid(ratio: Option<f32>) -> Self {
        Self {
            trap_ratio: ratio,
            ..Default::default()
        }
    }
}

/// Computes the four UV corners for an atlas slot. Corner order matches the
/// quad emission order: two bottom corners first, then the two top corners.
pub struct UvMapper<'a> {
    layout: &'a AtlasLayout,
}

impl<'a> UvMapper<'a> {
    pub fn new(layout: &'a AtlasLayout) -> Self {
        Self { layout }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.layout.region(key).is_some()
    }

    pub fn quad(&self, key: &str, flags: UvFlags) -> Result<[[f32; 2]; 4]> {
        let region = self
            .layout
            .region(key)
            .ok_or_else(|| anyhow!("texture '{}' missing from atlas", key))?;
        let atlas_w = self.layout.width as f32;
        let atlas_h = self.layout.height as f32;

        let u0_orig = (region.x as f32 + INSET) / atlas_w;
        let u1_orig = ((region.x + region.width) as f32 - INSET) / atlas_w;
        let v0_orig = (region.y as f32 + INSET) / atlas_h;
        let v1_orig = ((region.y + region.height) as f32 - INSET) / atlas_h;

        let (v0, v1) = match flags.flip_v {
            Some(true) => (v1_orig, v0_orig),
            Some(false) => (v0_orig, v1_orig),
            None => (v1_orig, v0_orig),
        };
        let (u0, u1) = if flags.flip_h {
            (u1_orig, u0_orig)
        } else {
            (u0_orig, u1_orig)
        };

        if flags.rotation != 0 {
            let c = [[u0, v0], [u1, v0], [u1, v1], [u0, v1]];
            return Ok(match flags.rotation {
                90 => [c[1], c[2], c[3], c[0]],
                180 => [c[2], c[3], c[0], c[1]],
                -90 | 270 => [c[3], c[0], c[1], c[2]],
                r => bail!("unsupported uv rotation {}", r),
            });
        }

        if let Some(ratio) = flags.trap_ratio {
            let u_center = (u0_orig + u1_orig) / 2.;
            let half_bottom = (u1_orig - u0_orig).abs() / 2.;
            let half_top = half_bottom * ratio;
            // Corners 0,1 sit on the face's bottom edge, 2,3 on the top.
            let (lo, hi) = if flags.invert_trap {
                (half_top, half_bottom)
            } else {
                (half_bottom, half_top)
            };
            let quad = if flags.flip_h {
                [
                    [u_center + lo, v0],
                    [u_center - lo, v0],
                    [u_center - hi, v1],
                    [u_center + hi, v1],
                ]
            } else {
                [
                    [u_center - lo, v0],
                    [u_center + lo, v0],
                    [u_center + hi, v1],
                    [u_center - hi, v1],
                ]
            };
            return Ok(quad);
        }

        Ok([[u0, v0], [u1, v0], [u1, v1], [u0, v1]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::collections::BTreeMap;

    const EPS: f32 = 1e-6;

    fn layout() -> AtlasLayout {
        // Two 10x10 squares side by side; padded atlas is 20x12.
        let mut entries = BTreeMap::new();
        entries.insert(
            "front".to_owned(),
            RgbaImage::from_pixel(10, 10, Rgba([1, 1, 1, 255])),
        );
        entries.insert(
            "back".to_owned(),
            RgbaImage::from_pixel(10, 10, Rgba([2, 2, 2, 255])),
        );
        let (layout, _) = atlas::pack(&entries).expect("pack");
        assert_eq!((layout.width, layout.height), (20, 12));
        layout
    }

    fn close(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < EPS && (a[1] - b[1]).abs() < EPS
    }

    #[test]
    fn the_default_window_is_inset_and_vertically_flipped() -> Result<()> {
        let layout = layout();
        let uv = UvMapper::new(&layout);
        let quad = uv.quad("front", UvFlags::default())?;
        let (u0, u1) = (0.5 / 20., 9.5 / 20.);
        let (v0, v1) = (0.5 / 12., 9.5 / 12.);
        assert!(close(quad[0], [u0, v1]));
        assert!(close(quad[1], [u1, v1]));
        assert!(close(quad[2], [u1, v0]));
        assert!(close(quad[3], [u0, v0]));
        Ok(())
    }

    #[test]
    fn every_corner_stays_inside_the_slot_by_at_least_a_wide_margin() -> Result<()> {
        let layout = layout();
        let uv = UvMapper::new(&layout);
        let region = *layout.region("back").unwrap();
        let flag_sets = [
            UvFlags::default(),
            UvFlags {
                flip_h: true,
                ..Default::default()
            },
            UvFlags {
                rotation: 90,
                ..Default::default()
            },
            UvFlags {
                rotation: -90,
                ..Default::default()
            },
            UvFlags {
                rotation: 180,
                ..Default::default()
            },
            UvFlags {
                trap_ratio: Some(0.7),
                ..Default::default()
            },
        ];
        // At least 0.4px inside the window on each side.
        let min_u = (region.x as f32 + 0.4) / layout.width as f32;
        let max_u = ((region.x + region.width) as f32 - 0.4) / layout.width as f32;
        let min_v = (region.y as f32 + 0.4) / layout.height as f32;
        let max_v = ((region.y + region.height) as f32 - 0.4) / layout.height as f32;
        for flags in flag_sets {
            for corner in uv.quad("back", flags)? {
                assert!(corner[0] > min_u && corner[0] < max_u, "{:?}", flags);
                assert!(corner[1] > min_v && corner[1] < max_v, "{:?}", flags);
                assert!((0. ..=1.).contains(&corner[0]));
                assert!((0. ..=1.).contains(&corner[1]));
            }
        }
        Ok(())
    }

    #[test]
    fn rotations_permute_the_corners_cyclically() -> Result<()> {
        let layout = layout();
        let uv = UvMapper::new(&layout);
        let base = uv.quad("front", UvFlags::default())?;
        let rot90 = uv.quad(
            "front",
            UvFlags {
                rotation: 90,
                ..Default::default()
            },
        )?;
        let rot180 = uv.quad(
            "front",
            UvFlags {
                rotation: 180,
                ..Default::default()
            },
        )?;
        let rot270 = uv.quad(
            "front",
            UvFlags {
                rotation: 270,
                ..Default::default()
            },
        )?;
        let rot_neg90 = uv.quad(
            "front",
            UvFlags {
                rotation: -90,
                ..Default::default()
            },
        )?;
        for i in 0..4 {
            assert!(close(rot90[i], base[(i + 1) % 4]));
            assert!(close(rot180[i], base[(i + 2) % 4]));
            assert!(close(rot270[i], base[(i + 3) % 4]));
            assert!(close(rot_neg90[i], rot270[i]));
        }
        Ok(())
    }

    #[test]
    fn flip_h_swaps_the_u_edges() -> Result<()> {
        let layout = layout();
        let uv = UvMapper::new(&layout);
        let base = uv.quad("front", UvFlags::default())?;
        let flipped = uv.quad(
            "front",
            UvFlags {
                flip_h: true,
                ..Default::default()
            },
        )?;
        assert!(close(flipped[0], base[1]));
        assert!(close(flipped[1], base[0]));
        assert!(close(flipped[2], base[3]));
        assert!(close(flipped[3], base[2]));
        Ok(())
    }

    #[test]
    fn flip_v_override_selects_the_unflipped_order() -> Result<()> {
        let layout = layout();
        let uv = UvMapper::new(&layout);
        let explicit = uv.quad(
            "front",
            UvFlags {
                flip_v: Some(false),
                ..Default::default()
            },
        )?;
        let (v0, v1) = (0.5 / 12., 9.5 / 12.);
        assert!((explicit[0][1] - v0).abs() < EPS);
        assert!((explicit[2][1] - v1).abs() < EPS);
        Ok(())
    }

    #[test]
    fn the_trapezoid_warp_narrows_the_top_edge() -> Result<()> {
        let layout = layout();
        let uv = UvMapper::new(&layout);
        let ratio = 5.75 / 6.;
        let quad = uv.quad("front", UvFlags::trapezoid(Some(ratio)))?;
        let (u0, u1) = (0.5 / 20., 9.5 / 20.);
        let center = (u0 + u1) / 2.;
        let half_bottom = (u1 - u0) / 2.;
        let half_top = half_bottom * ratio;
        assert!(close(quad[0], [center - half_bottom, 9.5 / 12.]));
        assert!(close(quad[1], [center + half_bottom, 9.5 / 12.]));
        assert!(close(quad[2], [center + half_top, 0.5 / 12.]));
        assert!(close(quad[3], [center - half_top, 0.5 / 12.]));
        Ok(())
    }

    #[test]
    fn inverting_the_warp_swaps_the_narrow_edge() -> Result<()> {
        let layout = layout();
        let uv = UvMapper::new(&layout);
        let quad = uv.quad(
            "front",
            UvFlags {
                trap_ratio: Some(0.5),
                invert_trap: true,
                ..Default::default()
            },
        )?;
        let bottom_span = quad[1][0] - quad[0][0];
        let top_span = quad[2][0] - quad[3][0];
        assert!(bottom_span < top_span);
        assert!((bottom_span / top_span - 0.5).abs() < EPS);
        Ok(())
    }

    #[test]
    fn warping_a_flipped_window_mirrors_both_edges() -> Result<()> {
        let layout = layout();
        let uv = UvMapper::new(&layout);
        let plain = uv.quad("front", UvFlags::trapezoid(Some(0.5)))?;
        let flipped = uv.quad(
            "front",
            UvFlags {
                trap_ratio: Some(0.5),
                flip_h: true,
                ..Default::default()
            },
        )?;
        assert!(close(flipped[0], plain[1]));
        assert!(close(flipped[1], plain[0]));
        assert!(close(flipped[2], plain[3]));
        assert!(close(flipped[3], plain[2]));
        Ok(())
    }

    #[test]
    fn rotation_takes_precedence_over_the_warp() -> Result<()> {
        let layout = layout();
        let uv = UvMapper::new(&layout);
        let rotated = uv.quad(
            "front",
            UvFlags {
                rotation: 90,
                trap_ratio: Some(0.5),
                ..Default::default()
            },
        )?;
        let plain_rotated = uv.quad(
            "front",
            UvFlags {
                rotation: 90,
                ..Default::default()
            },
        )?;
        for i in 0..4 {
            assert!(close(rotated[i], plain_rotated[i]));
        }
        Ok(())
    }

    #[test]
    fn unknown_keys_are_an_error() {
        let layout = layout();
        let uv = UvMapper::new(&layout);
        assert!(uv.quad("missing", UvFlags::default()).is_err());
        assert!(!uv.contains("missing"));
        assert!(uv.contains("front"));
    }
}
