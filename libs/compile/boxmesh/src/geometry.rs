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
use crate::{
    topology::{keys, GatefoldMode},
    uv::{UvFlags, UvMapper},
};
use anyhow::{ensure, Result};
use descriptor::{BoxType, Descriptor};
use log::debug;

/// Flap standoff from its base face, as a fraction of the half-depth.
pub const GATEFOLD_DEPTH_OFFSET: f32 = 0.05;

// Node names; viewers animate flaps by targeting these.
pub const BOX_NODE: &str = "Box";
pub const GATEFOLD_FRONT_NODE: &str = "GatefoldFront";
pub const GATEFOLD_BACK_NODE: &str = "GatefoldBack";
pub const GATEFOLD_FRONT_LEFT_NODE: &str = "GatefoldFrontLeft";
pub const GATEFOLD_FRONT_RIGHT_NODE: &str = "GatefoldFrontRight";

/// One independently-transformable piece of the output scene: interleaved
/// vertex streams plus a 16-bit triangle list.
#[derive(Debug, Clone, Default)]
pub struct MeshPart {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u16>,
}

impl MeshPart {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Default::default()
        }
    }

    fn push_quad(
        &mut self,
        verts: [[f32; 3]; 4],
        uvs: [[f32; 2]; 4],
        normal: [f32; 3],
    ) -> Result<()> {
        let base = u16::try_from(self.positions.len())?;
        for v in verts {
            self.positions.push(v);
            self.normals.push(normal);
        }
        self.uvs.extend_from_slice(&uvs);
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        Ok(())
    }

    fn push_tri(
        &mut self,
        verts: [[f32; 3]; 3],
        uvs: [[f32; 2]; 3],
        normal: [f32; 3],
    ) -> Result<()> {
        let base = u16::try_from(self.positions.len())?;
        for v in verts {
            self.positions.push(v);
            self.normals.push(normal);
        }
        self.uvs.extend_from_slice(&uvs);
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
        Ok(())
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

// Half-extents of the box in its local frame.
#[derive(Debug, Clone, Copy)]
struct Shape {
    w: f32,
    h: f32,
    d: f32,
    top_w: f32,
}

impl Shape {
    fn new(desc: &Descriptor) -> Self {
        Self {
            w: desc.width / 2.,
            h: desc.height / 2.,
            d: desc.depth / 2.,
            top_w: desc.top_width() / 2.,
        }
    }

    fn is_trapezoid(&self) -> bool {
        self.w != self.top_w
    }

    fn trap_ratio(&self) -> Option<f32> {
        if self.is_trapezoid() {
            Some(self.top_w / self.w)
        } else {
            None
        }
    }

    fn gf_depth(&self) -> f32 {
        self.d * GATEFOLD_DEPTH_OFFSET
    }
}

/// Build every mesh part for the descriptor under the selected gatefold
/// mode. The UV mapper must be backed by the layout the topology
/// arrangement produced, or slot lookups will fail.
pub fn build(desc: &Descriptor, mode: GatefoldMode, uv: &UvMapper) -> Result<Vec<MeshPart>> {
    let shape = Shape::new(desc);
    debug!(
        "building geometry for '{}': {} {:?}",
        desc.title, desc.box_type, mode
    );

    let mut parts = vec![build_box(desc, &shape, uv)?];
    match mode {
        GatefoldMode::None => {}
        GatefoldMode::SingleFront => parts.push(build_front_flap(desc, &shape, uv)?),
        GatefoldMode::SingleBack => parts.push(build_back_flap(&shape, uv)?),
        GatefoldMode::DoubleFront => {
            let reverse = if uv.contains(keys::GATEFOLD_DOUBLE_BACK) {
                keys::GATEFOLD_DOUBLE_BACK
            } else {
                keys::GATEFOLD_DOUBLE_INNER
            };
            parts.push(build_half_flap(
                GATEFOLD_FRONT_LEFT_NODE,
                -shape.w,
                0.,
                keys::GATEFOLD_FRONT_LEFT,
                reverse,
                &shape,
                uv,
            )?);
            parts.push(build_half_flap(
                GATEFOLD_FRONT_RIGHT_NODE,
                0.,
                shape.w,
                keys::GATEFOLD_FRONT_RIGHT,
                reverse,
                &shape,
                uv,
            )?);
        }
        GatefoldMode::FrontAndBack => {
            parts.push(build_front_flap(desc, &shape, uv)?);
            parts.push(build_back_flap(&shape, uv)?);
        }
    }

    for part in &parts {
        ensure!(
            !part.positions.is_empty(),
            "mesh part '{}' has no geometry",
            part.name
        );
        ensure!(
            part.positions.len() == part.normals.len() && part.positions.len() == part.uvs.len(),
            "mesh part '{}' has ragged vertex streams",
            part.name
        );
    }
    Ok(parts)
}

fn pick(verts: &[[f32; 3]; 8], idx: [usize; 4]) -> [[f32; 3]; 4] {
    idx.map(|i| verts[i])
}

fn emit_face(
    part: &mut MeshPart,
    verts: [[f32; 3]; 4],
    uvs: [[f32; 2]; 4],
    normal: [f32; 3],
    split: bool,
) -> Result<()> {
    if split {
        part.push_tri([verts[0], verts[1], verts[2]], [uvs[0], uvs[1], uvs[2]], normal)?;
        part.push_tri([verts[0], verts[2], verts[3]], [uvs[0], uvs[2], uvs[3]], normal)?;
    } else {
        part.push_quad(verts, uvs, normal)?;
    }
    Ok(())
}

fn build_box(desc: &Descriptor, shape: &Shape, uv: &UvMapper) -> Result<MeshPart> {
    let Shape { w, h, d, top_w } = *shape;
    // The eight canonical corners; 0..3 on +z, 4..7 on -z, narrow across
    // the +y edge when trapezoidal.
    let v = [
        [-w, -h, d],
        [w, -h, d],
        [top_w, h, d],
        [-top_w, h, d],
        [-w, -h, -d],
        [w, -h, -d],
        [top_w, h, -d],
        [-top_w, h, -d],
    ];
    let split = shape.is_trapezoid();
    let trap = shape.trap_ratio();
    let mut part = MeshPart::new(BOX_NODE);

    let mut front_flags = UvFlags::trapezoid(trap);
    if desc.box_type == BoxType::BigBoxWithVerticalGatefoldButHorizontal {
        // This cover is printed sideways; stand it up.
        front_flags.rotation = 90;
    }
    emit_face(
        &mut part,
        [v[0], v[1], v[2], v[3]],
        uv.quad(keys::FRONT, front_flags)?,
        [0., 0., 1.],
        split,
    )?;
    emit_face(
        &mut part,
        [v[5], v[4], v[7], v[6]],
        uv.quad(keys::BACK, UvFlags::trapezoid(trap))?,
        [0., 0., -1.],
        split,
    )?;
    emit_face(
        &mut part,
        [v[1], v[5], v[6], v[2]],
        uv.quad(keys::RIGHT, UvFlags::default())?,
        [1., 0., 0.],
        split,
    )?;
    emit_face(
        &mut part,
        [v[4], v[0], v[3], v[7]],
        uv.quad(keys::LEFT, UvFlags::default())?,
        [-1., 0., 0.],
        split,
    )?;
    emit_face(
        &mut part,
        [v[3], v[2], v[6], v[7]],
        uv.quad(keys::TOP, UvFlags::default())?,
        [0., 1., 0.],
        false,
    )?;
    emit_face(
        &mut part,
        [v[4], v[5], v[1], v[0]],
        uv.quad(keys::BOTTOM, UvFlags::default())?,
        [0., -1., 0.],
        false,
    )?;
    Ok(part)
}

fn flap_verts(x0: f32, x1: f32, tx0: f32, tx1: f32, h: f32, z_in: f32, z_out: f32) -> [[f32; 3]; 8] {
    [
        [x0, -h, z_out],
        [x1, -h, z_out],
        [tx1, h, z_out],
        [tx0, h, z_out],
        [x0, -h, z_in],
        [x1, -h, z_in],
        [tx1, h, z_in],
        [tx0, h, z_in],
    ]
}

// All six faces of a flap panel. `sign` is +1 for a flap hung on the front
// face, -1 for one hung on the back; edge faces reuse the box's own edge
// textures.
#[allow(clippy::too_many_arguments)]
fn emit_flap(
    part: &mut MeshPart,
    verts: &[[f32; 3]; 8],
    sign: f32,
    outer_key: &str,
    outer_flags: UvFlags,
    reverse_key: &str,
    reverse_flags: UvFlags,
    split: bool,
    uv: &UvMapper,
) -> Result<()> {
    emit_face(
        part,
        pick(verts, [0, 1, 2, 3]),
        uv.quad(outer_key, outer_flags)?,
        [0., 0., sign],
        split,
    )?;
    emit_face(
        part,
        pick(verts, [5, 4, 7, 6]),
        uv.quad(reverse_key, reverse_flags)?,
        [0., 0., -sign],
        split,
    )?;
    emit_face(
        part,
        pick(verts, [3, 2, 6, 7]),
        uv.quad(keys::TOP, UvFlags::default())?,
        [0., 1., 0.],
        split,
    )?;
    // The bottom strip's triangle split permutes its window corners so the
    // art reads outward.
    let uv_bottom = uv.quad(keys::BOTTOM, UvFlags::default())?;
    let bottom = pick(verts, [1, 5, 4, 0]);
    if split {
        part.push_tri(
            [bottom[0], bottom[1], bottom[2]],
            [uv_bottom[2], uv_bottom[3], uv_bottom[0]],
            [0., -1., 0.],
        )?;
        part.push_tri(
            [bottom[0], bottom[2], bottom[3]],
            [uv_bottom[2], uv_bottom[0], uv_bottom[1]],
            [0., -1., 0.],
        )?;
    } else {
        part.push_quad(bottom, uv_bottom, [0., -1., 0.])?;
    }
    emit_face(
        part,
        pick(verts, [1, 5, 6, 2]),
        uv.quad(keys::RIGHT, UvFlags::default())?,
        [sign, 0., 0.],
        split,
    )?;
    emit_face(
        part,
        pick(verts, [4, 0, 3, 7]),
        uv.quad(keys::LEFT, UvFlags::default())?,
        [-sign, 0., 0.],
        split,
    )?;
    Ok(())
}

// How the full-width front flap's reverse side samples its art. Vertical
// boxes fold sideways and trapezoids mirror their fold, so the reverse art
// needs per-type adjustment to read correctly when opened.
fn front_flap_reverse_flags(desc: &Descriptor, shape: &Shape) -> UvFlags {
    let trap = shape.trap_ratio();
    match desc.box_type {
        BoxType::EidosTrapezoid | BoxType::SmallBoxWithVerticalGatefold => UvFlags {
            flip_h: true,
            flip_v: Some(false),
            trap_ratio: trap,
            ..Default::default()
        },
        BoxType::BigBoxWithVerticalGatefoldButHorizontal => UvFlags {
            rotation: -90,
            trap_ratio: trap,
            ..Default::default()
        },
        _ => UvFlags {
            flip_h: shape.is_trapezoid(),
            trap_ratio: trap,
            ..Default::default()
        },
    }
}

fn build_front_flap(desc: &Descriptor, shape: &Shape, uv: &UvMapper) -> Result<MeshPart> {
    let mut part = MeshPart::new(GATEFOLD_FRONT_NODE);
    let verts = flap_verts(
        -shape.w,
        shape.w,
        -shape.top_w,
        shape.top_w,
        shape.h,
        shape.d,
        shape.d + shape.gf_depth(),
    );
    emit_flap(
        &mut part,
        &verts,
        1.,
        keys::GATEFOLD_FRONT_INNER,
        UvFlags::trapezoid(shape.trap_ratio()),
        keys::GATEFOLD_FRONT_BACK,
        front_flap_reverse_flags(desc, shape),
        shape.is_trapezoid(),
        uv,
    )?;
    Ok(part)
}

fn build_back_flap(shape: &Shape, uv: &UvMapper) -> Result<MeshPart> {
    let mut part = MeshPart::new(GATEFOLD_BACK_NODE);
    // The back flap is the front flap rotated half a turn about +y, which
    // keeps every winding outward-facing.
    let front = flap_verts(
        -shape.w,
        shape.w,
        -shape.top_w,
        shape.top_w,
        shape.h,
        shape.d,
        shape.d + shape.gf_depth(),
    );
    let verts = front.map(|[x, y, z]| [-x, y, -z]);
    emit_flap(
        &mut part,
        &verts,
        -1.,
        keys::GATEFOLD_BACK_INNER,
        UvFlags::trapezoid(shape.trap_ratio()),
        keys::GATEFOLD_BACK_FRONT,
        UvFlags::trapezoid(shape.trap_ratio()),
        shape.is_trapezoid(),
        uv,
    )?;
    Ok(part)
}

fn build_half_flap(
    name: &str,
    x0: f32,
    x1: f32,
    outer_key: &str,
    reverse_key: &str,
    shape: &Shape,
    uv: &UvMapper,
) -> Result<MeshPart> {
    let mut part = MeshPart::new(name);
    let verts = flap_verts(x0, x1, x0, x1, shape.h, shape.d, shape.d + shape.gf_depth());
    emit_flap(
        &mut part,
        &verts,
        1.,
        outer_key,
        UvFlags::default(),
        reverse_key,
        UvFlags::default(),
        false,
        uv,
    )?;
    Ok(part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{arrange, select, GatefoldMode};
    use atlas::AtlasLayout;
    use descriptor::TextureSlot;
    use image::{Rgba, RgbaImage};
    use std::collections::{BTreeMap, BTreeSet};

    fn desc(box_type: BoxType) -> Descriptor {
        Descriptor {
            title: "Sacrifice".to_owned(),
            width: 8.,
            height: 9.5,
            depth: 2.5,
            box_type,
        }
    }

    // Run the real selection + arrangement + packing over dummy surfaces so
    // geometry sees exactly the layout a compile would.
    fn layout_for(box_type: BoxType, slots: &[TextureSlot]) -> (GatefoldMode, AtlasLayout) {
        let present: BTreeSet<TextureSlot> = slots.iter().copied().collect();
        let mode = select(box_type, &present);
        let surfaces: BTreeMap<TextureSlot, RgbaImage> = slots
            .iter()
            .enumerate()
            .map(|(i, s)| (*s, RgbaImage::from_pixel(8, 8, Rgba([i as u8, 0, 0, 255]))))
            .collect();
        let entries = arrange(mode, surfaces);
        let (layout, _) = atlas::pack(&entries).expect("pack");
        (mode, layout)
    }

    fn all_slots() -> Vec<TextureSlot> {
        TextureSlot::BASE_FACES.to_vec()
    }

    fn check_invariants(parts: &[MeshPart]) {
        for part in parts {
            assert_eq!(part.positions.len(), part.normals.len());
            assert_eq!(part.positions.len(), part.uvs.len());
            assert_eq!(part.indices.len() % 3, 0);
            let max = *part.indices.iter().max().unwrap() as usize;
            assert!(max < part.positions.len());
            for n in &part.normals {
                let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
                assert!((len - 1.).abs() < 1e-6);
            }
            for uv in &part.uvs {
                assert!((0. ..=1.).contains(&uv[0]) && (0. ..=1.).contains(&uv[1]));
            }
        }
    }

    #[test]
    fn a_plain_big_box_is_one_node_of_twelve_triangles() -> Result<()> {
        let (mode, layout) = layout_for(BoxType::BigBox, &all_slots());
        assert_eq!(mode, GatefoldMode::None);
        let parts = build(&desc(BoxType::BigBox), mode, &UvMapper::new(&layout))?;
        assert_eq!(parts.len(), 1);
        let part = &parts[0];
        assert_eq!(part.name, BOX_NODE);
        assert_eq!(part.positions.len(), 24);
        assert_eq!(part.indices.len(), 36);
        assert_eq!(part.triangle_count(), 12);
        check_invariants(&parts);
        // Half-extents land on the corners.
        let max_x = part.positions.iter().map(|p| p[0]).fold(f32::MIN, f32::max);
        let max_y = part.positions.iter().map(|p| p[1]).fold(f32::MIN, f32::max);
        let max_z = part.positions.iter().map(|p| p[2]).fold(f32::MIN, f32::max);
        assert_eq!((max_x, max_y, max_z), (4., 4.75, 1.25));
        Ok(())
    }

    #[test]
    fn a_trapezoid_splits_its_warped_faces() -> Result<()> {
        let d = Descriptor {
            title: "Omikron".to_owned(),
            width: 6.,
            height: 7.,
            depth: 1.,
            box_type: BoxType::EidosTrapezoid,
        };
        let (mode, layout) = layout_for(BoxType::EidosTrapezoid, &all_slots());
        assert_eq!(mode, GatefoldMode::None);
        let parts = build(&d, mode, &UvMapper::new(&layout))?;
        let part = &parts[0];
        // Four split faces of six records plus two quads of four.
        assert_eq!(part.positions.len(), 4 * 6 + 2 * 4);
        assert_eq!(part.indices.len(), 36);
        check_invariants(&parts);

        // The front face comes first; its top corner follows the narrowed
        // top width.
        assert_eq!(part.positions[2], [5.75 / 2., 3.5, 0.5]);

        // And its UVs reproduce the warp: quad corners were emitted as
        // [q0,q1,q2] + [q0,q2,q3].
        let bottom_span = part.uvs[1][0] - part.uvs[0][0];
        let top_span = part.uvs[4][0] - part.uvs[5][0];
        assert!(bottom_span > 0. && top_span > 0.);
        assert!((top_span / bottom_span - 5.75 / 6.).abs() < 1e-4);
        Ok(())
    }

    #[test]
    fn a_back_gatefold_hangs_its_flap_behind_the_box() -> Result<()> {
        let mut slots = all_slots();
        slots.push(TextureSlot::GatefoldLeft);
        slots.push(TextureSlot::GatefoldRight);
        let (mode, layout) = layout_for(BoxType::BigBoxWithBackGatefold, &slots);
        assert_eq!(mode, GatefoldMode::SingleBack);
        let parts = build(
            &desc(BoxType::BigBoxWithBackGatefold),
            mode,
            &UvMapper::new(&layout),
        )?;
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].name, BOX_NODE);
        assert_eq!(parts[1].name, GATEFOLD_BACK_NODE);
        check_invariants(&parts);

        // depth 2.5 -> d 1.25, standoff 0.0625.
        let flap = &parts[1];
        let min_z = flap.positions.iter().map(|p| p[2]).fold(f32::MAX, f32::min);
        let max_z = flap.positions.iter().map(|p| p[2]).fold(f32::MIN, f32::max);
        assert!((min_z - -1.3125).abs() < 1e-6);
        assert!((max_z - -1.25).abs() < 1e-6);

        // The outward face of a back flap points away from the box.
        assert_eq!(flap.normals[0], [0., 0., -1.]);
        Ok(())
    }

    #[test]
    fn double_gatefolds_hinge_two_half_flaps() -> Result<()> {
        let mut slots = all_slots();
        slots.push(TextureSlot::GatefoldFrontLeft);
        slots.push(TextureSlot::GatefoldFrontRight);
        let (mode, layout) = layout_for(BoxType::BigBoxWithDoubleGatefold, &slots);
        assert_eq!(mode, GatefoldMode::DoubleFront);
        let parts = build(
            &desc(BoxType::BigBoxWithDoubleGatefold),
            mode,
            &UvMapper::new(&layout),
        )?;
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].name, GATEFOLD_FRONT_LEFT_NODE);
        assert_eq!(parts[2].name, GATEFOLD_FRONT_RIGHT_NODE);
        check_invariants(&parts);

        let xs = |part: &MeshPart| {
            let min = part.positions.iter().map(|p| p[0]).fold(f32::MAX, f32::min);
            let max = part.positions.iter().map(|p| p[0]).fold(f32::MIN, f32::max);
            (min, max)
        };
        assert_eq!(xs(&parts[1]), (-4., 0.));
        assert_eq!(xs(&parts[2]), (0., 4.));

        for flap in &parts[1..] {
            let max_z = flap.positions.iter().map(|p| p[2]).fold(f32::MIN, f32::max);
            assert!((max_z - 1.3125).abs() < 1e-6);
        }
        Ok(())
    }

    #[test]
    fn front_and_back_gatefolds_emit_three_nodes() -> Result<()> {
        let mut slots = all_slots();
        slots.push(TextureSlot::GatefoldFrontLeft);
        slots.push(TextureSlot::GatefoldFrontRight);
        slots.push(TextureSlot::GatefoldBack);
        let (mode, layout) = layout_for(BoxType::BigBoxWithFrontAndBackGatefold, &slots);
        assert_eq!(mode, GatefoldMode::FrontAndBack);
        let parts = build(
            &desc(BoxType::BigBoxWithFrontAndBackGatefold),
            mode,
            &UvMapper::new(&layout),
        )?;
        let names: Vec<_> = parts.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, [BOX_NODE, GATEFOLD_FRONT_NODE, GATEFOLD_BACK_NODE]);
        check_invariants(&parts);

        // Front flap outer face sits forward of the box, back flap behind.
        let front_max_z = parts[1].positions.iter().map(|p| p[2]).fold(f32::MIN, f32::max);
        let back_min_z = parts[2].positions.iter().map(|p| p[2]).fold(f32::MAX, f32::min);
        assert!((front_max_z - 1.3125).abs() < 1e-6);
        assert!((back_min_z - -1.3125).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn the_sideways_cover_stands_its_front_art_up() -> Result<()> {
        let (_, layout) = layout_for(BoxType::BigBox, &all_slots());
        let uv = UvMapper::new(&layout);
        let plain = build(&desc(BoxType::BigBox), GatefoldMode::None, &uv)?;
        let rotated = build(
            &desc(BoxType::BigBoxWithVerticalGatefoldButHorizontal),
            GatefoldMode::None,
            &uv,
        )?;
        // The front face is the first quad; rotation advances each corner.
        for i in 0..4 {
            assert_eq!(rotated[0].uvs[i], plain[0].uvs[(i + 1) % 4]);
        }
        // Other faces are untouched.
        assert_eq!(rotated[0].uvs[4..], plain[0].uvs[4..]);
        Ok(())
    }

    #[test]
    fn a_single_front_flap_shows_the_cover_and_reverses_the_left_scan() -> Result<()> {
        let mut slots = all_slots();
        slots.push(TextureSlot::GatefoldLeft);
        slots.push(TextureSlot::GatefoldRight);
        let (mode, layout) = layout_for(BoxType::BigBoxWithGatefold, &slots);
        assert_eq!(mode, GatefoldMode::SingleFront);
        let parts = build(
            &desc(BoxType::BigBoxWithGatefold),
            mode,
            &UvMapper::new(&layout),
        )?;
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1].name, GATEFOLD_FRONT_NODE);
        check_invariants(&parts);

        let flap = &parts[1];
        // Outer face first (normal +z), reverse second (normal -z).
        assert_eq!(flap.normals[0], [0., 0., 1.]);
        assert_eq!(flap.normals[4], [0., 0., -1.]);

        // Outer face samples the stowed cover art.
        let inner = layout.region(keys::GATEFOLD_FRONT_INNER).unwrap();
        let expect_u0 = (inner.x as f32 + 0.5) / layout.width as f32;
        assert!((flap.uvs[0][0] - expect_u0).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn parts_never_exceed_sixteen_bit_indexing() -> Result<()> {
        let (mode, layout) = layout_for(BoxType::BigBox, &all_slots());
        let parts = build(&desc(BoxType::BigBox), mode, &UvMapper::new(&layout))?;
        for part in &parts {
            assert!(part.positions.len() <= u16::MAX as usize);
        }
        Ok(())
    }
}
