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
use descriptor::{BoxType, TextureSlot};
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// How the compiled box folds open, after reconciling what the box type
/// wants with the flap art actually scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatefoldMode {
    None,
    /// One full-width flap hinged over the front.
    SingleFront,
    /// One full-width flap hinged over the back.
    SingleBack,
    /// Two half-width flaps meeting at the front center line.
    DoubleFront,
    /// Full-width flaps over both front and back.
    FrontAndBack,
}

/// Atlas key names. Base faces use their slot names; the rest are synthetic
/// keys produced by the arrangement below.
pub mod keys {
    pub const FRONT: &str = "front";
    pub const BACK: &str = "back";
    pub const TOP: &str = "top";
    pub const BOTTOM: &str = "bottom";
    pub const LEFT: &str = "left";
    pub const RIGHT: &str = "right";
    /// The original cover art, revealed when the front flap opens.
    pub const GATEFOLD_FRONT_INNER: &str = "gatefold_front_inner";
    /// The reverse side of the front flap.
    pub const GATEFOLD_FRONT_BACK: &str = "gatefold_front_back";
    pub const GATEFOLD_BACK_INNER: &str = "gatefold_back_inner";
    pub const GATEFOLD_BACK_FRONT: &str = "gatefold_back_front";
    pub const GATEFOLD_FRONT_LEFT: &str = "gatefold_front_left";
    pub const GATEFOLD_FRONT_RIGHT: &str = "gatefold_front_right";
    pub const GATEFOLD_DOUBLE_INNER: &str = "gatefold_double_inner";
    pub const GATEFOLD_DOUBLE_BACK: &str = "gatefold_double_back";
}

fn candidate_mode(box_type: BoxType) -> GatefoldMode {
    match box_type {
        BoxType::BigBoxWithBackGatefold => GatefoldMode::SingleBack,
        BoxType::BigBoxWithDoubleGatefold => GatefoldMode::DoubleFront,
        BoxType::BigBoxWithFrontAndBackGatefold => GatefoldMode::FrontAndBack,
        t if t.is_gatefold() => GatefoldMode::SingleFront,
        _ => GatefoldMode::None,
    }
}

/// Decide the gatefold mode from the box type and the scans present. A mode
/// without its flap art downgrades to `None`.
pub fn select(box_type: BoxType, present: &BTreeSet<TextureSlot>) -> GatefoldMode {
    let legacy_pair = present.contains(&TextureSlot::GatefoldLeft)
        && present.contains(&TextureSlot::GatefoldRight);
    let front_pair = present.contains(&TextureSlot::GatefoldFrontLeft)
        && present.contains(&TextureSlot::GatefoldFrontRight);
    let back_pair = present.contains(&TextureSlot::GatefoldBackLeft)
        && present.contains(&TextureSlot::GatefoldBackRight);
    let back_single = present.contains(&TextureSlot::GatefoldBack);

    let candidate = candidate_mode(box_type);
    match candidate {
        GatefoldMode::None => GatefoldMode::None,
        GatefoldMode::SingleFront if legacy_pair || front_pair => GatefoldMode::SingleFront,
        GatefoldMode::SingleBack if legacy_pair || back_pair || back_single => {
            GatefoldMode::SingleBack
        }
        GatefoldMode::DoubleFront if front_pair => GatefoldMode::DoubleFront,
        GatefoldMode::FrontAndBack
            if (front_pair || legacy_pair) && (back_pair || back_single) =>
        {
            GatefoldMode::FrontAndBack
        }
        _ => {
            debug!(
                "{} wants {:?} but the flap art is missing; folding shut",
                box_type, candidate
            );
            GatefoldMode::None
        }
    }
}

// The disambiguated names win over the legacy pair when both are present.
fn take_front_pair<T>(scans: &mut BTreeMap<TextureSlot, T>) -> Option<(T, T)> {
    take_pair(scans, TextureSlot::GatefoldFrontLeft, TextureSlot::GatefoldFrontRight)
        .or_else(|| take_pair(scans, TextureSlot::GatefoldLeft, TextureSlot::GatefoldRight))
}

fn take_back_pair<T>(scans: &mut BTreeMap<TextureSlot, T>) -> Option<(T, T)> {
    take_pair(scans, TextureSlot::GatefoldBackLeft, TextureSlot::GatefoldBackRight)
        .or_else(|| take_pair(scans, TextureSlot::GatefoldLeft, TextureSlot::GatefoldRight))
}

fn take_pair<T>(
    scans: &mut BTreeMap<TextureSlot, T>,
    left: TextureSlot,
    right: TextureSlot,
) -> Option<(T, T)> {
    if scans.contains_key(&left) && scans.contains_key(&right) {
        let l = scans.remove(&left).expect("checked left");
        let r = scans.remove(&right).expect("checked right");
        Some((l, r))
    } else {
        None
    }
}

/// Route scans into atlas keys for the selected mode. Closed flaps cover
/// the printed cover, so the cover art moves to an inner key, the flap's
/// outside art takes over the base face, and the remaining flap art lands
/// on the flap's reverse. Scans the mode does not reference are dropped.
pub fn arrange<T: Clone>(
    mode: GatefoldMode,
    mut scans: BTreeMap<TextureSlot, T>,
) -> BTreeMap<String, T> {
    let mut out = BTreeMap::new();
    for face in TextureSlot::BASE_FACES {
        if let Some(surface) = scans.remove(&face) {
            out.insert(face.key().to_owned(), surface);
        }
    }

    match mode {
        GatefoldMode::None => {}
        GatefoldMode::SingleFront => arrange_front(&mut out, &mut scans),
        GatefoldMode::SingleBack => arrange_back(&mut out, &mut scans),
        GatefoldMode::DoubleFront => arrange_double(&mut out, &mut scans),
        GatefoldMode::FrontAndBack => {
            arrange_front(&mut out, &mut scans);
            arrange_back(&mut out, &mut scans);
        }
    }
    out
}

fn arrange_front<T: Clone>(out: &mut BTreeMap<String, T>, scans: &mut BTreeMap<TextureSlot, T>) {
    if let Some((left, right)) = take_front_pair(scans) {
        if let Some(cover) = out.remove(keys::FRONT) {
            out.insert(keys::GATEFOLD_FRONT_INNER.to_owned(), cover);
        }
        out.insert(keys::FRONT.to_owned(), right);
        out.insert(keys::GATEFOLD_FRONT_BACK.to_owned(), left);
    }
}

fn arrange_back<T: Clone>(out: &mut BTreeMap<String, T>, scans: &mut BTreeMap<TextureSlot, T>) {
    if let Some((left, right)) = take_back_pair(scans) {
        if let Some(cover) = out.remove(keys::BACK) {
            out.insert(keys::GATEFOLD_BACK_INNER.to_owned(), cover);
        }
        out.insert(keys::BACK.to_owned(), left);
        out.insert(keys::GATEFOLD_BACK_FRONT.to_owned(), right);
    } else if let Some(single) = scans.remove(&TextureSlot::GatefoldBack) {
        // A lone back-flap scan prints only the flap's reverse; the box
        // keeps its own back art under the flap.
        if let Some(cover) = out.get(keys::BACK).cloned() {
            out.insert(keys::GATEFOLD_BACK_INNER.to_owned(), cover);
        }
        out.insert(keys::GATEFOLD_BACK_FRONT.to_owned(), single);
    }
}

fn arrange_double<T: Clone>(out: &mut BTreeMap<String, T>, scans: &mut BTreeMap<TextureSlot, T>) {
    let left = scans.remove(&TextureSlot::GatefoldFrontLeft);
    let right = scans.remove(&TextureSlot::GatefoldFrontRight);
    if let (Some(left), Some(right)) = (left, right) {
        out.insert(keys::GATEFOLD_FRONT_LEFT.to_owned(), left);
        out.insert(keys::GATEFOLD_FRONT_RIGHT.to_owned(), right);
        if let Some(back) = scans.remove(&TextureSlot::GatefoldBack) {
            out.insert(keys::GATEFOLD_DOUBLE_BACK.to_owned(), back);
        } else if let Some(cover) = out.get(keys::FRONT).cloned() {
            // Opening the flaps reveals the printed cover, which also backs
            // the flaps themselves when no dedicated reverse art exists.
            out.insert(keys::GATEFOLD_DOUBLE_INNER.to_owned(), cover);
        }
    }
}
