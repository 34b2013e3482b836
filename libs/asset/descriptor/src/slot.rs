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
use std::fmt;

/// The closed set of scan names a bundle may carry. `GatefoldLeft` and
/// `GatefoldRight` are the legacy, side-ambiguous pair; newer bundles use
/// the `Front`/`Back` disambiguated names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TextureSlot {
    Front,
    Back,
    Top,
    Bottom,
    Left,
    Right,
    GatefoldLeft,
    GatefoldRight,
    GatefoldFrontLeft,
    GatefoldFrontRight,
    GatefoldBack,
    GatefoldBackLeft,
    GatefoldBackRight,
}

impl TextureSlot {
    pub const BASE_FACES: [TextureSlot; 6] = [
        TextureSlot::Front,
        TextureSlot::Back,
        TextureSlot::Top,
        TextureSlot::Bottom,
        TextureSlot::Left,
        TextureSlot::Right,
    ];

    /// Map a file stem to a slot. Matching is case-insensitive; anything
    /// outside the closed set is `None`.
    pub fn from_stem(stem: &str) -> Option<Self> {
        Some(match stem.to_ascii_lowercase().as_str() {
            "front" => TextureSlot::Front,
            "back" => TextureSlot::Back,
            "top" => TextureSlot::Top,
            "bottom" => TextureSlot::Bottom,
            "left" => TextureSlot::Left,
            "right" => TextureSlot::Right,
            "gatefold_left" => TextureSlot::GatefoldLeft,
            "gatefold_right" => TextureSlot::GatefoldRight,
            "gatefold_front_left" => TextureSlot::GatefoldFrontLeft,
            "gatefold_front_right" => TextureSlot::GatefoldFrontRight,
            "gatefold_back" => TextureSlot::GatefoldBack,
            "gatefold_back_left" => TextureSlot::GatefoldBackLeft,
            "gatefold_back_right" => TextureSlot::GatefoldBackRight,
            _ => return None,
        })
    }

    pub fn key(&self) -> &'static str {
        match self {
            TextureSlot::Front => "front",
            TextureSlot::Back => "back",
            TextureSlot::Top => "top",
            TextureSlot::Bottom => "bottom",
            TextureSlot::Left => "left",
            TextureSlot::Right => "right",
            TextureSlot::GatefoldLeft => "gatefold_left",
            TextureSlot::GatefoldRight => "gatefold_right",
            TextureSlot::GatefoldFrontLeft => "gatefold_front_left",
            TextureSlot::GatefoldFrontRight => "gatefold_front_right",
            TextureSlot::GatefoldBack => "gatefold_back",
            TextureSlot::GatefoldBackLeft => "gatefold_back_left",
            TextureSlot::GatefoldBackRight => "gatefold_back_right",
        }
    }

    pub fn is_base_face(&self) -> bool {
        Self::BASE_FACES.contains(self)
    }
}

impl fmt::Display for TextureSlot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
