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

/// Width of the +y edge of an Eidos trapezoid box, in the same unit as the
/// descriptor's dimensions.
const EIDOS_TOP_WIDTH: f32 = 5.75;

/// The catalog's closed box type table. Ids are the one-indexed database
/// ids; `Descriptor::from_json` has already un-done the legacy zero-indexed
/// encoding by the time one of these is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum BoxType {
    BigBox = 1,
    SmallBox = 2,
    EidosTrapezoid = 3,
    DvdCaseSlipcover = 4,
    OldSmallBox = 5,
    BoxInBox = 6,
    BigBoxWithGatefold = 7,
    SmallBoxWithGatefold = 8,
    SmallBoxWithVerticalGatefold = 9,
    BigBoxWithBackGatefold = 10,
    NewSmallBox = 11,
    NewBigBox = 12,
    SmallBoxForDvd = 13,
    BigLongBox = 14,
    BigBoxWithVerticalGatefoldButHorizontal = 15,
    SmallBoxWithGatefoldRightFlap = 16,
    DvdCaseSlipcoverWithGatefold = 17,
    NewBoxInBox = 18,
    VinylLikeWithGatefold = 19,
    BigBoxWithDoubleGatefold = 20,
    BigBoxWithFrontAndBackGatefold = 21,
}

impl BoxType {
    pub fn from_id(id: u32) -> Option<Self> {
        Some(match id {
            1 => BoxType::BigBox,
            2 => BoxType::SmallBox,
            3 => BoxType::EidosTrapezoid,
            4 => BoxType::DvdCaseSlipcover,
            5 => BoxType::OldSmallBox,
            6 => BoxType::BoxInBox,
            7 => BoxType::BigBoxWithGatefold,
            8 => BoxType::SmallBoxWithGatefold,
            9 => BoxType::SmallBoxWithVerticalGatefold,
            10 => BoxType::BigBoxWithBackGatefold,
            11 => BoxType::NewSmallBox,
            12 => BoxType::NewBigBox,
            13 => BoxType::SmallBoxForDvd,
            14 => BoxType::BigLongBox,
            15 => BoxType::BigBoxWithVerticalGatefoldButHorizontal,
            16 => BoxType::SmallBoxWithGatefoldRightFlap,
            17 => BoxType::DvdCaseSlipcoverWithGatefold,
            18 => BoxType::NewBoxInBox,
            19 => BoxType::VinylLikeWithGatefold,
            20 => BoxType::BigBoxWithDoubleGatefold,
            21 => BoxType::BigBoxWithFrontAndBackGatefold,
            _ => return None,
        })
    }

    pub fn id(&self) -> u32 {
        *self as u32
    }

    /// The display name as stored in the catalog's box type table.
    pub fn name(&self) -> &'static str {
        match self {
            BoxType::BigBox => "Big Box",
            BoxType::SmallBox => "Small Box",
            BoxType::EidosTrapezoid => "Eidos Trapezoid",
            BoxType::DvdCaseSlipcover => "DVD Case Slipcover",
            BoxType::OldSmallBox => "Old Small Box",
            BoxType::BoxInBox => "Box in Box",
            BoxType::BigBoxWithGatefold => "Big Box With Gatefold",
            BoxType::SmallBoxWithGatefold => "Small Box With Gatefold",
            BoxType::SmallBoxWithVerticalGatefold => "Small Box With Vertical Gatefold",
            BoxType::BigBoxWithBackGatefold => "Big Box With Back Gatefold",
            BoxType::NewSmallBox => "New Small Box",
            BoxType::NewBigBox => "New Big Box",
            BoxType::SmallBoxForDvd => "Small Box For DVD",
            BoxType::BigLongBox => "Big Long Box",
            BoxType::BigBoxWithVerticalGatefoldButHorizontal => {
                "Big Box With Vertical Gatefold But Horizontal"
            }
            BoxType::SmallBoxWithGatefoldRightFlap => "Small Box With Gatefold Right Flap",
            BoxType::DvdCaseSlipcoverWithGatefold => "DVD Case Slipcover with Gatefold",
            BoxType::NewBoxInBox => "New Box in Box",
            BoxType::VinylLikeWithGatefold => "Vinyl Like With Gatefold",
            BoxType::BigBoxWithDoubleGatefold => "Big Box With Double Gatefold",
            BoxType::BigBoxWithFrontAndBackGatefold => "Big Box With Front and Back Gatefold",
        }
    }

    /// Whether this type folds open at all. Which way it folds is decided by
    /// the topology selector, which also checks that the flap art exists.
    pub fn is_gatefold(&self) -> bool {
        self.name().contains("Gatefold")
    }

    /// Types whose side profile is a trapezoid rather than a rectangle have
    /// a fixed top-edge width.
    pub fn top_width(&self) -> Option<f32> {
        match self {
            BoxType::EidosTrapezoid => Some(EIDOS_TOP_WIDTH),
            _ => None,
        }
    }
}

impl fmt::Display for BoxType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
