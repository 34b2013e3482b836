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

// From box type + packed atlas to mesh parts: gatefold topology selection,
// the slot-shuffling that hides flap art in the right atlas keys, UV window
// computation, and the geometry builder itself.

mod geometry;
mod topology;
mod uv;

pub use crate::{
    geometry::{
        build, MeshPart, BOX_NODE, GATEFOLD_BACK_NODE, GATEFOLD_DEPTH_OFFSET,
        GATEFOLD_FRONT_LEFT_NODE, GATEFOLD_FRONT_NODE, GATEFOLD_FRONT_RIGHT_NODE,
    },
    topology::{arrange, keys, select, GatefoldMode},
    uv::{UvFlags, UvMapper},
};
