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
use anyhow::{ensure, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use serde_json::Value;
use std::{
    fs,
    io::{Cursor, Read},
    path::PathBuf,
};
use structopt::StructOpt;

/// Show the structure of binary glTF box models
#[derive(Debug, StructOpt)]
struct Opt {
    /// Pretty-print the whole JSON chunk
    #[structopt(short = "j", long = "json")]
    show_json: bool,

    /// One or more GLB files to inspect
    inputs: Vec<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let opt = Opt::from_args();
    for input in &opt.inputs {
        let data = fs::read(input)?;
        println!("{}", input.display());
        println!("{}", "=".repeat(input.display().to_string().len()));
        show_glb(&data, opt.show_json)?;
        println!();
    }
    Ok(())
}

fn show_glb(data: &[u8], show_json: bool) -> Result<()> {
    let mut cursor = Cursor::new(data);
    let mut magic = [0u8; 4];
    cursor.read_exact(&mut magic)?;
    ensure!(&magic == b"glTF", "not a binary glTF container");
    let version = cursor.read_u32::<LittleEndian>()?;
    let total = cursor.read_u32::<LittleEndian>()?;
    println!("version:     {}", version);
    println!(
        "length:      {} bytes{}",
        total,
        if total as usize == data.len() {
            "".to_owned()
        } else {
            format!(" (file is {}!)", data.len())
        }
    );

    let mut json_chunk = None;
    while (cursor.position() as usize) < data.len() {
        let length = cursor.read_u32::<LittleEndian>()? as usize;
        let mut kind = [0u8; 4];
        cursor.read_exact(&mut kind)?;
        let mut chunk = vec![0u8; length];
        cursor.read_exact(&mut chunk)?;
        println!(
            "chunk:       {} ({} bytes{})",
            String::from_utf8_lossy(&kind).trim_end_matches('\0'),
            length,
            if length % 4 == 0 { "" } else { ", misaligned!" }
        );
        if &kind == b"JSON" {
            json_chunk = Some(chunk);
        }
    }

    let json_chunk = match json_chunk {
        Some(chunk) => chunk,
        None => return Ok(()),
    };
    let doc: Value = serde_json::from_slice(&json_chunk)?;
    if show_json {
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    if let Some(generator) = doc["asset"]["generator"].as_str() {
        println!("generator:   {}", generator);
    }
    if let Some(exts) = doc["extensionsUsed"].as_array() {
        let names: Vec<_> = exts.iter().filter_map(Value::as_str).collect();
        println!("extensions:  {}", names.join(", "));
    }
    if let Some(nodes) = doc["nodes"].as_array() {
        let names: Vec<_> = nodes
            .iter()
            .map(|n| n["name"].as_str().unwrap_or("<unnamed>"))
            .collect();
        println!("nodes:       {}", names.join(", "));
    }
    if let Some(material) = doc["materials"].get(0) {
        println!(
            "material:    {} (metallic {}, roughness {})",
            material["name"].as_str().unwrap_or("<unnamed>"),
            material["pbrMetallicRoughness"]["metallicFactor"],
            material["pbrMetallicRoughness"]["roughnessFactor"],
        );
    }
    if let Some(image) = doc["images"].get(0) {
        let view = image["bufferView"].as_u64().unwrap_or(0) as usize;
        let bytes = doc["bufferViews"]
            .get(view)
            .map(|v| v["byteLength"].as_u64().unwrap_or(0))
            .unwrap_or(0);
        println!(
            "image:       {} ({:.1} KB)",
            image["mimeType"].as_str().unwrap_or("<unknown>"),
            bytes as f64 / 1024.
        );
    }
    println!(
        "meshes:      {}  accessors: {}  buffer views: {}",
        doc["meshes"].as_array().map(Vec::len).unwrap_or(0),
        doc["accessors"].as_array().map(Vec::len).unwrap_or(0),
        doc["bufferViews"].as_array().map(Vec::len).unwrap_or(0),
    );
    Ok(())
}
