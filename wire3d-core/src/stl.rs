/// STL loading (binary and ASCII) into wireframe meshes
use std::path::Path;

use log::debug;
use nalgebra::Point3;
use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{multispace0, multispace1},
    multi::many0,
    number::complete::double,
    sequence::preceded,
    IResult,
};

use crate::error::{Error, Result};
use crate::geometry::Mesh;

type Triangle = [Point3<f64>; 3];

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

/// Read an STL file from disk and build its wireframe
pub fn load_stl<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    debug!("read {} bytes from {}", data.len(), path.display());
    parse_stl(&data)
}

/// Detect and parse STL data (ASCII first, falling back to binary)
pub fn parse_stl(data: &[u8]) -> Result<Mesh> {
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(mesh) = parse_ascii_stl(text) {
                return Ok(mesh);
            }
        }
    }

    parse_binary_stl(data)
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh> {
    if data.len() < HEADER_LEN + 4 {
        return Err(Error::Stl("file too small to be a valid STL".to_string()));
    }

    let count = u32::from_le_bytes([data[80], data[81], data[82], data[83]]) as usize;
    let body = &data[HEADER_LEN + 4..];
    let needed = count
        .checked_mul(FACET_LEN)
        .ok_or_else(|| Error::Stl(format!("facet count {count} is too large")))?;
    if body.len() < needed {
        return Err(Error::Stl(format!(
            "header declares {count} facets but only {} bytes follow",
            body.len()
        )));
    }

    let triangles: Vec<Triangle> = body
        .chunks_exact(FACET_LEN)
        .take(count)
        .map(|facet| {
            // Skip the 12-byte normal, read three vertices, ignore the attribute word
            let vertex = |i: usize| {
                let at = 12 + i * 12;
                Point3::new(
                    read_f32(facet, at) as f64,
                    read_f32(facet, at + 4) as f64,
                    read_f32(facet, at + 8) as f64,
                )
            };
            [vertex(0), vertex(1), vertex(2)]
        })
        .collect();

    Ok(Mesh::from_triangles(&triangles))
}

fn read_f32(bytes: &[u8], at: usize) -> f32 {
    f32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh> {
    match solid(input) {
        Ok((_, triangles)) => Ok(Mesh::from_triangles(&triangles)),
        Err(e) => Err(Error::Stl(format!("failed to parse ASCII STL: {e}"))),
    }
}

fn solid(input: &str) -> IResult<&str, Vec<Triangle>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _) = take_till(|c| c == '\n')(input)?; // Optional name
    let (input, triangles) = many0(facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    Ok((input, triangles))
}

fn facet(input: &str) -> IResult<&str, Triangle> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _) = vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v1) = vertex(input)?;
    let (input, v2) = vertex(input)?;
    let (input, v3) = vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;
    Ok((input, [v1, v2, v3]))
}

fn vertex(input: &str) -> IResult<&str, Point3<f64>> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    vector3(input)
}

fn vector3(input: &str) -> IResult<&str, Point3<f64>> {
    let (input, _) = multispace0(input)?;
    let (input, x) = double(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = double(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = double(input)?;
    Ok((input, Point3::new(x, y, z)))
}
