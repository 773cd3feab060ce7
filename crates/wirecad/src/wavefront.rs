//! Wavefront OBJ/MTL interchange.
//!
//! Only the statements that map onto drawables are understood: `o`, `v`,
//! `f`, `l`, `p`, `cstype`, `curv`/`curv2`, `usemtl` and `mtllib`.
//! Texture coordinates, normals, groups and smoothing are skipped.
//!
//! Each `o` block becomes one or more drawables:
//!
//! | block contents     | drawable     |
//! |--------------------|--------------|
//! | one `f`            | `Wireframe`  |
//! | several `f`        | `Object3D`   |
//! | `l a b`            | `Line`       |
//! | `p a ...`          | `NamedPoint` |
//! | `curv2` / `curv`   | curve of the current `cstype` |
//!
//! When a block yields more than one drawable, the extras are named
//! `name_1`, `name_2`, ...

use std::collections::{BTreeSet, HashMap};
use std::fmt::{self, Write};

use thiserror::Error;

use crate::{
    Attributes, BSplineCurve, BezierCurve, Drawable, GeometryError, Line, NamedPoint, Object3D,
    Point3D, Rgb, Wireframe,
};

/// Failure to read an OBJ or MTL document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("line {line}: {message}")]
    Format { line: usize, message: String },
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl ParseError {
    fn format(line: usize, message: impl Into<String>) -> Self {
        Self::Format {
            line,
            message: message.into(),
        }
    }
}

/// Material name to diffuse color.
pub type Materials = HashMap<String, Rgb>;

/// One parsed drawable with the material it was declared under.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjObject {
    pub drawable: Drawable,
    pub material: Option<String>,
}

/// A parsed OBJ document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjFile {
    pub objects: Vec<ObjObject>,
    /// `mtllib` references, in order. Not resolved by the parser.
    pub material_libraries: Vec<String>,
}

impl ObjFile {
    /// Iterates the parsed drawables in file order.
    pub fn drawables(&self) -> impl Iterator<Item = &Drawable> {
        self.objects.iter().map(|o| &o.drawable)
    }

    /// Drops material names, keeping the drawables in file order.
    pub fn into_drawables(self) -> Vec<Drawable> {
        self.objects.into_iter().map(|o| o.drawable).collect()
    }

    /// Colors each object with the `Kd` of its `usemtl` material.
    ///
    /// Unknown materials leave the object as parsed.
    pub fn apply_materials(self, materials: &Materials) -> Result<Vec<Drawable>, ParseError> {
        self.objects
            .into_iter()
            .map(|object| {
                let color = object.material.as_ref().and_then(|m| {
                    let found = materials.get(m).copied();
                    if found.is_none() {
                        log::warn!("material `{m}` of `{}` is not defined", object.drawable.name());
                    }
                    found
                });
                match color {
                    Some(color) => {
                        let attributes = object.drawable.attributes().clone().with_color(color);
                        Ok(object.drawable.with_attributes(attributes)?)
                    }
                    None => Ok(object.drawable),
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CurveKind {
    Bezier,
    BSpline,
}

/// Elements collected for one `o` block, as 0-based global vertex indices.
#[derive(Debug, Default)]
struct Block {
    name: String,
    material: Option<String>,
    faces: Vec<Vec<usize>>,
    lines: Vec<[usize; 2]>,
    points: Vec<usize>,
    curves: Vec<(CurveKind, Vec<usize>)>,
}

impl Block {
    fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn finish(self, vertices: &[Point3D], out: &mut Vec<ObjObject>) -> Result<(), ParseError> {
        let at = |indices: &[usize]| -> Vec<Point3D> { indices.iter().map(|&i| vertices[i]).collect() };
        let mut shapes: Vec<Box<dyn FnOnce(Attributes) -> Result<Drawable, GeometryError>>> = Vec::new();

        match self.faces.len() {
            0 => {}
            1 => {
                let ring = at(&self.faces[0]);
                shapes.push(Box::new(move |a| Ok(Wireframe::new(a, ring)?.into())));
            }
            _ => {
                let (points, faces) = compact(vertices, &self.faces);
                shapes.push(Box::new(move |a| Ok(Object3D::new(a, points, faces)?.into())));
            }
        }
        for [a, b] in self.lines {
            let (p1, p2) = (vertices[a], vertices[b]);
            shapes.push(Box::new(move |attrs| Ok(Line::new(attrs, p1, p2).into())));
        }
        for i in self.points {
            let p = vertices[i];
            shapes.push(Box::new(move |attrs| Ok(NamedPoint::new(attrs, p).into())));
        }
        for (kind, indices) in self.curves {
            let control = at(&indices);
            shapes.push(Box::new(move |attrs| {
                Ok(match kind {
                    CurveKind::Bezier => BezierCurve::new(attrs, control)?.into(),
                    CurveKind::BSpline => BSplineCurve::new(attrs, control)?.into(),
                })
            }));
        }

        if shapes.is_empty() {
            log::debug!("object `{}` has no elements", self.name);
        }
        for (k, build) in shapes.into_iter().enumerate() {
            let name = if k == 0 {
                self.name.clone()
            } else {
                format!("{}_{k}", self.name)
            };
            out.push(ObjObject {
                drawable: build(Attributes::named(name))?,
                material: self.material.clone(),
            });
        }
        Ok(())
    }
}

/// Keeps only the vertices the faces use, in file order, renumbering faces
/// to match.
fn compact(vertices: &[Point3D], faces: &[Vec<usize>]) -> (Vec<Point3D>, Vec<Vec<usize>>) {
    let used: BTreeSet<usize> = faces.iter().flatten().copied().collect();
    let local: HashMap<usize, usize> = used.iter().enumerate().map(|(l, &g)| (g, l)).collect();
    let points = used.iter().map(|&g| vertices[g]).collect();
    let faces = faces
        .iter()
        .map(|face| face.iter().map(|g| local[g]).collect())
        .collect();
    (points, faces)
}

fn parse_f64(token: &str, line: usize) -> Result<f64, ParseError> {
    token
        .parse()
        .map_err(|_| ParseError::format(line, format!("`{token}` is not a number")))
}

/// Resolves a 1-based or negative (relative) index against the vertices
/// defined so far. `f` style `v/vt/vn` tokens use the first component.
fn parse_index(token: &str, vertex_count: usize, line: usize) -> Result<usize, ParseError> {
    let head = token.split('/').next().unwrap_or(token);
    let raw: i64 = head
        .parse()
        .map_err(|_| ParseError::format(line, format!("`{token}` is not a vertex index")))?;
    let resolved = match raw {
        0 => None,
        r if r > 0 => Some(r - 1),
        r => Some(vertex_count as i64 + r),
    };
    match resolved {
        Some(i) if i >= 0 && (i as usize) < vertex_count => Ok(i as usize),
        _ => Err(ParseError::format(
            line,
            format!("vertex index {raw} is out of range ({vertex_count} vertices defined)"),
        )),
    }
}

/// Parses an OBJ document.
pub fn parse_obj(source: &str) -> Result<ObjFile, ParseError> {
    let mut file = ObjFile::default();
    let mut vertices: Vec<Point3D> = Vec::new();
    let mut block: Option<Block> = None;
    let mut curve_kind: Option<CurveKind> = None;

    for (number, raw) in source.lines().enumerate() {
        let line = number + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        let mut tokens = content.split_whitespace();
        let Some(keyword) = tokens.next() else { continue };
        let args: Vec<&str> = tokens.collect();

        let indices = |args: &[&str], count: usize| -> Result<Vec<usize>, ParseError> {
            args.iter().map(|t| parse_index(t, count, line)).collect()
        };

        match keyword {
            "o" => {
                if let Some(done) = block.take() {
                    done.finish(&vertices, &mut file.objects)?;
                }
                let name = if args.is_empty() { "default".to_owned() } else { args.join(" ") };
                block = Some(Block::named(name));
            }
            "v" => {
                if args.len() < 3 {
                    return Err(ParseError::format(line, "vertex needs x, y and z"));
                }
                vertices.push(Point3D::new(
                    parse_f64(args[0], line)?,
                    parse_f64(args[1], line)?,
                    parse_f64(args[2], line)?,
                ));
            }
            "f" => {
                if args.len() < 3 {
                    return Err(ParseError::format(line, "face needs at least 3 vertices"));
                }
                let face = indices(&args, vertices.len())?;
                block.get_or_insert_with(|| Block::named("default")).faces.push(face);
            }
            "l" => {
                let ends = indices(&args, vertices.len())?;
                let [a, b] = ends[..] else {
                    return Err(ParseError::format(
                        line,
                        format!("line element needs exactly 2 vertices, got {}", ends.len()),
                    ));
                };
                block.get_or_insert_with(|| Block::named("default")).lines.push([a, b]);
            }
            "p" => {
                if args.is_empty() {
                    return Err(ParseError::format(line, "point element needs a vertex"));
                }
                let points = indices(&args, vertices.len())?;
                block.get_or_insert_with(|| Block::named("default")).points.extend(points);
            }
            "cstype" => {
                let kind = args.last().copied().unwrap_or("");
                curve_kind = Some(match kind {
                    "bezier" => CurveKind::Bezier,
                    "bspline" => CurveKind::BSpline,
                    other => {
                        return Err(ParseError::format(line, format!("unsupported curve type `{other}`")));
                    }
                });
            }
            "curv" | "curv2" => {
                let Some(kind) = curve_kind else {
                    return Err(ParseError::format(line, format!("`{keyword}` before any `cstype`")));
                };
                // `curv u0 u1 v1 v2 ...` carries a parameter range first.
                let skip = if keyword == "curv" { 2 } else { 0 };
                if args.len() <= skip {
                    return Err(ParseError::format(line, format!("`{keyword}` has no control points")));
                }
                let control = indices(&args[skip..], vertices.len())?;
                block
                    .get_or_insert_with(|| Block::named("default"))
                    .curves
                    .push((kind, control));
            }
            "usemtl" => {
                let name = args.join(" ");
                block.get_or_insert_with(|| Block::named("default")).material = Some(name);
            }
            "mtllib" => file.material_libraries.extend(args.iter().map(|s| s.to_string())),
            "vt" | "vn" | "vp" | "g" | "s" | "deg" | "parm" | "end" => {}
            other => log::debug!("line {line}: ignoring `{other}`"),
        }
    }

    if let Some(done) = block.take() {
        done.finish(&vertices, &mut file.objects)?;
    }
    log::debug!(
        "parsed {} vertices into {} objects",
        vertices.len(),
        file.objects.len()
    );
    Ok(file)
}

/// Parses an MTL document, keeping each material's diffuse color.
///
/// A material without `Kd` is black.
pub fn parse_mtl(source: &str) -> Result<Materials, ParseError> {
    let mut materials = Materials::new();
    let mut current: Option<String> = None;

    for (number, raw) in source.lines().enumerate() {
        let line = number + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        let mut tokens = content.split_whitespace();
        let Some(keyword) = tokens.next() else { continue };
        let args: Vec<&str> = tokens.collect();

        match keyword {
            "newmtl" => {
                let name = args.join(" ");
                if name.is_empty() {
                    return Err(ParseError::format(line, "`newmtl` needs a name"));
                }
                materials.insert(name.clone(), Rgb::BLACK);
                current = Some(name);
            }
            "Kd" => {
                let Some(name) = &current else {
                    return Err(ParseError::format(line, "`Kd` before any `newmtl`"));
                };
                if args.len() != 3 {
                    return Err(ParseError::format(line, "`Kd` needs r, g and b"));
                }
                let color = Rgb::from_unit(
                    parse_f64(args[0], line)?,
                    parse_f64(args[1], line)?,
                    parse_f64(args[2], line)?,
                );
                materials.insert(name.clone(), color);
            }
            _ => {}
        }
    }
    Ok(materials)
}

/// Writes drawables as OBJ, one `o` block each.
pub fn write_obj_to<W: Write>(out: &mut W, drawables: &[Drawable]) -> fmt::Result {
    let mut base = 1;
    for drawable in drawables {
        writeln!(out, "o {}", drawable.name())?;
        let points = drawable.points();
        for p in &points {
            writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
        }
        let refs = |indices: &mut dyn Iterator<Item = usize>| -> String {
            indices
                .map(|i| (base + i).to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };
        let all = || 0..points.len();
        match drawable {
            Drawable::Point(_) => writeln!(out, "p {}", refs(&mut all()))?,
            Drawable::Line(_) => writeln!(out, "l {}", refs(&mut all()))?,
            Drawable::Wireframe(_) => writeln!(out, "f {}", refs(&mut all()))?,
            Drawable::Solid(solid) => {
                for face in solid.faces() {
                    writeln!(out, "f {}", refs(&mut face.iter().copied()))?;
                }
            }
            Drawable::Bezier(_) => {
                writeln!(out, "cstype bezier")?;
                writeln!(out, "curv2 {}", refs(&mut all()))?;
            }
            Drawable::BSpline(_) => {
                writeln!(out, "cstype bspline")?;
                writeln!(out, "curv2 {}", refs(&mut all()))?;
            }
        }
        base += points.len();
    }
    Ok(())
}

/// Writes drawables as an OBJ string.
pub fn write_obj(drawables: &[Drawable]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_obj_to(&mut out, drawables)?;
    Ok(out)
}
