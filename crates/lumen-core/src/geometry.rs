//! Geometry text loader
//!
//! Parses the small sectioned text format used by the Lumen snapshots into
//! two flat buffers that can be copied verbatim into GPU memory:
//!
//! ```text
//! # comment lines start with '#'
//! [points]
//! x0 y0 r0 g0 b0
//! [indices]
//! i0 i1 i2
//! ```
//!
//! Each `[points]` line is one vertex (2D position plus RGB color) and each
//! `[indices]` line is one triangle referencing vertices by 0-based position.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use crate::error::GeometryError;
use crate::logging::LogCategory;
use crate::{lumen_debug, lumen_trace, lumen_warn};

/// Marker line opening the vertex section
pub const POINTS_MARKER: &str = "[points]";
/// Marker line opening the index section
pub const INDICES_MARKER: &str = "[indices]";
/// Floats per vertex record: x, y, r, g, b
pub const FLOATS_PER_VERTEX: usize = 5;
/// Indices per triangle
pub const INDICES_PER_TRIANGLE: usize = 3;

/// How malformed or missing numeric fields are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberPolicy {
    /// Substitute zero for a malformed token and every later field on the
    /// same line. Missing trailing fields are zero as well.
    #[default]
    Lenient,
    /// Fail with [`GeometryError::MalformedNumber`] or
    /// [`GeometryError::MissingFields`].
    Strict,
}

/// Whether indices are checked against the parsed vertex count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexPolicy {
    /// Indices are copied as-is; out-of-range values reach the GPU untouched.
    #[default]
    PassThrough,
    /// Fail with [`GeometryError::IndexOutOfRange`] once the source is read.
    Validate,
}

/// Loader behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    pub numbers: NumberPolicy,
    pub indices: IndexPolicy,
}

/// Section the loader is currently reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    None,
    Points,
    Indices,
}

impl Section {
    /// Only marker lines move between sections.
    fn transition(self, kind: &LineKind<'_>) -> Section {
        match kind {
            LineKind::Marker(next) => *next,
            LineKind::Skip | LineKind::Data(_) => self,
        }
    }
}

/// Classification of a single source line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind<'a> {
    Marker(Section),
    Skip,
    Data(&'a str),
}

impl<'a> LineKind<'a> {
    fn classify(raw: &'a str) -> Self {
        let line = raw.strip_suffix('\r').unwrap_or(raw);

        if line == POINTS_MARKER {
            LineKind::Marker(Section::Points)
        } else if line == INDICES_MARKER {
            LineKind::Marker(Section::Indices)
        } else if line.is_empty() || line.starts_with('#') {
            LineKind::Skip
        } else {
            LineKind::Data(line)
        }
    }
}

/// Flat vertex and index buffers produced by one load call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedGeometry {
    /// Flattened vertex records, `FLOATS_PER_VERTEX` floats each
    pub points: Vec<f32>,
    /// Flattened triangles, `INDICES_PER_TRIANGLE` indices each
    pub indices: Vec<u16>,
}

impl ParsedGeometry {
    pub fn vertex_count(&self) -> usize {
        self.points.len() / FLOATS_PER_VERTEX
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / INDICES_PER_TRIANGLE
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.indices.is_empty()
    }

    /// Iterate vertex records as `[x, y, r, g, b]` slices
    pub fn vertices(&self) -> impl Iterator<Item = &[f32]> + '_ {
        self.points.chunks_exact(FLOATS_PER_VERTEX)
    }

    /// Iterate triangles as `[a, b, c]` slices
    pub fn triangles(&self) -> impl Iterator<Item = &[u16]> + '_ {
        self.indices.chunks_exact(INDICES_PER_TRIANGLE)
    }

    /// Raw bytes of the vertex buffer, ready for upload
    pub fn point_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.points)
    }

    /// Raw bytes of the index buffer, ready for upload
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Largest index referenced, if any
    pub fn max_index(&self) -> Option<u16> {
        self.indices.iter().copied().max()
    }

    pub fn into_parts(self) -> (Vec<f32>, Vec<u16>) {
        (self.points, self.indices)
    }
}

/// Stateless loader for the geometry text format.
///
/// Every call builds a fresh [`ParsedGeometry`]; nothing carries over between
/// calls on the same loader.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometryLoader {
    options: LoaderOptions,
}

impl GeometryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LoaderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> LoaderOptions {
        self.options
    }

    /// Load geometry from a file on disk.
    ///
    /// # Errors
    /// [`GeometryError::SourceUnavailable`] when the file cannot be opened,
    /// plus the policy-dependent parse errors.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<ParsedGeometry, GeometryError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| GeometryError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

        let geometry = self.load_from_reader(BufReader::new(file))?;

        lumen_debug!(
            LogCategory::Geometry,
            path = %path.display(),
            vertices = geometry.vertex_count(),
            triangles = geometry.triangle_count(),
            "Loaded geometry"
        );

        Ok(geometry)
    }

    /// Load geometry from any buffered reader.
    ///
    /// Lines are split on raw `\n` bytes and decoded lossily, so bytes that
    /// are not valid UTF-8 never fail the load. Numeric tokens are ASCII and
    /// unaffected.
    pub fn load_from_reader<R: BufRead>(
        &self,
        mut reader: R,
    ) -> Result<ParsedGeometry, GeometryError> {
        let mut geometry = ParsedGeometry::default();
        let mut section = Section::None;
        let mut buf = Vec::new();
        let mut line_no = 0;

        loop {
            line_no += 1;
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| GeometryError::Read {
                    line: line_no,
                    source,
                })?;
            if read == 0 {
                break;
            }

            let raw = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
            let line = String::from_utf8_lossy(raw);
            self.consume_line(&mut geometry, &mut section, line_no, &line)?;
        }

        self.finish(geometry)
    }

    /// Parse geometry already held in memory
    pub fn parse_str(&self, text: &str) -> Result<ParsedGeometry, GeometryError> {
        let mut geometry = ParsedGeometry::default();
        let mut section = Section::None;

        for (number, line) in text.lines().enumerate() {
            self.consume_line(&mut geometry, &mut section, number + 1, line)?;
        }

        self.finish(geometry)
    }

    fn consume_line(
        &self,
        geometry: &mut ParsedGeometry,
        section: &mut Section,
        line_no: usize,
        raw: &str,
    ) -> Result<(), GeometryError> {
        let kind = LineKind::classify(raw);

        let next = section.transition(&kind);
        if next != *section {
            lumen_trace!(LogCategory::Geometry, line = line_no, "Entering section {:?}", next);
            *section = next;
        }

        let LineKind::Data(data) = kind else {
            return Ok(());
        };

        match *section {
            Section::Points => {
                let record = self.parse_fields::<f32, FLOATS_PER_VERTEX>(data, line_no)?;
                geometry.points.extend(record);
            }
            Section::Indices => {
                let triple = self.parse_fields::<u16, INDICES_PER_TRIANGLE>(data, line_no)?;
                geometry.indices.extend(triple);
            }
            Section::None => {
                lumen_trace!(
                    LogCategory::Geometry,
                    line = line_no,
                    "Ignoring data outside of any section"
                );
            }
        }

        Ok(())
    }

    /// Read exactly `N` whitespace-separated fields; extra tokens are ignored.
    fn parse_fields<T, const N: usize>(
        &self,
        data: &str,
        line: usize,
    ) -> Result<[T; N], GeometryError>
    where
        T: FromStr + Copy + Default,
    {
        let mut fields = [T::default(); N];
        let mut tokens = data.split_whitespace();
        let mut found = 0;

        for slot in fields.iter_mut() {
            let Some(token) = tokens.next() else {
                break;
            };

            match token.parse::<T>() {
                Ok(value) => {
                    *slot = value;
                    found += 1;
                }
                Err(_) if self.options.numbers == NumberPolicy::Strict => {
                    return Err(GeometryError::MalformedNumber {
                        line,
                        token: token.to_string(),
                    });
                }
                Err(_) => {
                    lumen_warn!(
                        LogCategory::Geometry,
                        line,
                        token,
                        "Malformed number, zeroing the rest of the line"
                    );
                    return Ok(fields);
                }
            }
        }

        if found < N {
            if self.options.numbers == NumberPolicy::Strict {
                return Err(GeometryError::MissingFields {
                    line,
                    expected: N,
                    found,
                });
            }
            lumen_warn!(
                LogCategory::Geometry,
                line,
                found,
                expected = N,
                "Too few fields, padding with zero"
            );
        }

        Ok(fields)
    }

    fn finish(&self, geometry: ParsedGeometry) -> Result<ParsedGeometry, GeometryError> {
        if self.options.indices == IndexPolicy::Validate {
            let vertex_count = geometry.vertex_count();
            if let Some(&index) = geometry
                .indices
                .iter()
                .find(|&&index| usize::from(index) >= vertex_count)
            {
                return Err(GeometryError::IndexOutOfRange {
                    index,
                    vertex_count,
                });
            }
        }

        Ok(geometry)
    }
}

/// Load a geometry file with default options
pub fn load_geometry(path: impl AsRef<Path>) -> Result<ParsedGeometry, GeometryError> {
    GeometryLoader::new().load(path)
}
