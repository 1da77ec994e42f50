//! Error type for cloth construction and mesh input.
//!
//! Only building a body (or reading the mesh it is built from) can fail.
//! Once a [`crate::cloth::ClothBody`] exists, stepping it is infallible.

use core::fmt;

/// Errors returned while building a cloth or loading its mesh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClothError {
    /// The flat vertex buffer does not hold whole `(x, y, z)` triples.
    MalformedVertexBuffer {
        /// Number of coordinates provided
        len: usize,
    },
    /// A face has a vertex count other than 3 or 4.
    InvalidFaceArity {
        /// Position of the face in the input list
        face: usize,
        /// Number of indices the face carried
        arity: usize,
    },
    /// A face references a vertex that does not exist.
    InvalidFaceIndex {
        /// Position of the face in the input list
        face: usize,
        /// The offending 0-based vertex index
        index: usize,
        /// Number of vertices available
        vertex_count: usize,
    },
    /// A constraint id passed to a mutation hook is out of range.
    InvalidConstraintIndex { index: usize, count: usize },
    /// A mesh text line could not be parsed.
    Parse {
        /// 1-based line number
        line: usize,
        reason: String,
    },
    /// Reading a mesh file failed.
    Io { message: String },
}

impl fmt::Display for ClothError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedVertexBuffer { len } => {
                write!(f, "vertex buffer length {len} is not a multiple of 3")
            }
            Self::InvalidFaceArity { face, arity } => {
                write!(f, "face {face} has {arity} vertices (expected 3 or 4)")
            }
            Self::InvalidFaceIndex {
                face,
                index,
                vertex_count,
            } => write!(
                f,
                "face {face} references vertex {index} out of range (count={vertex_count})"
            ),
            Self::InvalidConstraintIndex { index, count } => {
                write!(f, "constraint index {index} out of range (count={count})")
            }
            Self::Parse { line, reason } => write!(f, "line {line}: {reason}"),
            Self::Io { message } => write!(f, "I/O error: {message}"),
        }
    }
}

impl std::error::Error for ClothError {}

impl From<std::io::Error> for ClothError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}
