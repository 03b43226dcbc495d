// SPDX-License-Identifier: MPL-2.0

//! Error types for the preview rendering engine

use crate::graphics::NativeErrorFlags;
use std::fmt;

/// Result type alias using EngineError
pub type EngineResult<T> = Result<T, EngineError>;

/// Top-level engine error type
#[derive(Debug, Clone)]
pub enum EngineError {
    /// Resolution selection errors
    Selection(SelectionError),
    /// Native graphics API errors
    Graphics(GraphicsError),
    /// Render worker errors
    Worker(WorkerError),
    /// Shader assembly and validation errors
    Shader(ShaderError),
}

/// Resolution selection errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    /// The candidate list was empty
    NoCandidates,
    /// A candidate resolution has a zero dimension
    InvalidCandidate { width: u32, height: u32 },
    /// The reference surface has a zero dimension
    InvalidSurfaceDimensions { width: u32, height: u32 },
}

/// A failed call into the native graphics API
///
/// Carries the name of the primitive that failed and the error flags read
/// back from the API immediately afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphicsError {
    /// Native call that failed (e.g. "choose_config", "swap_buffers")
    pub operation: &'static str,
    /// Error flags captured from the native API at failure time
    pub flags: NativeErrorFlags,
}

impl GraphicsError {
    pub fn new(operation: &'static str, flags: NativeErrorFlags) -> Self {
        Self { operation, flags }
    }
}

/// Render worker errors
#[derive(Debug, Clone)]
pub enum WorkerError {
    /// A submitted task panicked; the worker thread itself survived
    TaskPanicked(String),
    /// The worker thread panicked outside of a task and could not be joined
    ThreadPanicked,
}

/// Shader assembly and cross-stage validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    /// The same variable name was declared with a conflicting qualifier,
    /// type or binding across snippets
    IncoherentVariable { name: String },
    /// A fragment-stage input has no matching vertex-stage output
    MissingStageOutput { name: String },
    /// Vertex output and fragment input disagree on binding location
    BindingMismatch { name: String },
    /// Vertex output and fragment input disagree on type
    TypeMismatch {
        name: String,
        vertex: String,
        fragment: String,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Selection(e) => write!(f, "Selection error: {}", e),
            EngineError::Graphics(e) => write!(f, "Graphics error: {}", e),
            EngineError::Worker(e) => write!(f, "Worker error: {}", e),
            EngineError::Shader(e) => write!(f, "Shader error: {}", e),
        }
    }
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::NoCandidates => write!(f, "No capture resolution available"),
            SelectionError::InvalidCandidate { width, height } => {
                write!(f, "Invalid candidate resolution {}x{}", width, height)
            }
            SelectionError::InvalidSurfaceDimensions { width, height } => {
                write!(f, "Invalid surface dimensions {}x{}", width, height)
            }
        }
    }
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.operation, self.flags)
    }
}

impl fmt::Display for WorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerError::TaskPanicked(msg) => write!(f, "Render task panicked: {}", msg),
            WorkerError::ThreadPanicked => write!(f, "Render worker thread panicked"),
        }
    }
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::IncoherentVariable { name } => {
                write!(f, "Variable '{}' redeclared with a different signature", name)
            }
            ShaderError::MissingStageOutput { name } => {
                write!(f, "Fragment input '{}' has no matching vertex output", name)
            }
            ShaderError::BindingMismatch { name } => {
                write!(f, "Binding mismatch for variable '{}'", name)
            }
            ShaderError::TypeMismatch {
                name,
                vertex,
                fragment,
            } => {
                write!(
                    f,
                    "Type mismatch for '{}': vertex declares {}, fragment declares {}",
                    name, vertex, fragment
                )
            }
        }
    }
}

impl std::error::Error for EngineError {}
impl std::error::Error for SelectionError {}
impl std::error::Error for GraphicsError {}
impl std::error::Error for WorkerError {}
impl std::error::Error for ShaderError {}

// Conversions from sub-errors to EngineError
impl From<SelectionError> for EngineError {
    fn from(err: SelectionError) -> Self {
        EngineError::Selection(err)
    }
}

impl From<GraphicsError> for EngineError {
    fn from(err: GraphicsError) -> Self {
        EngineError::Graphics(err)
    }
}

impl From<WorkerError> for EngineError {
    fn from(err: WorkerError) -> Self {
        EngineError::Worker(err)
    }
}

impl From<ShaderError> for EngineError {
    fn from(err: ShaderError) -> Self {
        EngineError::Shader(err)
    }
}
