// SPDX-License-Identifier: GPL-3.0-only

//! Shader source assembly
//!
//! Shader programs for the preview are composed from [`ShaderSnippet`]s,
//! each contributing variable declarations, optional helper functions and a
//! fragment of the `main` body. [`AssembledShader::assemble`] merges a list
//! of snippets into one translation unit, deduplicating shared variables
//! and rejecting contradictory declarations, so independent effects can be
//! combined without editing each other's source.
//!
//! Assembly is purely textual. Compilation happens elsewhere, against the
//! contexts owned by the graphics layer; what is validated here is source
//! coherence and, via [`validate_stage_interface`], that a vertex and a
//! fragment shader agree on the variables crossing the stage boundary.

pub mod stock;

use crate::errors::ShaderError;
use std::fmt;

/// GLSL type name for a four-component vector
pub const VEC4: &str = "vec4";
/// GLSL type name for a 4x4 matrix
pub const MAT4: &str = "mat4";
/// GLSL type name for an external camera image sampler
pub const SAMPLER_EXTERNAL_OES: &str = "samplerExternalOES";

const VERSION_DIRECTIVE: &str = "#version 310 es\n";
const PRECISION_DIRECTIVE: &str = "precision lowp float;\n";

/// Storage qualifier of a shader variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageQualifier {
    /// Local to the shader, no qualifier keyword
    None,
    Constant,
    Input,
    InputCentroid,
    Output,
    OutputCentroid,
    InputOutput,
    Uniform,
    FlatInput,
    FlatOutput,
    FlatInputOutput,
}

impl StorageQualifier {
    /// Whether variables with this qualifier are read from the prior stage
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            StorageQualifier::Input
                | StorageQualifier::InputCentroid
                | StorageQualifier::InputOutput
                | StorageQualifier::FlatInput
                | StorageQualifier::FlatInputOutput
        )
    }

    /// Whether variables with this qualifier feed the next stage
    pub fn is_output(&self) -> bool {
        matches!(
            self,
            StorageQualifier::Output
                | StorageQualifier::OutputCentroid
                | StorageQualifier::InputOutput
                | StorageQualifier::FlatOutput
                | StorageQualifier::FlatInputOutput
        )
    }

    fn keyword(&self) -> &'static str {
        match self {
            StorageQualifier::None => "",
            StorageQualifier::Constant => "const",
            StorageQualifier::Input => "in",
            StorageQualifier::InputCentroid => "centroid in",
            StorageQualifier::Output => "out",
            StorageQualifier::OutputCentroid => "centroid out",
            StorageQualifier::InputOutput => "inout",
            StorageQualifier::Uniform => "uniform",
            StorageQualifier::FlatInput => "flat in",
            StorageQualifier::FlatOutput => "flat out",
            StorageQualifier::FlatInputOutput => "flat inout",
        }
    }
}

impl fmt::Display for StorageQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One typed, qualified shader variable
///
/// Displays as its bare name, so snippet bodies can be built with ordinary
/// string formatting and stay in sync with the declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderVariable {
    pub name: String,
    pub qualifier: StorageQualifier,
    pub ty: String,
    /// Attribute binding slot, for variables fed from vertex buffers
    pub binding: Option<u32>,
}

impl ShaderVariable {
    pub fn new(name: impl Into<String>, qualifier: StorageQualifier, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qualifier,
            ty: ty.into(),
            binding: None,
        }
    }

    pub fn with_binding(
        name: impl Into<String>,
        qualifier: StorageQualifier,
        ty: impl Into<String>,
        binding: u32,
    ) -> Self {
        Self {
            name: name.into(),
            qualifier,
            ty: ty.into(),
            binding: Some(binding),
        }
    }

    /// The declaration statement emitted into the assembled source
    pub fn declaration(&self) -> String {
        let keyword = self.qualifier.keyword();
        if keyword.is_empty() {
            format!("{} {};", self.ty, self.name)
        } else {
            format!("{} {} {};", keyword, self.ty, self.name)
        }
    }

    fn agrees_with(&self, other: &ShaderVariable) -> bool {
        self.qualifier == other.qualifier && self.ty == other.ty && self.binding == other.binding
    }
}

impl fmt::Display for ShaderVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Contribution of one effect to an assembled shader
#[derive(Debug, Clone, Default)]
pub struct ShaderSnippet {
    /// Variables this snippet declares or shares with other snippets
    pub variables: Vec<ShaderVariable>,
    /// Preprocessor lines emitted after the version directive, deduplicated
    pub header_lines: Vec<String>,
    /// Helper functions emitted before `main`
    pub functions: Vec<String>,
    /// Statements appended to the `main` body
    pub body: String,
}

impl ShaderSnippet {
    pub fn new(variables: Vec<ShaderVariable>, body: impl Into<String>) -> Self {
        Self {
            variables,
            header_lines: Vec::new(),
            functions: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header_line(mut self, line: impl Into<String>) -> Self {
        self.header_lines.push(line.into());
        self
    }

    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.functions.push(function.into());
        self
    }
}

/// Complete shader source assembled from snippets
#[derive(Debug, Clone)]
pub struct AssembledShader {
    code: String,
    variables: Vec<ShaderVariable>,
}

impl AssembledShader {
    /// Merge snippets into one shader translation unit
    ///
    /// Variables are deduplicated by name across snippets. Two snippets may
    /// share a variable only if they agree on qualifier, type and binding;
    /// a contradiction fails the whole assembly. Emission order is fixed:
    /// version directive, deduplicated header lines, precision directive,
    /// declarations in first-appearance order, helper functions, then the
    /// snippet bodies concatenated inside `main` in snippet order.
    pub fn assemble(snippets: &[ShaderSnippet]) -> Result<Self, ShaderError> {
        let mut variables: Vec<ShaderVariable> = Vec::new();
        for snippet in snippets {
            for variable in &snippet.variables {
                match variables.iter().find(|known| known.name == variable.name) {
                    Some(known) => {
                        if !known.agrees_with(variable) {
                            return Err(ShaderError::IncoherentVariable {
                                name: variable.name.clone(),
                            });
                        }
                    }
                    None => variables.push(variable.clone()),
                }
            }
        }

        let mut code = String::from(VERSION_DIRECTIVE);

        let mut seen_headers: Vec<&str> = Vec::new();
        for snippet in snippets {
            for line in &snippet.header_lines {
                if !seen_headers.contains(&line.as_str()) {
                    seen_headers.push(line);
                    code.push_str(line);
                    code.push('\n');
                }
            }
        }

        code.push_str(PRECISION_DIRECTIVE);

        for variable in &variables {
            code.push_str(&variable.declaration());
            code.push('\n');
        }

        for snippet in snippets {
            for function in &snippet.functions {
                code.push_str(function);
                code.push('\n');
            }
        }

        code.push_str("void main(void)\n{\n");
        for snippet in snippets {
            code.push_str(&snippet.body);
            if !snippet.body.ends_with('\n') {
                code.push('\n');
            }
        }
        code.push_str("}\n");

        Ok(Self { code, variables })
    }

    /// The assembled GLSL source
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Deduplicated variables, in first-appearance order
    pub fn variables(&self) -> &[ShaderVariable] {
        &self.variables
    }
}

/// Check that a vertex and a fragment shader agree across the stage boundary
///
/// Every fragment-stage input must be fed by a vertex-stage output of the
/// same name, with matching binding and type. Vertex outputs nothing reads
/// are fine; the rasterizer simply drops them.
pub fn validate_stage_interface(
    vertex: &AssembledShader,
    fragment: &AssembledShader,
) -> Result<(), ShaderError> {
    for input in fragment.variables().iter().filter(|v| v.qualifier.is_input()) {
        let Some(output) = vertex
            .variables()
            .iter()
            .find(|v| v.name == input.name && v.qualifier.is_output())
        else {
            return Err(ShaderError::MissingStageOutput {
                name: input.name.clone(),
            });
        };
        if output.binding != input.binding {
            return Err(ShaderError::BindingMismatch {
                name: input.name.clone(),
            });
        }
        if output.ty != input.ty {
            return Err(ShaderError::TypeMismatch {
                name: input.name.clone(),
                vertex: output.ty.clone(),
                fragment: input.ty.clone(),
            });
        }
    }
    Ok(())
}
