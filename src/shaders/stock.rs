// SPDX-License-Identifier: GPL-3.0-only

//! Stock shader snippets
//!
//! Ready-made snippets for the common preview programs: positioning
//! vertices, coloring fragments and sampling the external camera texture.
//! Vertex-buffer-fed variables take their binding slot from
//! [`ShaderAttribute`], so stock snippets can be combined freely without
//! rebinding buffers between programs.

use super::{
    ShaderSnippet, ShaderVariable, StorageQualifier, MAT4, SAMPLER_EXTERNAL_OES, VEC4,
};

/// Vertex attribute slots shared by all stock shaders
///
/// Each attribute's binding is its position in the enum. Custom shaders can
/// coexist with stock ones by starting their own bindings at
/// [`ShaderAttribute::COUNT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderAttribute {
    Vertex,
    Color,
    Normal,
    TexCoord,
}

impl ShaderAttribute {
    /// Number of reserved stock attribute slots
    pub const COUNT: u32 = 4;

    /// GLSL variable name for this attribute
    pub fn variable_name(&self) -> &'static str {
        match self {
            ShaderAttribute::Vertex => "v4Vertex",
            ShaderAttribute::Color => "v4Color",
            ShaderAttribute::Normal => "v4Normal",
            ShaderAttribute::TexCoord => "v4TexCoord",
        }
    }

    /// Attribute binding slot
    pub fn binding(&self) -> u32 {
        *self as u32
    }

    /// The variable declaration for this attribute
    pub fn variable(&self) -> ShaderVariable {
        ShaderVariable::with_binding(
            self.variable_name(),
            StorageQualifier::Input,
            VEC4,
            self.binding(),
        )
    }
}

/// `uniform mat4 m4Transform`, the model-view-projection matrix
pub fn transform_uniform() -> ShaderVariable {
    ShaderVariable::new("m4Transform", StorageQualifier::Uniform, MAT4)
}

/// `uniform vec4 v4UniformColor`, one color for the whole primitive
pub fn uniform_color() -> ShaderVariable {
    ShaderVariable::new("v4UniformColor", StorageQualifier::Uniform, VEC4)
}

/// `v4VaryingColor` as written by the vertex stage
pub fn varying_color_output() -> ShaderVariable {
    ShaderVariable::new("v4VaryingColor", StorageQualifier::Output, VEC4)
}

/// `v4VaryingColor` as read by the fragment stage
pub fn varying_color_input() -> ShaderVariable {
    ShaderVariable::new("v4VaryingColor", StorageQualifier::Input, VEC4)
}

/// `v4VaryingTexCoord` as written by the vertex stage
pub fn varying_texcoord_output() -> ShaderVariable {
    ShaderVariable::new("v4VaryingTexCoord", StorageQualifier::Output, VEC4)
}

/// `v4VaryingTexCoord` as read by the fragment stage
pub fn varying_texcoord_input() -> ShaderVariable {
    ShaderVariable::new("v4VaryingTexCoord", StorageQualifier::Input, VEC4)
}

/// `out vec4 v4FragColor`, the fragment stage's color output
pub fn fragment_color_output() -> ShaderVariable {
    ShaderVariable::new("v4FragColor", StorageQualifier::Output, VEC4)
}

/// `uniform samplerExternalOES sPreviewTexture`, the live camera image
pub fn preview_texture_uniform() -> ShaderVariable {
    ShaderVariable::new("sPreviewTexture", StorageQualifier::Uniform, SAMPLER_EXTERNAL_OES)
}

/// Vertex stage: forward positions untransformed
pub fn identity_position_vertex() -> ShaderSnippet {
    let vertex = ShaderAttribute::Vertex.variable();
    let body = format!("gl_Position = {vertex};");
    ShaderSnippet::new(vec![vertex], body)
}

/// Vertex stage: transform positions by the model-view-projection uniform
pub fn transformed_position_vertex() -> ShaderSnippet {
    let vertex = ShaderAttribute::Vertex.variable();
    let transform = transform_uniform();
    let body = format!("gl_Position = {transform} * {vertex};");
    ShaderSnippet::new(vec![vertex, transform], body)
}

/// Vertex stage: apply one uniform color to every vertex
pub fn uniform_color_vertex() -> ShaderSnippet {
    let color = uniform_color();
    let varying = varying_color_output();
    let body = format!("{varying} = {color};");
    ShaderSnippet::new(vec![color, varying], body)
}

/// Vertex stage: pass per-vertex colors through for interpolation
pub fn interpolated_color_vertex() -> ShaderSnippet {
    let color = ShaderAttribute::Color.variable();
    let varying = varying_color_output();
    let body = format!("{varying} = {color};");
    ShaderSnippet::new(vec![color, varying], body)
}

/// Vertex stage: pass texture coordinates through for interpolation
pub fn texcoord_vertex() -> ShaderSnippet {
    let texcoord = ShaderAttribute::TexCoord.variable();
    let varying = varying_texcoord_output();
    let body = format!("{varying} = {texcoord};");
    ShaderSnippet::new(vec![texcoord, varying], body)
}

/// Fragment stage: rasterize the interpolated vertex color
pub fn varying_color_fragment() -> ShaderSnippet {
    let varying = varying_color_input();
    let fragment = fragment_color_output();
    let body = format!("{fragment} = {varying};");
    ShaderSnippet::new(vec![varying, fragment], body)
}

/// Fragment stage: sample the external camera texture
///
/// External image sampling needs its extension enabled, which rides along
/// as a header line and survives combination with other snippets.
pub fn preview_texture_fragment() -> ShaderSnippet {
    let varying = varying_texcoord_input();
    let sampler = preview_texture_uniform();
    let fragment = fragment_color_output();
    let body = format!("{fragment} = texture({sampler}, {varying}.st);");
    ShaderSnippet::new(vec![varying, sampler, fragment], body)
        .with_header_line("#extension GL_OES_EGL_image_external_essl3 : require")
}
