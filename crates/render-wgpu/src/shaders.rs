use lumen_assets::{BlendMode, ShaderKind, ShaderSource};
use lumen_render::PipelineShaders;

/// WGSL shader for textured sprites in the color and normal passes.
pub const SPRITE_SHADER: &str = r#"
struct MeshUniforms {
    model: mat4x4<f32>,
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: MeshUniforms;
@group(0) @binding(1)
var tex_sampler: sampler;
@group(0) @binding(2)
var tex: texture_2d<f32>;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = uniforms.projection * uniforms.view * uniforms.model
        * vec4<f32>(vertex.position, 1.0);
    out.uv = vec2<f32>(vertex.uv.x, 1.0 - vertex.uv.y);
    return out;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let color = textureSample(tex, tex_sampler, input.uv);
    if (color.a < 0.01) {
        discard;
    }
    return color;
}
"#;

/// Shared declarations of every full-screen pass. `lights` must match
/// `GpuLight` and `MAX_LIGHTS` on the Rust side.
const FULLSCREEN_PRELUDE: &str = r#"
struct GpuLight {
    position: vec2<f32>,
    kind: u32,
    intensity: f32,
    color: vec3<f32>,
    radial_falloff: f32,
    volumetric_intensity: f32,
    pad0: f32,
    pad1: f32,
    pad2: f32,
};

struct PassUniforms {
    // x: light count, y: 1 for a horizontal blur
    params: vec4<u32>,
    // xy: size of one input texel in uv units
    texel: vec4<f32>,
    lights: array<GpuLight, 32>,
};

@group(0) @binding(0)
var<uniform> pass_data: PassUniforms;
@group(0) @binding(1)
var tex_sampler: sampler;
@group(0) @binding(2)
var input0: texture_2d<f32>;
@group(0) @binding(3)
var input1: texture_2d<f32>;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) uv: vec2<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = vec4<f32>(position.xy, 0.0, 1.0);
    out.uv = vec2<f32>(position.x * 0.5 + 0.5, 0.5 - position.y * 0.5);
    return out;
}
"#;

/// Deferred lighting: color in `input0`, normals in `input1`.
const DEFERRED_FRAGMENT: &str = r#"
@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let albedo = textureSample(input0, tex_sampler, input.uv);
    let normal_sample = textureSample(input1, tex_sampler, input.uv);
    let has_normal = normal_sample.a > 0.0;
    let normal = normalize(normal_sample.xyz * 2.0 - 1.0);

    // Light positions are bottom-left origin.
    let screen = vec2<f32>(input.uv.x, 1.0 - input.uv.y);
    let aspect = pass_data.texel.y / pass_data.texel.x;

    var light = vec3<f32>(0.0, 0.0, 0.0);
    let count = min(pass_data.params.x, 32u);
    for (var i = 0u; i < count; i = i + 1u) {
        let l = pass_data.lights[i];
        if (l.kind == 0u) {
            light = light + l.color * l.intensity;
            continue;
        }
        var delta = l.position - screen;
        delta.x = delta.x * aspect;
        let dist = length(delta);
        let attenuation = 1.0 / (1.0 + l.radial_falloff * dist * dist * 100.0);
        var diffuse = 1.0;
        if (has_normal) {
            let dir = normalize(vec3<f32>(delta, 0.1));
            diffuse = max(dot(normal, dir), 0.0);
        }
        light = light + l.color * l.intensity * attenuation * diffuse;
        light = light + l.color * l.volumetric_intensity * attenuation;
    }
    return vec4<f32>(albedo.rgb * light, albedo.a);
}
"#;

/// Keeps only pixels brighter than 1.0.
const BRIGHT_FRAGMENT: &str = r#"
@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let color = textureSample(input0, tex_sampler, input.uv);
    let luminance = dot(color.rgb, vec3<f32>(0.2126, 0.7152, 0.0722));
    if (luminance > 1.0) {
        return vec4<f32>(color.rgb, 1.0);
    }
    return vec4<f32>(0.0, 0.0, 0.0, 1.0);
}
"#;

/// Nine-tap separable gaussian.
const BLUR_FRAGMENT: &str = r#"
@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    var weights = array<f32, 5>(0.227027, 0.1945946, 0.1216216, 0.054054, 0.016216);
    var direction = vec2<f32>(0.0, pass_data.texel.y);
    if (pass_data.params.y == 1u) {
        direction = vec2<f32>(pass_data.texel.x, 0.0);
    }
    var result = textureSample(input0, tex_sampler, input.uv).rgb * weights[0];
    for (var i = 1; i < 5; i = i + 1) {
        let offset = direction * f32(i);
        result = result + textureSample(input0, tex_sampler, input.uv + offset).rgb * weights[i];
        result = result + textureSample(input0, tex_sampler, input.uv - offset).rgb * weights[i];
    }
    return vec4<f32>(result, 1.0);
}
"#;

/// Adds the blurred highlights onto the target; blending does the sum.
const COMBINE_FRAGMENT: &str = r#"
@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(textureSample(input0, tex_sampler, input.uv).rgb, 0.0);
}
"#;

/// Reinhard tone mapping onto the screen.
const SCREEN_FRAGMENT: &str = r#"
@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let hdr = textureSample(input0, tex_sampler, input.uv).rgb;
    return vec4<f32>(hdr / (hdr + vec3<f32>(1.0)), 1.0);
}
"#;

fn fullscreen(label: &str, fragment: &str, blend: BlendMode) -> ShaderSource {
    ShaderSource {
        label: label.to_string(),
        wgsl: format!("{FULLSCREEN_PRELUDE}{fragment}"),
        kind: ShaderKind::Fullscreen,
        blend,
    }
}

/// WGSL sources for every built-in shader.
pub fn pipeline_shaders() -> PipelineShaders {
    PipelineShaders {
        sprite: ShaderSource {
            label: "sprite".to_string(),
            wgsl: SPRITE_SHADER.to_string(),
            kind: ShaderKind::Mesh,
            blend: BlendMode::Alpha,
        },
        deferred: fullscreen("deferred", DEFERRED_FRAGMENT, BlendMode::Replace),
        bright: fullscreen("bloom_bright", BRIGHT_FRAGMENT, BlendMode::Replace),
        blur: fullscreen("bloom_blur", BLUR_FRAGMENT, BlendMode::Replace),
        combine: fullscreen("bloom_combine", COMBINE_FRAGMENT, BlendMode::Additive),
        screen: fullscreen("screen", SCREEN_FRAGMENT, BlendMode::Replace),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shader_has_both_entry_points() {
        let shaders = pipeline_shaders();
        for source in [
            &shaders.sprite,
            &shaders.deferred,
            &shaders.bright,
            &shaders.blur,
            &shaders.combine,
            &shaders.screen,
        ] {
            assert!(source.wgsl.contains("fn vs_main"), "{}", source.label);
            assert!(source.wgsl.contains("fn fs_main"), "{}", source.label);
        }
    }

    #[test]
    fn labels_are_unique() {
        let s = pipeline_shaders();
        let mut labels = vec![
            s.sprite.label,
            s.deferred.label,
            s.bright.label,
            s.blur.label,
            s.combine.label,
            s.screen.label,
        ];
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), 6);
    }

    #[test]
    fn only_combine_is_additive() {
        let s = pipeline_shaders();
        assert_eq!(s.combine.blend, BlendMode::Additive);
        assert_eq!(s.deferred.blend, BlendMode::Replace);
    }
}
