//! Forward WebGL2 renderer.
//!
//! WebXR hands us an `XRWebGLLayer` framebuffer each frame, so everything
//! draws through a WebGL2 context rather than wgpu. One program covers both
//! material paths: hemisphere-lit placed objects and the unlit reticle ring.

use ar_core::constants::RETICLE_COLOR;
use ar_core::geometry::{self, MeshData};
use ar_core::state::HemisphereLight;
use ar_core::{ObjectModel, PlacedObject, PlacementSession};
use glam::Mat4;
use std::collections::HashMap;
use wasm_bindgen::JsValue;
use web_sys::{
    WebGl2RenderingContext as Gl, WebGlBuffer, WebGlFramebuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation,
};

const VERTEX_SHADER_SOURCE: &str = r#"#version 300 es
precision highp float;

in vec3 a_position;
in vec3 a_normal;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;

out vec3 v_normal;

void main() {
    // Uniform group scale keeps normals valid up to normalization.
    v_normal = mat3(u_model) * a_normal;
    gl_Position = u_projection * u_view * u_model * vec4(a_position, 1.0);
}
"#;

const FRAGMENT_SHADER_SOURCE: &str = r#"#version 300 es
precision highp float;

in vec3 v_normal;

uniform vec3 u_color;
uniform vec3 u_sky_color;
uniform vec3 u_ground_color;
uniform float u_intensity;
uniform float u_lit;

out vec4 frag_color;

void main() {
    vec3 n = normalize(v_normal);
    float blend = n.y * 0.5 + 0.5;
    vec3 hemi = mix(u_ground_color, u_sky_color, blend) * u_intensity;
    vec3 color = mix(u_color, u_color * hemi, u_lit);
    frag_color = vec4(color, 1.0);
}
"#;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

pub struct GlMesh {
    vertex_buffer: WebGlBuffer,
    index_buffer: WebGlBuffer,
    index_count: i32,
}

pub struct GlState {
    gl: Gl,
    program: WebGlProgram,
    position_attrib: u32,
    normal_attrib: u32,
    u_model: Option<WebGlUniformLocation>,
    u_view: Option<WebGlUniformLocation>,
    u_projection: Option<WebGlUniformLocation>,
    u_color: Option<WebGlUniformLocation>,
    u_sky_color: Option<WebGlUniformLocation>,
    u_ground_color: Option<WebGlUniformLocation>,
    u_intensity: Option<WebGlUniformLocation>,
    u_lit: Option<WebGlUniformLocation>,
    reticle: GlMesh,
    // Uploaded buffers per placed object, keyed by its session index.
    object_meshes: HashMap<usize, Vec<GlMesh>>,
    light: HemisphereLight,
}

impl GlState {
    pub fn new(gl: Gl) -> Result<Self, JsValue> {
        let vertex_shader = compile_shader(&gl, Gl::VERTEX_SHADER, VERTEX_SHADER_SOURCE)?;
        let fragment_shader = compile_shader(&gl, Gl::FRAGMENT_SHADER, FRAGMENT_SHADER_SOURCE)?;

        let program = gl
            .create_program()
            .ok_or_else(|| JsValue::from_str("failed to create program"))?;
        gl.attach_shader(&program, &vertex_shader);
        gl.attach_shader(&program, &fragment_shader);
        gl.link_program(&program);
        if !gl
            .get_program_parameter(&program, Gl::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
        {
            let info = gl
                .get_program_info_log(&program)
                .unwrap_or_else(|| "unknown link error".to_string());
            return Err(JsValue::from_str(&format!("program link failed: {info}")));
        }

        let position_attrib = gl.get_attrib_location(&program, "a_position") as u32;
        let normal_attrib = gl.get_attrib_location(&program, "a_normal") as u32;

        let u_model = gl.get_uniform_location(&program, "u_model");
        let u_view = gl.get_uniform_location(&program, "u_view");
        let u_projection = gl.get_uniform_location(&program, "u_projection");
        let u_color = gl.get_uniform_location(&program, "u_color");
        let u_sky_color = gl.get_uniform_location(&program, "u_sky_color");
        let u_ground_color = gl.get_uniform_location(&program, "u_ground_color");
        let u_intensity = gl.get_uniform_location(&program, "u_intensity");
        let u_lit = gl.get_uniform_location(&program, "u_lit");

        gl.enable(Gl::DEPTH_TEST);

        let reticle = upload_mesh(
            &gl,
            &geometry::ring_mesh(
                ar_core::constants::RETICLE_INNER_RADIUS,
                ar_core::constants::RETICLE_OUTER_RADIUS,
                ar_core::constants::RETICLE_SEGMENTS,
            ),
        )?;

        Ok(Self {
            gl,
            program,
            position_attrib,
            normal_attrib,
            u_model,
            u_view,
            u_projection,
            u_color,
            u_sky_color,
            u_ground_color,
            u_intensity,
            u_lit,
            reticle,
            object_meshes: HashMap::new(),
            light: HemisphereLight::default(),
        })
    }

    /// Upload GPU buffers for every part of a model.
    pub fn upload_model(&self, model: &ObjectModel) -> Result<Vec<GlMesh>, JsValue> {
        let mut meshes = Vec::with_capacity(model.parts.len());
        for part in &model.parts {
            meshes.push(upload_mesh(&self.gl, &part.mesh)?);
        }
        Ok(meshes)
    }

    /// Upload the buffers for a newly placed object. Geometry never changes
    /// after placement, so later frames reuse the cached buffers; colors and
    /// transforms flow through uniforms.
    pub fn ensure_object(&mut self, id: usize, model: &ObjectModel) -> Result<(), JsValue> {
        if self.object_meshes.contains_key(&id) {
            return Ok(());
        }
        let meshes = self.upload_model(model)?;
        self.object_meshes.insert(id, meshes);
        Ok(())
    }

    /// Bind the session's framebuffer and clear to transparent so the camera
    /// image shows through.
    pub fn begin_frame(&self, framebuffer: Option<&WebGlFramebuffer>, width: i32, height: i32) {
        let gl = &self.gl;
        gl.bind_framebuffer(Gl::FRAMEBUFFER, framebuffer);
        gl.viewport(0, 0, width, height);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);
        gl.use_program(Some(&self.program));

        gl.uniform3fv_with_f32_array(self.u_sky_color.as_ref(), &self.light.sky_color);
        gl.uniform3fv_with_f32_array(self.u_ground_color.as_ref(), &self.light.ground_color);
        gl.uniform1f(self.u_intensity.as_ref(), self.light.intensity);
    }

    /// Per-view viewport inside the layer framebuffer.
    pub fn set_viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.gl.viewport(x, y, width, height);
    }

    pub fn set_view_projection(&self, view: &Mat4, projection: &Mat4) {
        let gl = &self.gl;
        gl.uniform_matrix4fv_with_f32_array(
            self.u_view.as_ref(),
            false,
            &view.to_cols_array(),
        );
        gl.uniform_matrix4fv_with_f32_array(
            self.u_projection.as_ref(),
            false,
            &projection.to_cols_array(),
        );
    }

    /// Draw the reticle ring, unlit. Face culling stays disabled globally so
    /// the flat ring reads from both sides.
    pub fn draw_reticle(&self, model: Mat4) {
        self.draw_mesh_internal(&self.reticle, model, RETICLE_COLOR, false);
    }

    /// Draw one object from pre-uploaded part buffers, hemisphere lit.
    pub fn draw_model(&self, meshes: &[GlMesh], object: &PlacedObject) {
        for (part, mesh) in object.model.parts.iter().zip(meshes) {
            self.draw_mesh_internal(mesh, object.part_matrix(part), part.color, true);
        }
    }

    /// Draw every placed object in the session.
    pub fn draw_objects(&self, session: &PlacementSession) {
        for (id, object) in session.objects().iter().enumerate() {
            if let Some(meshes) = self.object_meshes.get(&id) {
                self.draw_model(meshes, object);
            }
        }
    }

    fn draw_mesh_internal(&self, mesh: &GlMesh, model: Mat4, color: [f32; 3], lit: bool) {
        let gl = &self.gl;
        gl.uniform_matrix4fv_with_f32_array(
            self.u_model.as_ref(),
            false,
            &model.to_cols_array(),
        );
        gl.uniform3fv_with_f32_array(self.u_color.as_ref(), &color);
        gl.uniform1f(self.u_lit.as_ref(), if lit { 1.0 } else { 0.0 });

        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&mesh.vertex_buffer));
        let stride = std::mem::size_of::<Vertex>() as i32;
        gl.vertex_attrib_pointer_with_i32(self.position_attrib, 3, Gl::FLOAT, false, stride, 0);
        gl.enable_vertex_attrib_array(self.position_attrib);
        gl.vertex_attrib_pointer_with_i32(self.normal_attrib, 3, Gl::FLOAT, false, stride, 12);
        gl.enable_vertex_attrib_array(self.normal_attrib);

        gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, Some(&mesh.index_buffer));
        gl.draw_elements_with_i32(Gl::TRIANGLES, mesh.index_count, Gl::UNSIGNED_SHORT, 0);
    }
}

fn upload_mesh(gl: &Gl, mesh: &MeshData) -> Result<GlMesh, JsValue> {
    let vertices: Vec<Vertex> = mesh
        .positions
        .iter()
        .zip(&mesh.normals)
        .map(|(position, normal)| Vertex {
            position: *position,
            normal: *normal,
        })
        .collect();

    let vertex_buffer = gl
        .create_buffer()
        .ok_or_else(|| JsValue::from_str("failed to create vertex buffer"))?;
    gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&vertex_buffer));
    let floats: &[f32] = bytemuck::cast_slice(&vertices);
    // View stays alive for the synchronous buffer_data call only; no
    // allocation happens in between.
    unsafe {
        let array = js_sys::Float32Array::view(floats);
        gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &array, Gl::STATIC_DRAW);
    }

    let index_buffer = gl
        .create_buffer()
        .ok_or_else(|| JsValue::from_str("failed to create index buffer"))?;
    gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, Some(&index_buffer));
    unsafe {
        let array = js_sys::Uint16Array::view(&mesh.indices);
        gl.buffer_data_with_array_buffer_view(Gl::ELEMENT_ARRAY_BUFFER, &array, Gl::STATIC_DRAW);
    }

    Ok(GlMesh {
        vertex_buffer,
        index_buffer,
        index_count: mesh.indices.len() as i32,
    })
}

fn compile_shader(gl: &Gl, shader_type: u32, source: &str) -> Result<WebGlShader, JsValue> {
    let shader = gl
        .create_shader(shader_type)
        .ok_or_else(|| JsValue::from_str("failed to create shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if !gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        let info = gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "unknown compile error".to_string());
        return Err(JsValue::from_str(&format!("shader compile failed: {info}")));
    }
    Ok(shader)
}
