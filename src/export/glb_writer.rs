use std::borrow::Cow;
use std::collections::BTreeMap;

use gltf::binary::Glb;
use gltf_json::Index;
use gltf_json::accessor::{ComponentType, GenericComponentType, Type as AccessorType};
use gltf_json::buffer::Target;
use gltf_json::mesh::{Mode, Primitive, Semantic};
use gltf_json::validation::{Checked, USize64};

use crate::error::{Result, RibbonError};
use crate::types::{BuiltRibbon, RibbonGeometry, RibbonMaterial, TextureData};

const GENERATOR: &str = "ribbon-strip";

/// Serialize built ribbons into a binary GLB (glTF 2.0) byte buffer.
///
/// Produces a valid, self-contained GLB with:
/// - 1 buffer (every ribbon's positions, normals, UVs and indices + optional texture)
/// - per non-empty ribbon: 1 Mesh with 1 Primitive (mode = TRIANGLE_STRIP)
///   and 1 Node carrying the stroke anchor as its matrix
/// - 1 shared double-sided Material, textured when `material.texture` is set,
///   with REPEAT wrapping so U can run past 1.0 along the ribbon
///
/// Indices use u16 when a ribbon's vertex count fits, else u32. Ribbons
/// that form no triangle (fewer than two cross-sections) are skipped: glTF
/// forbids zero-count accessors and a strip needs at least three indices. If
/// none remain, a minimal empty scene is written.
pub fn write_glb(ribbons: &[BuiltRibbon], material: &RibbonMaterial) -> Result<Vec<u8>> {
    let drawable: Vec<&BuiltRibbon> = ribbons
        .iter()
        .filter(|r| r.geometry.triangle_count() > 0)
        .collect();
    if drawable.is_empty() {
        return write_empty_glb();
    }

    let mut root = new_root();
    let mut bin_data: Vec<u8> = Vec::new();
    let buffer_idx = Index::new(0); // pushed at the end

    let texture_index = material
        .texture
        .as_ref()
        .map(|tex| push_texture(&mut root, &mut bin_data, buffer_idx, tex));
    let material_index = push_material(&mut root, material, texture_index);

    let mut nodes = Vec::with_capacity(drawable.len());
    for ribbon in drawable {
        let primitive = push_strip_primitive(
            &mut root,
            &mut bin_data,
            buffer_idx,
            &ribbon.geometry,
            material_index,
        );

        let mesh_idx = root.push(gltf_json::Mesh {
            primitives: vec![primitive],
            weights: None,
            name: Some(ribbon.name.clone()),
            extensions: Default::default(),
            extras: Default::default(),
        });

        let matrix = (!ribbon.anchor.is_identity()).then(|| ribbon.anchor.to_cols_array());
        nodes.push(root.push(gltf_json::Node {
            mesh: Some(mesh_idx),
            name: Some(ribbon.name.clone()),
            matrix,
            ..Default::default()
        }));
    }

    let scene_idx = root.push(gltf_json::Scene {
        nodes,
        name: None,
        extensions: Default::default(),
        extras: Default::default(),
    });
    root.scene = Some(scene_idx);

    // --- Buffer (the one buffer holding all data) ---
    pad_to_four(&mut bin_data, 0);
    root.push(gltf_json::Buffer {
        byte_length: USize64::from(bin_data.len()),
        uri: None,
        name: None,
        extensions: Default::default(),
        extras: Default::default(),
    });

    assemble_glb(&root, Some(bin_data))
}

/// Produce a minimal valid empty GLB.
fn write_empty_glb() -> Result<Vec<u8>> {
    let mut root = new_root();
    let node_idx = root.push(gltf_json::Node::default());
    let scene_idx = root.push(gltf_json::Scene {
        nodes: vec![node_idx],
        name: None,
        extensions: Default::default(),
        extras: Default::default(),
    });
    root.scene = Some(scene_idx);

    assemble_glb(&root, None)
}

fn new_root() -> gltf_json::Root {
    gltf_json::Root {
        asset: gltf_json::Asset {
            version: "2.0".into(),
            generator: Some(GENERATOR.into()),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn assemble_glb(root: &gltf_json::Root, bin_data: Option<Vec<u8>>) -> Result<Vec<u8>> {
    let json_string = gltf_json::serialize::to_string(root)
        .map_err(|e| RibbonError::Output(format!("glTF JSON serialization failed: {e}")))?;
    let mut json_bytes = json_string.into_bytes();
    // Pad JSON to 4-byte alignment with spaces (per GLB spec)
    pad_to_four(&mut json_bytes, b' ');

    let bin_chunk = bin_data.as_ref().map_or(0, |bin| 8 + bin.len());
    let glb = Glb {
        header: gltf::binary::Header {
            magic: *b"glTF",
            version: 2,
            length: (12 + 8 + json_bytes.len() + bin_chunk) as u32,
        },
        json: Cow::Owned(json_bytes),
        bin: bin_data.map(Cow::Owned),
    };

    glb.to_vec()
        .map_err(|e| RibbonError::Output(format!("GLB serialization failed: {e}")))
}

fn pad_to_four(bytes: &mut Vec<u8>, fill: u8) {
    while bytes.len() % 4 != 0 {
        bytes.push(fill);
    }
}

/// Write the four strip buffers of one ribbon and return its primitive.
fn push_strip_primitive(
    root: &mut gltf_json::Root,
    bin_data: &mut Vec<u8>,
    buffer_idx: Index<gltf_json::Buffer>,
    geometry: &RibbonGeometry,
    material: Index<gltf_json::Material>,
) -> Primitive {
    let vertex_count = geometry.vertex_count();
    let mut attributes = BTreeMap::new();

    // --- Positions ---
    let (pos_min, pos_max) = compute_position_bounds(&geometry.positions);
    let view = push_view(
        root,
        bin_data,
        buffer_idx,
        bytemuck::cast_slice(&geometry.positions),
        Target::ArrayBuffer,
    );
    let accessor = push_accessor(
        root,
        view,
        vertex_count,
        ComponentType::F32,
        AccessorType::Vec3,
        Some((serde_json::json!(pos_min), serde_json::json!(pos_max))),
    );
    attributes.insert(Checked::Valid(Semantic::Positions), accessor);

    // --- Normals ---
    let view = push_view(
        root,
        bin_data,
        buffer_idx,
        bytemuck::cast_slice(&geometry.normals),
        Target::ArrayBuffer,
    );
    let accessor = push_accessor(
        root,
        view,
        vertex_count,
        ComponentType::F32,
        AccessorType::Vec3,
        None,
    );
    attributes.insert(Checked::Valid(Semantic::Normals), accessor);

    // --- UVs ---
    let view = push_view(
        root,
        bin_data,
        buffer_idx,
        bytemuck::cast_slice(&geometry.uvs),
        Target::ArrayBuffer,
    );
    let accessor = push_accessor(
        root,
        view,
        vertex_count,
        ComponentType::F32,
        AccessorType::Vec2,
        None,
    );
    attributes.insert(Checked::Valid(Semantic::TexCoords(0)), accessor);

    // --- Indices (u16 when vertex_count <= 65535, else u32) ---
    let use_u16_indices = vertex_count <= 65535;
    let (index_bytes, index_component) = if use_u16_indices {
        let idx_u16: Vec<u16> = geometry.indices.iter().map(|&i| i as u16).collect();
        (
            bytemuck::cast_slice::<u16, u8>(&idx_u16).to_vec(),
            ComponentType::U16,
        )
    } else {
        (
            bytemuck::cast_slice::<u32, u8>(&geometry.indices).to_vec(),
            ComponentType::U32,
        )
    };
    let view = push_view(
        root,
        bin_data,
        buffer_idx,
        &index_bytes,
        Target::ElementArrayBuffer,
    );
    let indices = push_accessor(
        root,
        view,
        geometry.indices.len(),
        index_component,
        AccessorType::Scalar,
        None,
    );

    Primitive {
        attributes,
        indices: Some(indices),
        material: Some(material),
        mode: Checked::Valid(Mode::TriangleStrip),
        targets: None,
        extensions: Default::default(),
        extras: Default::default(),
    }
}

/// Append `raw_bytes` (4-byte aligned) and return its buffer view.
fn push_view(
    root: &mut gltf_json::Root,
    bin_data: &mut Vec<u8>,
    buffer_idx: Index<gltf_json::Buffer>,
    raw_bytes: &[u8],
    target: Target,
) -> Index<gltf_json::buffer::View> {
    pad_to_four(bin_data, 0);
    let byte_offset = bin_data.len();
    bin_data.extend_from_slice(raw_bytes);

    root.push(gltf_json::buffer::View {
        buffer: buffer_idx,
        byte_length: USize64::from(raw_bytes.len()),
        byte_offset: Some(USize64::from(byte_offset)),
        byte_stride: None,
        name: None,
        target: Some(Checked::Valid(target)),
        extensions: Default::default(),
        extras: Default::default(),
    })
}

fn push_accessor(
    root: &mut gltf_json::Root,
    view: Index<gltf_json::buffer::View>,
    count: usize,
    component_type: ComponentType,
    type_: AccessorType,
    bounds: Option<(serde_json::Value, serde_json::Value)>,
) -> Index<gltf_json::Accessor> {
    let (min, max) = match bounds {
        Some((min, max)) => (Some(min), Some(max)),
        None => (None, None),
    };
    root.push(gltf_json::Accessor {
        buffer_view: Some(view),
        byte_offset: Some(USize64(0)),
        count: USize64::from(count),
        component_type: Checked::Valid(GenericComponentType(component_type)),
        type_: Checked::Valid(type_),
        min,
        max,
        name: None,
        normalized: false,
        sparse: None,
        extensions: Default::default(),
        extras: Default::default(),
    })
}

/// Embed the texture image with a repeating sampler.
fn push_texture(
    root: &mut gltf_json::Root,
    bin_data: &mut Vec<u8>,
    buffer_idx: Index<gltf_json::Buffer>,
    tex: &TextureData,
) -> Index<gltf_json::Texture> {
    pad_to_four(bin_data, 0);
    let tex_byte_offset = bin_data.len();
    bin_data.extend_from_slice(&tex.data);

    let tex_view = root.push(gltf_json::buffer::View {
        buffer: buffer_idx,
        byte_length: USize64::from(tex.data.len()),
        byte_offset: Some(USize64::from(tex_byte_offset)),
        byte_stride: None,
        name: None,
        target: None, // no target for image buffer views
        extensions: Default::default(),
        extras: Default::default(),
    });

    let image_idx = root.push(gltf_json::Image {
        buffer_view: Some(tex_view),
        mime_type: Some(gltf_json::image::MimeType(tex.mime_type.clone())),
        uri: None,
        name: None,
        extensions: Default::default(),
        extras: Default::default(),
    });

    let sampler_idx = root.push(gltf_json::texture::Sampler {
        mag_filter: Some(Checked::Valid(gltf_json::texture::MagFilter::Linear)),
        min_filter: Some(Checked::Valid(
            gltf_json::texture::MinFilter::LinearMipmapLinear,
        )),
        wrap_s: Checked::Valid(gltf_json::texture::WrappingMode::Repeat),
        wrap_t: Checked::Valid(gltf_json::texture::WrappingMode::Repeat),
        name: None,
        extensions: Default::default(),
        extras: Default::default(),
    });

    root.push(gltf_json::Texture {
        sampler: Some(sampler_idx),
        source: image_idx,
        name: None,
        extensions: Default::default(),
        extras: Default::default(),
    })
}

fn push_material(
    root: &mut gltf_json::Root,
    material: &RibbonMaterial,
    texture_index: Option<Index<gltf_json::Texture>>,
) -> Index<gltf_json::Material> {
    let base_color_texture = texture_index.map(|idx| gltf_json::texture::Info {
        index: idx,
        tex_coord: 0,
        extensions: Default::default(),
        extras: Default::default(),
    });

    let pbr = gltf_json::material::PbrMetallicRoughness {
        base_color_factor: gltf_json::material::PbrBaseColorFactor(material.base_color),
        metallic_factor: gltf_json::material::StrengthFactor(0.0),
        roughness_factor: gltf_json::material::StrengthFactor(1.0),
        base_color_texture,
        metallic_roughness_texture: None,
        extensions: Default::default(),
        extras: Default::default(),
    };

    let alpha_mode = if material.base_color[3] < 1.0 {
        gltf_json::material::AlphaMode::Blend
    } else {
        gltf_json::material::AlphaMode::Opaque
    };

    root.push(gltf_json::Material {
        pbr_metallic_roughness: pbr,
        alpha_mode: Checked::Valid(alpha_mode),
        alpha_cutoff: None,
        double_sided: true,
        normal_texture: None,
        occlusion_texture: None,
        emissive_texture: None,
        emissive_factor: gltf_json::material::EmissiveFactor([0.0, 0.0, 0.0]),
        name: Some("ribbon".into()),
        extensions: Default::default(),
        extras: Default::default(),
    })
}

/// Compute min/max for a flat positions array (stride 3).
fn compute_position_bounds(positions: &[f32]) -> ([f32; 3], [f32; 3]) {
    let mut min = [f32::INFINITY; 3];
    let mut max = [f32::NEG_INFINITY; 3];

    for chunk in positions.chunks_exact(3) {
        for i in 0..3 {
            min[i] = min[i].min(chunk[i]);
            max[i] = max[i].max(chunk[i]);
        }
    }

    (min, max)
}
