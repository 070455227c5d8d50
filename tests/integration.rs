//! End-to-end integration tests.
//!
//! These tests write synthetic pose streams, run the full pipeline,
//! and validate the exported GLB and JSON dump.

use std::fs;
use std::path::Path;

use approx::assert_relative_eq;
use gltf::mesh::Mode;

use ribbon_strip::config::{MaterialConfig, PipelineConfig, RibbonConfig};
use ribbon_strip::Pipeline;

/// Column-major pose with identity rotation translated to `(x, y, z)`.
fn translation(x: f32, y: f32, z: f32) -> String {
    format!("[1,0,0,0, 0,1,0,0, 0,0,1,0, {x},{y},{z},1]")
}

/// Two strokes along +X separated by a blank line, with a comment header.
fn write_jsonl(dir: &Path) -> std::path::PathBuf {
    let mut content = String::from("# recorded at 15 Hz\n");
    for i in 0..5 {
        content.push_str(&translation(i as f32 * 0.5, 0.0, 0.0));
        content.push('\n');
    }
    content.push('\n');
    for i in 0..3 {
        content.push_str(&format!(
            "{{\"matrix\": {}}}\n",
            translation(i as f32, 2.0, 0.0)
        ));
    }
    let path = dir.join("session.jsonl");
    fs::write(&path, content).unwrap();
    path
}

fn unsmoothed() -> RibbonConfig {
    RibbonConfig {
        smoothing_factor: 1.0,
        ..Default::default()
    }
}

#[test]
fn full_pipeline_jsonl_to_glb() {
    let tmp = tempfile::tempdir().unwrap();
    let input = write_jsonl(tmp.path());
    let output = tmp.path().join("out").join("session.glb");

    let config = PipelineConfig {
        input,
        output: output.clone(),
        ribbon: unsmoothed(),
        ..Default::default()
    };

    let result = Pipeline::run(&config).expect("pipeline should succeed");
    assert_eq!(result.stroke_count, 2);
    assert_eq!(result.vertex_count, 16);
    assert_relative_eq!(result.total_length, 4.0, epsilon = 1e-6);
    assert_eq!(result.glb_path.as_deref(), Some(output.as_path()));
    assert!(result.json_path.is_none());
    assert!(output.exists(), "GLB should exist");

    let (doc, buffers, _) = gltf::import(&output).expect("GLB should import");
    assert_eq!(doc.meshes().count(), 2);
    assert_eq!(doc.nodes().count(), 2);

    let mesh = doc.meshes().next().unwrap();
    assert_eq!(mesh.name(), Some("stroke_000"));
    let primitive = mesh.primitives().next().unwrap();
    assert_eq!(primitive.mode(), Mode::TriangleStrip);

    let reader = primitive.reader(|b| Some(&buffers[b.index()]));
    let positions: Vec<[f32; 3]> = reader.read_positions().unwrap().collect();
    assert_eq!(positions.len(), 10);
    // Top edge sits half the default width above the centerline.
    assert_relative_eq!(positions[0][1], 0.1, epsilon = 1e-6);
    assert_relative_eq!(positions[1][1], -0.1, epsilon = 1e-6);

    let indices: Vec<u32> = reader.read_indices().unwrap().into_u32().collect();
    assert_eq!(indices, (0..10).collect::<Vec<u32>>());

    let uvs: Vec<[f32; 2]> = reader.read_tex_coords(0).unwrap().into_f32().collect();
    assert_relative_eq!(uvs[8][0], 2.0, epsilon = 1e-6);
    assert_eq!(uvs[8][1], 0.0);
    assert_eq!(uvs[9][1], 1.0);

    let material = primitive.material();
    assert!(material.double_sided());
}

#[test]
fn anchored_strokes_carry_node_matrix() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("strokes.json");
    let anchor = translation(10.0, 0.0, -5.0);
    let poses: Vec<String> = (0..4)
        .map(|i| translation(10.0 + i as f32, 0.0, -5.0))
        .collect();
    fs::write(
        &input,
        format!(
            r#"{{"strokes": [
                {{"name": "anchored", "anchor": {anchor}, "width": 0.5, "poses": [{}]}},
                {{"poses": [{}, {}]}}
            ]}}"#,
            poses.join(","),
            translation(0.0, 0.0, 0.0),
            translation(0.0, 1.0, 0.0),
        ),
    )
    .unwrap();

    let output = tmp.path().join("strokes.glb");
    let config = PipelineConfig {
        input,
        output: output.clone(),
        ribbon: unsmoothed(),
        seed_at_anchor: true,
        ..Default::default()
    };
    let result = Pipeline::run(&config).unwrap();
    assert_eq!(result.stroke_count, 2);

    let (doc, buffers, _) = gltf::import(&output).unwrap();
    let node = doc
        .nodes()
        .find(|n| n.mesh().and_then(|m| m.name().map(str::to_owned)) == Some("anchored".into()))
        .expect("anchored node");
    let (translation, _, _) = node.transform().decomposed();
    assert_relative_eq!(translation[0], 10.0, epsilon = 1e-6);
    assert_relative_eq!(translation[2], -5.0, epsilon = 1e-6);

    // Vertices are stored relative to the anchor, seeded at its origin.
    let primitive = node.mesh().unwrap().primitives().next().unwrap();
    let reader = primitive.reader(|b| Some(&buffers[b.index()]));
    let positions: Vec<[f32; 3]> = reader.read_positions().unwrap().collect();
    assert_eq!(positions.len(), 10);
    assert_relative_eq!(positions[0][0], 0.0, epsilon = 1e-6);
    assert_relative_eq!(positions[0][1], 0.25, epsilon = 1e-6);
    assert_relative_eq!(positions[8][0], 3.0, epsilon = 1e-5);

    let unnamed = doc
        .meshes()
        .find(|m| m.name() == Some("stroke_001"))
        .expect("default-named stroke");
    assert_eq!(unnamed.primitives().next().unwrap().mode(), Mode::TriangleStrip);
}

#[test]
fn textured_ribbon_fits_aspect() {
    let tmp = tempfile::tempdir().unwrap();
    let input = write_jsonl(tmp.path());
    let texture = tmp.path().join("label.png");
    let img = image::RgbaImage::from_fn(40, 10, |x, _| {
        if x < 20 {
            image::Rgba([220, 40, 40, 255])
        } else {
            image::Rgba([40, 40, 220, 255])
        }
    });
    img.save(&texture).unwrap();

    let output = tmp.path().join("textured.glb");
    let config = PipelineConfig {
        input,
        output: output.clone(),
        ribbon: RibbonConfig {
            width: 0.25,
            ..unsmoothed()
        },
        material: MaterialConfig {
            texture: Some(texture),
            fit_texture_aspect: true,
            ..Default::default()
        },
        ..Default::default()
    };
    Pipeline::run(&config).expect("textured pipeline should succeed");

    let (doc, buffers, images) = gltf::import(&output).unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].width, 40);
    assert_eq!(images[0].height, 10);

    let primitive = doc.meshes().next().unwrap().primitives().next().unwrap();
    let info = primitive
        .material()
        .pbr_metallic_roughness()
        .base_color_texture()
        .expect("material should reference the texture");
    let sampler = info.texture().sampler();
    assert_eq!(sampler.wrap_s(), gltf::texture::WrappingMode::Repeat);

    // Aspect 4 on a 0.25 ribbon: one repeat per world unit.
    let reader = primitive.reader(|b| Some(&buffers[b.index()]));
    let uvs: Vec<[f32; 2]> = reader.read_tex_coords(0).unwrap().into_f32().collect();
    assert_relative_eq!(uvs[8][0], 2.0, epsilon = 1e-5);
}

#[test]
fn texture_fit_follows_stroke_width_override() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("banners.json");
    let poses: Vec<String> = (0..7).map(|i| translation(i as f32, 0.0, 0.0)).collect();
    let poses = poses.join(",");
    fs::write(
        &input,
        format!(
            r#"{{"strokes": [
                {{"name": "wide", "width": 1.0, "poses": [{poses}]}},
                {{"name": "default", "poses": [{poses}]}}
            ]}}"#
        ),
    )
    .unwrap();
    let texture = tmp.path().join("banner.png");
    image::RgbaImage::from_pixel(1200, 200, image::Rgba([10, 10, 10, 255]))
        .save(&texture)
        .unwrap();

    let output = tmp.path().join("banners.glb");
    let config = PipelineConfig {
        input,
        output: output.clone(),
        ribbon: RibbonConfig {
            width: 0.2,
            ..unsmoothed()
        },
        material: MaterialConfig {
            texture: Some(texture),
            fit_texture_aspect: true,
            ..Default::default()
        },
        ..Default::default()
    };
    Pipeline::run(&config).unwrap();

    let (doc, buffers, _) = gltf::import(&output).unwrap();
    let end_u = |name: &str| {
        let mesh = doc.meshes().find(|m| m.name() == Some(name)).unwrap();
        let primitive = mesh.primitives().next().unwrap();
        let reader = primitive.reader(|b| Some(&buffers[b.index()]));
        let uvs: Vec<[f32; 2]> = reader.read_tex_coords(0).unwrap().into_f32().collect();
        uvs[uvs.len() - 1][0]
    };

    // A 6:1 texture over 6 m: one repeat on the 1.0 wide ribbon, five on the 0.2 one.
    assert_relative_eq!(end_u("wide"), 1.0, epsilon = 1e-5);
    assert_relative_eq!(end_u("default"), 5.0, epsilon = 1e-4);
}

#[test]
fn singular_anchor_is_reported_per_stroke() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("broken.json");
    fs::write(
        &input,
        format!(
            r#"{{"strokes": [{{"name": "collapsed", "anchor": [0,0,0,0, 0,0,0,0, 0,0,0,0, 0,0,0,0], "poses": [{}]}}]}}"#,
            translation(0.0, 0.0, 0.0)
        ),
    )
    .unwrap();
    let config = PipelineConfig {
        input,
        output: tmp.path().join("broken.glb"),
        ..Default::default()
    };

    let err = Pipeline::run(&config).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("collapsed"), "{message}");
    assert!(message.contains("anchor"), "{message}");
    assert!(!tmp.path().join("broken.glb").exists());
}

#[test]
fn json_dump_written_next_to_glb() {
    let tmp = tempfile::tempdir().unwrap();
    let input = write_jsonl(tmp.path());
    let output = tmp.path().join("session.glb");

    let config = PipelineConfig {
        input,
        output,
        ribbon: unsmoothed(),
        write_json: true,
        ..Default::default()
    };
    let result = Pipeline::run(&config).unwrap();
    let json_path = result.json_path.expect("json path");
    assert_eq!(json_path, tmp.path().join("session.json"));

    let dump: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    let ribbons = dump["ribbons"].as_array().unwrap();
    assert_eq!(ribbons.len(), 2);
    assert_eq!(ribbons[1]["primitive"], "TRIANGLE_STRIP");
    assert_eq!(ribbons[1]["vertexCount"], 6);
    assert_eq!(ribbons[1]["indices"].as_array().unwrap().len(), 6);
}

#[test]
fn smoothing_shortens_noisy_path() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("noisy.jsonl");
    let mut content = String::new();
    for i in 0..40 {
        let jitter = if i % 2 == 0 { 0.05 } else { -0.05 };
        content.push_str(&translation(i as f32 * 0.1, jitter, 0.0));
        content.push('\n');
    }
    fs::write(&input, content).unwrap();

    let run = |smoothing_factor: f32| {
        let config = PipelineConfig {
            input: input.clone(),
            output: tmp.path().join("noisy.glb"),
            ribbon: RibbonConfig {
                smoothing_factor,
                ..Default::default()
            },
            dry_run: true,
            ..Default::default()
        };
        Pipeline::run(&config).unwrap().total_length
    };

    assert!(run(0.3) < run(1.0));
}

#[test]
fn dry_run_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let input = write_jsonl(tmp.path());
    let output = tmp.path().join("dry").join("session.glb");

    let config = PipelineConfig {
        input,
        output: output.clone(),
        dry_run: true,
        write_json: true,
        ..Default::default()
    };
    let result = Pipeline::run(&config).unwrap();
    assert_eq!(result.stroke_count, 2);
    assert!(result.glb_path.is_none());
    assert!(!output.exists());
    assert!(!tmp.path().join("dry").exists());
}

#[test]
fn empty_input_writes_empty_scene() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("empty.json");
    fs::write(&input, r#"{"strokes": []}"#).unwrap();
    let output = tmp.path().join("empty.glb");

    let config = PipelineConfig {
        input,
        output: output.clone(),
        ..Default::default()
    };
    let result = Pipeline::run(&config).unwrap();
    assert_eq!(result.stroke_count, 0);

    let (doc, _, _) = gltf::import(&output).unwrap();
    assert_eq!(doc.meshes().count(), 0);
}

#[test]
fn pipeline_missing_input_returns_error() {
    let tmp = tempfile::tempdir().unwrap();
    let config = PipelineConfig {
        input: tmp.path().join("nonexistent.jsonl"),
        output: tmp.path().join("out.glb"),
        ..Default::default()
    };

    assert!(Pipeline::run(&config).is_err(), "missing input should return error");
}

#[test]
fn pipeline_rejects_unsupported_format() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("poses.csv");
    fs::write(&input, "1,0,0,0\n").unwrap();
    let config = PipelineConfig {
        input,
        output: tmp.path().join("out.glb"),
        ..Default::default()
    };

    assert!(Pipeline::run(&config).is_err());
}

#[test]
fn pipeline_rejects_invalid_smoothing() {
    let tmp = tempfile::tempdir().unwrap();
    let input = write_jsonl(tmp.path());
    let config = PipelineConfig {
        input,
        output: tmp.path().join("out.glb"),
        ribbon: RibbonConfig {
            smoothing_factor: 0.0,
            ..Default::default()
        },
        ..Default::default()
    };

    assert!(Pipeline::run(&config).is_err());
}
