//! GPU-free checks of the WGSL modules: parse, validate, and reflect the
//! binding and entry-point contract the pipelines are built against.

use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{
    AddressSpace, Binding, Expression, ImageClass, ImageDimension, Literal, Module, ScalarKind,
    ShaderStage, TypeInner,
};

use tessera_engine::render::{CHUNK_SHADER, COMPOSITE_SHADER, DEBUG_BLOCK_TYPES, ShadingMode};

fn parse_and_validate(source: &str) -> Module {
    let module = naga::front::wgsl::parse_str(source).expect("wgsl parses");
    Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .expect("wgsl validates");
    module
}

fn entry_points(module: &Module) -> Vec<(String, ShaderStage)> {
    module
        .entry_points
        .iter()
        .map(|ep| (ep.name.clone(), ep.stage))
        .collect()
}

/// (group, binding) -> global type, for every resource binding.
fn resource(module: &Module, group: u32, binding: u32) -> &TypeInner {
    let (_, var) = module
        .global_variables
        .iter()
        .find(|(_, v)| {
            v.binding
                .as_ref()
                .is_some_and(|b| b.group == group && b.binding == binding)
        })
        .unwrap_or_else(|| panic!("no resource at group {group} binding {binding}"));
    &module.types[var.ty].inner
}

fn assert_float_texture_array(inner: &TypeInner) {
    match inner {
        TypeInner::Image {
            dim,
            arrayed,
            class,
        } => {
            assert_eq!(*dim, ImageDimension::D2);
            assert!(*arrayed, "expected a texture array");
            assert!(matches!(
                class,
                ImageClass::Sampled {
                    kind: ScalarKind::Float,
                    multi: false
                }
            ));
        }
        other => panic!("expected texture_2d_array<f32>, got {other:?}"),
    }
}

fn assert_filtering_sampler(inner: &TypeInner) {
    assert!(
        matches!(inner, TypeInner::Sampler { comparison: false }),
        "expected a non-comparison sampler, got {inner:?}"
    );
}

fn vertex_input_locations(module: &Module, entry: &str) -> Vec<u32> {
    let ep = module
        .entry_points
        .iter()
        .find(|ep| ep.name == entry)
        .expect("entry point exists");

    let mut locations = Vec::new();
    for arg in &ep.function.arguments {
        match (&arg.binding, &module.types[arg.ty].inner) {
            (Some(Binding::Location { location, .. }), _) => locations.push(*location),
            (None, TypeInner::Struct { members, .. }) => {
                for m in members {
                    if let Some(Binding::Location { location, .. }) = m.binding {
                        locations.push(location);
                    }
                }
            }
            _ => {}
        }
    }
    locations.sort_unstable();
    locations
}

#[test]
fn chunk_shader_validates_with_one_vertex_and_two_fragment_stages() {
    let module = parse_and_validate(CHUNK_SHADER);
    let eps = entry_points(&module);

    assert!(eps.contains(&("vs_main".to_string(), ShaderStage::Vertex)));
    for mode in [ShadingMode::Textured, ShadingMode::Debug] {
        let name = mode.fragment_entry_point().to_string();
        assert!(eps.contains(&(name, ShaderStage::Fragment)), "{mode:?}");
    }
    assert_eq!(eps.len(), 3);
}

#[test]
fn chunk_shader_bindings_match_the_pipeline_layout() {
    let module = parse_and_validate(CHUNK_SHADER);

    let (_, camera) = module
        .global_variables
        .iter()
        .find(|(_, v)| v.space == AddressSpace::Uniform)
        .expect("camera uniform");
    let binding = camera.binding.as_ref().expect("camera is bound");
    assert_eq!((binding.group, binding.binding), (0, 0));

    let size = module.types[camera.ty].inner.size(module.to_ctx());
    assert_eq!(size, 64);

    assert_float_texture_array(resource(&module, 1, 0));
    assert_filtering_sampler(resource(&module, 1, 1));
}

#[test]
fn chunk_vertex_inputs_cover_locations_0_to_2() {
    let module = parse_and_validate(CHUNK_SHADER);
    assert_eq!(vertex_input_locations(&module, "vs_main"), vec![0, 1, 2]);
}

#[test]
fn debug_divisor_constant_matches_rust_side() {
    let module = parse_and_validate(CHUNK_SHADER);

    let (_, constant) = module
        .constants
        .iter()
        .find(|(_, c)| c.name.as_deref() == Some("DEBUG_BLOCK_TYPES"))
        .expect("DEBUG_BLOCK_TYPES constant");

    match module.global_expressions[constant.init] {
        Expression::Literal(Literal::U32(v)) => assert_eq!(v, DEBUG_BLOCK_TYPES),
        ref other => panic!("unexpected initializer {other:?}"),
    }
}

#[test]
fn composite_shader_validates_and_binds_group_0() {
    let module = parse_and_validate(COMPOSITE_SHADER);
    let eps = entry_points(&module);

    assert_eq!(
        eps,
        vec![
            ("vs_main".to_string(), ShaderStage::Vertex),
            ("fs_main".to_string(), ShaderStage::Fragment),
        ]
    );

    assert_float_texture_array(resource(&module, 0, 0));
    assert_filtering_sampler(resource(&module, 0, 1));
    assert_eq!(vertex_input_locations(&module, "vs_main"), vec![0, 1]);
}
