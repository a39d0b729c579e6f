use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderLanguage,
    ShaderType,
};

use crate::error::GlobeError;

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// Pre-loads the shared WGSL modules at construction time. Consuming shaders
/// use `#import earthglow::camera::camera` (and friends) to pull in shared
/// bindings. The composer produces `naga::Module` IR directly, skipping WGSL
/// re-parse at runtime.
pub struct ShaderComposer {
    composer: Composer,
}

/// Shared module definition: (source, file_path)
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

/// Shared modules in dependency order.
const MODULES: &[ModuleDef] = &[
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/camera.wgsl"),
        file_path: "modules/camera.wgsl",
    },
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/lighting.wgsl"),
        file_path: "modules/lighting.wgsl",
    },
];

impl ShaderComposer {
    /// Build a composer with every shared module registered.
    ///
    /// # Errors
    ///
    /// Returns [`GlobeError::Shader`] if a shared module fails to parse.
    pub fn new() -> Result<Self, GlobeError> {
        let mut composer = Composer::default();

        for m in MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| {
                    GlobeError::Shader(format!(
                        "failed to register shader module '{}': {e:?}",
                        m.file_path
                    ))
                })?;
        }

        Ok(Self { composer })
    }

    /// Compose a shader source string (which may contain `#import`
    /// directives) into a `wgpu::ShaderModule` ready for pipeline creation.
    ///
    /// # Errors
    ///
    /// Returns [`GlobeError::Shader`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        source: &str,
        file_path: &str,
    ) -> Result<wgpu::ShaderModule, GlobeError> {
        let naga_module = self.compose_naga(source, file_path)?;

        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose a shader source into a `naga::Module` without creating a wgpu
    /// shader module. Useful for testing shader composition without a GPU
    /// device.
    ///
    /// # Errors
    ///
    /// Returns [`GlobeError::Shader`] if composition fails.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
    ) -> Result<naga::Module, GlobeError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| {
                GlobeError::Shader(format!(
                    "failed to compose shader '{file_path}': {e}"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_shader_sources() -> Vec<(&'static str, &'static str)> {
        vec![
            (include_str!("../../assets/shaders/earth.wgsl"), "earth.wgsl"),
            (include_str!("../../assets/shaders/stars.wgsl"), "stars.wgsl"),
            (
                include_str!("../../assets/shaders/meteor.wgsl"),
                "meteor.wgsl",
            ),
        ]
    }

    #[test]
    fn test_all_shaders_compose() {
        let mut composer = ShaderComposer::new().unwrap();
        for (source, file_path) in all_shader_sources() {
            let module = composer
                .compose_naga(source, file_path)
                .unwrap_or_else(|e| {
                    panic!("Shader '{file_path}' failed to compose: {e}")
                });
            assert!(
                module.entry_points.iter().any(|ep| ep.name == "vs_main"),
                "{file_path} has no vs_main"
            );
            assert!(
                module.entry_points.iter().any(|ep| ep.name == "fs_main"),
                "{file_path} has no fs_main"
            );
        }
    }

    #[test]
    fn earth_shader_pulls_in_lighting_uniform() {
        let mut composer = ShaderComposer::new().unwrap();
        let module = composer
            .compose_naga(
                include_str!("../../assets/shaders/earth.wgsl"),
                "earth.wgsl",
            )
            .unwrap();
        let lighting = module
            .types
            .iter()
            .find_map(|(_, ty)| match &ty.inner {
                naga::TypeInner::Struct { members, span }
                    if members.len() == 6 && *span == 48 =>
                {
                    Some(members)
                }
                _ => None,
            })
            .expect("lighting uniform struct");
        let offsets: Vec<u32> = lighting.iter().map(|m| m.offset).collect();
        assert_eq!(offsets, [0, 12, 16, 28, 32, 44]);
    }

    #[test]
    fn shared_module_fields_do_not_end_in_digits() {
        for def in MODULES {
            for line in def.source.lines() {
                let Some((name, _)) = line.trim().split_once(':') else {
                    continue;
                };
                let is_field = !name.is_empty()
                    && name.chars().all(|c| c.is_alphanumeric() || c == '_');
                if is_field {
                    assert!(
                        !name.ends_with(|c: char| c.is_ascii_digit()),
                        "{}: field `{name}` cannot be imported",
                        def.file_path
                    );
                }
            }
        }
    }
}
