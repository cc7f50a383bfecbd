use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderLanguage,
    ShaderType,
};

use super::render_context::RenderContextError;

/// Shared WGSL modules, registered in dependency order.
const MODULES: &[(&str, &str)] = &[
    (
        include_str!("../../assets/shaders/modules/camera.wgsl"),
        "modules/camera.wgsl",
    ),
    (
        include_str!("../../assets/shaders/modules/lighting.wgsl"),
        "modules/lighting.wgsl",
    ),
];

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// Consuming shaders use `#import motorviz::camera` and friends. The composer
/// produces `naga::Module` IR directly, skipping WGSL re-parse at runtime.
pub struct ShaderComposer {
    composer: Composer,
}

impl ShaderComposer {
    /// Composer with every shared module registered.
    ///
    /// # Errors
    ///
    /// [`RenderContextError::Shader`] if a shared module fails to parse.
    pub fn new() -> Result<Self, RenderContextError> {
        let mut composer = Composer::default();
        for &(source, file_path) in MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source,
                    file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| {
                    RenderContextError::Shader(format!("{file_path}: {e:?}"))
                })?;
        }
        Ok(Self { composer })
    }

    /// Compose a shader source string (which may contain `#import`
    /// directives) into a `wgpu::ShaderModule` ready for pipeline creation.
    ///
    /// # Errors
    ///
    /// [`RenderContextError::Shader`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        source: &str,
        file_path: &str,
    ) -> Result<wgpu::ShaderModule, RenderContextError> {
        let naga_module = self
            .compose_naga(source, file_path)
            .map_err(|e| RenderContextError::Shader(format!("{file_path}: {e}")))?;

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
    /// Returns the composer error if imports or WGSL fail to resolve.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
    ) -> Result<naga::Module, Box<naga_oil::compose::ComposerError>> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(Box::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_shaders_compose() {
        let mut composer = ShaderComposer::new().unwrap();
        let sources = [(
            include_str!("../../assets/shaders/raster/part.wgsl"),
            "raster/part.wgsl",
        )];
        for (source, file_path) in sources {
            let module = composer
                .compose_naga(source, file_path)
                .unwrap_or_else(|e| panic!("'{file_path}' failed: {e}"));
            assert!(module.entry_points.iter().any(|e| e.name == "vs_main"));
            assert!(module.entry_points.iter().any(|e| e.name == "fs_main"));
        }
    }
}
