use clap::Parser;
use globe_core::{AssetError, GlobeConfig, SurfaceTexture};
use std::path::{Path, PathBuf};

/// Interactive marker globe (native viewer).
#[derive(Parser, Debug)]
#[command(name = "globe-native", about = "Interactive marker globe")]
pub struct Args {
    /// PNG used as the globe's normal map.
    #[arg(long)]
    pub texture: Option<PathBuf>,

    /// Disable idle auto-rotation.
    #[arg(long)]
    pub no_auto_rotate: bool,

    /// Idle spin speed in radians per second.
    #[arg(long)]
    pub spin_speed: Option<f32>,

    /// Initial window width in logical pixels.
    #[arg(long, default_value_t = 1024)]
    pub width: u32,

    /// Initial window height in logical pixels.
    #[arg(long, default_value_t = 768)]
    pub height: u32,
}

impl Args {
    pub fn apply(&self, config: &mut GlobeConfig) {
        if self.no_auto_rotate {
            config.capabilities.auto_rotate = false;
        }
        if let Some(s) = self.spin_speed {
            config.spin_speed = s;
        }
    }

    pub fn surface_texture(&self) -> Result<SurfaceTexture, AssetError> {
        match &self.texture {
            Some(path) => load_png(path),
            None => Err(AssetError::Unavailable("no --texture given".into())),
        }
    }
}

pub fn load_png(path: &Path) -> Result<SurfaceTexture, AssetError> {
    let img = image::open(path)
        .map_err(|e| AssetError::Decode(format!("{}: {}", path.display(), e)))?
        .to_rgba8();
    let (w, h) = img.dimensions();
    SurfaceTexture::new(w, h, img.into_raw())
}
