//! CLI flags and their `ZIGCRAFT_*` environment-variable overrides (§6,
//! §10.4): bring-up/bisection toggles force-disable a render-graph subsystem
//! or RHI backend without touching `settings.json`.

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    Vulkan,
}

#[derive(Debug, Parser)]
#[command(name = "voxel_engine", about = "Voxel world engine core")]
pub struct Cli {
    #[arg(long, value_enum, default_value_t = Backend::Vulkan)]
    pub backend: Backend,

    #[arg(long, env = "ZIGCRAFT_SAFE_RENDER", default_value_t = false)]
    pub safe_render: bool,

    #[arg(long, env = "ZIGCRAFT_SKIP_WORLD_UPDATE", default_value_t = false)]
    pub skip_world_update: bool,

    #[arg(long, env = "ZIGCRAFT_SKIP_WORLD_RENDER", default_value_t = false)]
    pub skip_world_render: bool,

    #[arg(long, env = "ZIGCRAFT_DISABLE_SHADOWS", default_value_t = false)]
    pub disable_shadows: bool,

    #[arg(long, env = "ZIGCRAFT_DISABLE_GPASS", default_value_t = false)]
    pub disable_gpass: bool,

    #[arg(long, env = "ZIGCRAFT_DISABLE_SSAO", default_value_t = false)]
    pub disable_ssao: bool,

    #[arg(long, env = "ZIGCRAFT_DISABLE_CLOUDS", default_value_t = false)]
    pub disable_clouds: bool,

    /// Run exactly N frames then exit 0 (smoke test).
    #[arg(long, env = "ZIGCRAFT_SMOKE_FRAMES")]
    pub smoke_frames: Option<u32>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
