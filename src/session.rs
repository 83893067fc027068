//! The mutable state of one running world (§9 "Global mutable state"): time
//! of day, render-graph toggles, and fly/jump timing all live here rather
//! than in process-wide singletons, owned by whatever screen is currently
//! showing the world.

use std::time::{Duration, Instant};

use crate::atmosphere::{AtmosphereState, DayFraction};
use crate::cli::Cli;
use crate::settings::Settings;

/// A jump within this window of a prior jump toggles flight (§4.7).
const FLY_TOGGLE_WINDOW: Duration = Duration::from_millis(300);

const DEFAULT_DAY_LENGTH_SECONDS: f32 = 1200.0;

/// Which render-graph passes are force-disabled for this run, merging the
/// CLI/env bisection flags (§6) with `settings.json`'s persisted quality
/// choices.
#[derive(Debug, Clone, Copy)]
pub struct GraphToggles {
    pub shadows: bool,
    pub gbuffer: bool,
    pub ssao: bool,
    pub clouds: bool,
}

impl GraphToggles {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            shadows: !cli.disable_shadows,
            gbuffer: !cli.disable_gpass,
            ssao: !cli.disable_ssao,
            clouds: !cli.disable_clouds,
        }
    }
}

pub struct Session {
    pub settings: Settings,
    pub toggles: GraphToggles,
    day: DayFraction,
    day_length_seconds: f32,
    cloud_shadow_factor: f32,
    flying: bool,
    last_jump_at: Option<Instant>,
    pub skip_world_update: bool,
    pub skip_world_render: bool,
    pub smoke_frames_remaining: Option<u32>,
}

impl Session {
    pub fn new(settings: Settings, cli: &Cli) -> Self {
        Self {
            settings,
            toggles: GraphToggles::from_cli(cli),
            day: DayFraction::new(0.3),
            day_length_seconds: DEFAULT_DAY_LENGTH_SECONDS,
            cloud_shadow_factor: 1.0,
            flying: false,
            last_jump_at: None,
            skip_world_update: cli.skip_world_update,
            skip_world_render: cli.skip_world_render,
            smoke_frames_remaining: cli.smoke_frames,
        }
    }

    pub fn advance_time(&mut self, delta_seconds: f32) {
        self.day = self.day.advance(delta_seconds, self.day_length_seconds);
    }

    pub fn set_cloud_shadow_factor(&mut self, factor: f32) {
        self.cloud_shadow_factor = factor.clamp(0.0, 1.0);
    }

    pub fn atmosphere(&self) -> AtmosphereState {
        AtmosphereState::at(self.day, self.cloud_shadow_factor)
    }

    pub fn is_flying(&self) -> bool {
        self.flying
    }

    /// Registers a jump press; returns `true` if this press toggled flight
    /// (creative mode, second tap within `FLY_TOGGLE_WINDOW`).
    pub fn register_jump_press(&mut self, now: Instant) -> bool {
        let toggled = match self.last_jump_at {
            Some(last) if now.duration_since(last) <= FLY_TOGGLE_WINDOW => {
                self.flying = !self.flying;
                true
            }
            _ => false,
        };
        self.last_jump_at = Some(now);
        toggled
    }

    /// Consumes one smoke-test frame; `None` means this run isn't bounded.
    /// Returns `true` once the counter reaches zero and the process should
    /// exit 0.
    pub fn tick_smoke_frame(&mut self) -> bool {
        match &mut self.smoke_frames_remaining {
            Some(0) => true,
            Some(remaining) => {
                *remaining -= 1;
                *remaining == 0
            }
            None => false,
        }
    }
}
