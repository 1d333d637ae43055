#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Snail Run.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.

use anyhow::Result;
use glam::Vec2;
use macroquad::{
    input::{is_key_down, is_key_pressed, KeyCode},
    math::Vec2 as MacroquadVec2,
    shapes::{draw_circle, draw_circle_lines, draw_rectangle, draw_triangle},
    text::draw_text,
};
use snail_run_core::{Action, ActionSet};
use snail_run_rendering::{
    Color, FrameInput, Hud, Presentation, RenderingBackend, Scene, SceneCoin, SceneEnemy,
    ScenePlatform, ScenePlayer,
};
use std::{collections::VecDeque, time::Duration};

const SKY_TOP: Color = Color::from_rgb_u8(0x9e, 0xd2, 0xff);
const SKY_BOTTOM: Color = Color::from_rgb_u8(0xcf, 0xe6, 0xff);
const CLOUD: Color = Color::new(1.0, 1.0, 1.0, 0.9);
const HILLS: Color = Color::from_rgb_u8(0x6d, 0xb3, 0x6d);
const GROUND: Color = Color::from_rgb_u8(0x5a, 0x7f, 0x3a);
const PLATFORM_BODY: Color = Color::from_rgb_u8(0x3d, 0x5c, 0x2a);
const PLATFORM_TOP: Color = Color::from_rgb_u8(0x6e, 0x9a, 0x45);
const COIN_FILL: Color = Color::from_rgb_u8(0xff, 0xd2, 0x1f);
const COIN_EDGE: Color = Color::from_rgb_u8(0xc4, 0x9b, 0x00);
const SNAIL_BODY: Color = Color::from_rgb_u8(0x7f, 0x4c, 0x1f);
const SNAIL_SHELL: Color = Color::from_rgb_u8(0xc5, 0x6a, 0x2d);
const PLAYER_BODY: Color = Color::from_rgb_u8(0xff, 0x40, 0x40);
const PLAYER_LEGS: Color = Color::from_rgb_u8(0x70, 0x2b, 0x2b);
const EYE_WHITE: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);
const EYE_PUPIL: Color = Color::from_rgb_u8(0x22, 0x22, 0x22);
const HUD_PANEL: Color = Color::new(0.0, 0.0, 0.0, 0.8);
const HUD_TEXT: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);

const SKY_BANDS: u16 = 32;
const CLOUD_COUNT: u16 = 6;
const HILL_STEP: f32 = 8.0;

/// Keyboard state observed for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct KeyboardShortcuts {
    /// `Escape` or `Q` quits the game loop.
    quit_requested: bool,
    /// Left arrow or `A` held.
    left_held: bool,
    /// Right arrow or `D` held.
    right_held: bool,
    /// Space or up arrow held.
    jump_held: bool,
    /// `P` pressed on this frame.
    pause_pressed: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            left_held: is_key_down(KeyCode::Left) || is_key_down(KeyCode::A),
            right_held: is_key_down(KeyCode::Right) || is_key_down(KeyCode::D),
            jump_held: is_key_down(KeyCode::Space) || is_key_down(KeyCode::Up),
            pause_pressed: is_key_pressed(KeyCode::P),
        }
    }

    fn actions(self) -> ActionSet {
        let mut actions = ActionSet::empty();
        if self.left_held {
            actions.insert(Action::MoveLeft);
        }
        if self.right_held {
            actions.insert(Action::MoveRight);
        }
        if self.jump_held {
            actions.insert(Action::Jump);
        }
        if self.pause_pressed {
            actions.insert(Action::TogglePause);
        }
        actions
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    latest: Option<FpsMetrics>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
}

impl FpsCounter {
    /// Records a rendered frame and returns fresh averages once one second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        self.frame_times.push_back(frame);
        self.window_duration += frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        self.elapsed = Duration::ZERO;
        self.frames = 0;

        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
        };
        self.latest = Some(metrics);
        Some(metrics)
    }

    fn latest_per_second(&self) -> f32 {
        self.latest.map_or(0.0, |metrics| metrics.per_second)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.viewport.x.round() as i32,
            window_height: scene.viewport.y.round() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    tracing::info!("quit requested");
                    break;
                }

                let now = Duration::from_secs_f64(macroquad::time::get_time().max(0.0));
                update_scene(
                    FrameInput {
                        now,
                        actions: keyboard.actions(),
                    },
                    &mut scene,
                );

                macroquad::window::clear_background(background);
                let metrics = SceneMetrics::from_scene(
                    &scene,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                draw_background(&scene, &metrics);
                for platform in &scene.platforms {
                    draw_platform(platform, &metrics);
                }
                for coin in &scene.coins {
                    draw_coin(coin, &metrics);
                }
                for enemy in &scene.enemies {
                    draw_snail(enemy, &metrics);
                }
                draw_player(&scene.player, leg_swing(scene.elapsed), &metrics);
                draw_hud(scene.hud, fps_counter.latest_per_second(), &metrics);

                let frame_dt =
                    Duration::from_secs_f32(macroquad::time::get_frame_time().max(0.0));
                if let Some(FpsMetrics {
                    per_second,
                    trailing_ten_seconds,
                }) = fps_counter.record_frame(frame_dt)
                {
                    if show_fps {
                        tracing::info!(
                            fps = per_second,
                            fps_10s = trailing_ten_seconds,
                            "frame rate"
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Uniform scale and letterbox offsets mapping scene units to screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
    width: f32,
    height: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let viewport = scene.viewport;
        let scale = (screen_width / viewport.x).min(screen_height / viewport.y);
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        Self {
            scale,
            offset_x: (screen_width - viewport.x * scale) * 0.5,
            offset_y: (screen_height - viewport.y * scale) * 0.5,
            width: viewport.x,
            height: viewport.y,
        }
    }

    fn point(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + position.x * self.scale,
            self.offset_y + position.y * self.scale,
        )
    }

    fn rect(&self, position: Vec2, size: Vec2, color: Color) {
        let origin = self.point(position);
        draw_rectangle(
            origin.x,
            origin.y,
            size.x * self.scale,
            size.y * self.scale,
            to_macroquad_color(color),
        );
    }

    fn circle(&self, center: Vec2, radius: f32, color: Color) {
        let center = self.point(center);
        draw_circle(center.x, center.y, radius * self.scale, to_macroquad_color(color));
    }
}

fn draw_background(scene: &Scene, metrics: &SceneMetrics) {
    let band_height = metrics.height / f32::from(SKY_BANDS);
    for band in 0..SKY_BANDS {
        let t = f32::from(band) / f32::from(SKY_BANDS - 1);
        metrics.rect(
            Vec2::new(0.0, f32::from(band) * band_height),
            Vec2::new(metrics.width, band_height + 1.0),
            mix(SKY_TOP, SKY_BOTTOM, t),
        );
    }

    for index in 0..CLOUD_COUNT {
        let anchor = cloud_anchor(index, scene.camera_x, metrics.width);
        metrics.circle(anchor, 22.0, CLOUD);
        metrics.circle(anchor + Vec2::new(24.0, 6.0), 18.0, CLOUD);
        metrics.circle(anchor + Vec2::new(-22.0, 10.0), 16.0, CLOUD);
    }

    let hills = to_macroquad_color(HILLS);
    let bottom = metrics.height;
    let base_y = scene.ground_y + 30.0;
    let mut x = 0.0;
    while x < metrics.width {
        let next = (x + HILL_STEP).min(metrics.width);
        let left = metrics.point(Vec2::new(x, base_y - hill_height(x + scene.camera_x * 0.45)));
        let right =
            metrics.point(Vec2::new(next, base_y - hill_height(next + scene.camera_x * 0.45)));
        let left_floor = metrics.point(Vec2::new(x, bottom));
        let right_floor = metrics.point(Vec2::new(next, bottom));
        draw_triangle(
            MacroquadVec2::new(left.x, left.y),
            MacroquadVec2::new(right.x, right.y),
            MacroquadVec2::new(left_floor.x, left_floor.y),
            hills,
        );
        draw_triangle(
            MacroquadVec2::new(right.x, right.y),
            MacroquadVec2::new(right_floor.x, right_floor.y),
            MacroquadVec2::new(left_floor.x, left_floor.y),
            hills,
        );
        x = next;
    }

    metrics.rect(
        Vec2::new(0.0, scene.ground_y),
        Vec2::new(metrics.width, metrics.height - scene.ground_y),
        GROUND,
    );
}

fn draw_platform(platform: &ScenePlatform, metrics: &SceneMetrics) {
    metrics.rect(platform.position, platform.size, PLATFORM_BODY);
    metrics.rect(
        platform.position,
        Vec2::new(platform.size.x, 4.0_f32.min(platform.size.y)),
        PLATFORM_TOP,
    );
}

fn draw_coin(coin: &SceneCoin, metrics: &SceneMetrics) {
    let fill = if coin.collected {
        COIN_FILL.with_alpha(0.35)
    } else {
        COIN_FILL
    };
    metrics.circle(coin.center, coin.radius, fill);
    let center = metrics.point(coin.center);
    draw_circle_lines(
        center.x,
        center.y,
        coin.radius * metrics.scale,
        1.0,
        to_macroquad_color(COIN_EDGE),
    );
}

fn draw_snail(enemy: &SceneEnemy, metrics: &SceneMetrics) {
    let body_height = (enemy.size.y - 8.0).max(0.0);
    metrics.rect(
        enemy.position,
        Vec2::new(enemy.size.x, body_height),
        SNAIL_BODY,
    );

    let (shell_x, stalk_x) = if enemy.heading_left {
        (enemy.size.x - 18.0, 4.0)
    } else {
        (18.0, enemy.size.x - 8.0)
    };
    metrics.circle(enemy.position + Vec2::new(shell_x, 10.0), 12.0, SNAIL_SHELL);
    metrics.rect(
        enemy.position + Vec2::new(stalk_x, -6.0),
        Vec2::new(4.0, 10.0),
        EYE_WHITE,
    );
    metrics.rect(
        enemy.position + Vec2::new(stalk_x + 1.0, -4.0),
        Vec2::new(2.0, 2.0),
        EYE_PUPIL,
    );
}

fn draw_player(player: &ScenePlayer, swing: f32, metrics: &SceneMetrics) {
    let ScenePlayer {
        position, size, ..
    } = *player;
    metrics.rect(position, size, PLAYER_BODY);

    let swing = if player.on_ground { swing } else { 0.0 };
    metrics.rect(
        position + Vec2::new(6.0, size.y - 6.0),
        Vec2::new(10.0, 6.0 + swing * 2.0),
        PLAYER_LEGS,
    );
    metrics.rect(
        position + Vec2::new(size.x - 16.0, size.y - 6.0),
        Vec2::new(10.0, 6.0 - swing * 2.0),
        PLAYER_LEGS,
    );

    metrics.rect(
        position + Vec2::new(size.x - 14.0, 10.0),
        Vec2::splat(9.0),
        EYE_WHITE,
    );
    metrics.rect(
        position + Vec2::new(size.x - 11.0, 13.0),
        Vec2::splat(4.0),
        EYE_PUPIL,
    );
}

fn draw_hud(hud: Hud, fps: f32, metrics: &SceneMetrics) {
    metrics.rect(Vec2::new(8.0, 8.0), Vec2::new(150.0, 54.0), HUD_PANEL);

    let text = to_macroquad_color(HUD_TEXT);
    let font_size = 16.0 * metrics.scale;
    for (line, label) in hud_lines(hud, fps).iter().enumerate() {
        let origin = metrics.point(Vec2::new(14.0, 26.0 + line as f32 * 14.0));
        let _ = draw_text(label, origin.x, origin.y, font_size, text);
    }

    if hud.paused {
        let origin = metrics.point(Vec2::new(metrics.width * 0.5 - 60.0, metrics.height * 0.4));
        let _ = draw_text("PAUSED", origin.x, origin.y, 48.0 * metrics.scale, text);
    }
}

fn hud_lines(hud: Hud, fps: f32) -> [String; 3] {
    [
        format!("Score: {}", hud.score),
        format!("Lives: {}", hud.lives),
        format!("FPS: {fps:.0}"),
    ]
}

/// Height of the parallax hill line above its base at a scrolled horizontal offset.
fn hill_height(x: f32) -> f32 {
    22.0 * (x * 0.01).sin() + 12.0 * (x * 0.03).sin()
}

/// Centre of a parallax cloud, wrapping around the visible width.
fn cloud_anchor(index: u16, camera_x: f32, width: f32) -> Vec2 {
    let index = f32::from(index);
    let x = (index * 300.0 - camera_x * 0.2).rem_euclid(width + 320.0) - 160.0;
    let y = 60.0 + 40.0 * (index * 1.3 + camera_x * 0.0006).sin();
    Vec2::new(x, y)
}

/// Leg offset of the running animation, in `[-1, 1]`.
fn leg_swing(elapsed: Duration) -> f32 {
    (elapsed.as_secs_f32() * 10.0).sin()
}

fn mix(from: Color, to: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    Color::new(
        from.red + (to.red - from.red) * t,
        from.green + (to.green - from.green) * t,
        from.blue + (to.blue - from.blue) * t,
        from.alpha + (to.alpha - from.alpha) * t,
    )
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
