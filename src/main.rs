use std::collections::HashSet;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Instant;

use anyhow::Context;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::Config;
use crate::map::WorldMap;
use crate::player::{Intent, Player};
use crate::renderer::Palette;
use crate::scaler::{ScaleLut, blit_stretch, build_scale_lut};

mod config;
mod map;
mod player;
mod raycast;
mod renderer;
mod scaler;

/// The built-in 8x8 world: solid border, four wall types inside.
#[rustfmt::skip]
const REFERENCE_CELLS: [u8; 64] = [
    1, 1, 1, 1, 1, 1, 1, 1,
    1, 0, 3, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 2, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 1,
    1, 4, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 3, 0, 0, 0, 1,
    1, 1, 1, 1, 1, 1, 1, 1,
];

fn intent_for(code: KeyCode) -> Option<Intent> {
    match code {
        KeyCode::KeyW | KeyCode::ArrowUp => Some(Intent::Advance),
        KeyCode::KeyS | KeyCode::ArrowDown => Some(Intent::Retreat),
        KeyCode::KeyA | KeyCode::ArrowLeft => Some(Intent::RotateLeft),
        KeyCode::KeyD | KeyCode::ArrowRight => Some(Intent::RotateRight),
        KeyCode::Escape => Some(Intent::Quit),
        _ => None,
    }
}

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,

    config: Config,
    map: WorldMap,
    palette: Palette,
    player: Player,

    // Fixed-resolution framebuffer, fully rewritten every tick
    fb: Vec<u32>,
    scale_lut: ScaleLut,

    keys_down: HashSet<KeyCode>,
    queued: Vec<Intent>,

    // HUD
    frame_counter: u32,
    last_fps_log: Instant,
}

impl App {
    fn new(config: Config, map: WorldMap, palette: Palette) -> anyhow::Result<Self> {
        // All configuration problems surface here, before any frame exists.
        palette.check_coverage(&map)?;
        config.validate(&map)?;
        let player = config.player();

        log::info!(
            "world {}x{}, framebuffer {}x{}, spawn ({}, {})",
            map.width(),
            map.height(),
            config.width,
            config.height,
            player.pos[0],
            player.pos[1],
        );

        Ok(Self {
            window: None,
            surface: None,
            fb: vec![0; config.width * config.height],
            config,
            map,
            palette,
            player,
            scale_lut: ScaleLut::empty(),
            keys_down: HashSet::new(),
            queued: Vec::new(),
            frame_counter: 0,
            last_fps_log: Instant::now(),
        })
    }

    /// One logical tick: held keys re-issue their intents, the queue is
    /// drained, and each intent steps the viewer by its fixed per-tick
    /// amount. Returns true once a Quit intent was seen.
    fn tick(&mut self) -> bool {
        for &code in &self.keys_down {
            if let Some(intent) = intent_for(code) {
                self.queued.push(intent);
            }
        }

        let mut quit = false;
        for intent in self.queued.drain(..) {
            if intent == Intent::Quit {
                quit = true;
                continue;
            }
            self.player.apply(
                intent,
                &self.map,
                self.config.move_speed,
                self.config.rot_speed,
            );
        }
        quit
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = Window::default_attributes()
            .with_title("gridcaster")
            .with_inner_size(LogicalSize::new(
                self.config.width as f64,
                self.config.height as f64,
            ));

        let window = Rc::new(event_loop.create_window(attributes).expect("create window"));

        let context = softbuffer::Context::new(window.clone()).expect("softbuffer context");
        let surface =
            softbuffer::Surface::new(&context, window.clone()).expect("softbuffer surface");

        let size = window.inner_size();
        self.scale_lut = build_scale_lut(
            size.width as usize,
            size.height as usize,
            self.config.width,
            self.config.height,
        );

        self.surface = Some(surface);
        self.window = Some(window);
        self.window.as_ref().unwrap().request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state,
                        ..
                    },
                ..
            } => {
                // Keys with no intent mapping are ignored.
                if let PhysicalKey::Code(code) = physical_key {
                    match state {
                        ElementState::Pressed => {
                            self.keys_down.insert(code);
                        }
                        ElementState::Released => {
                            self.keys_down.remove(&code);
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if self.tick() {
                    event_loop.exit();
                    return;
                }

                let (window, surface) = match (&self.window, &mut self.surface) {
                    (Some(w), Some(s)) if w.id() == id => (w, s),
                    _ => return,
                };

                let size = window.inner_size();
                let (dw, dh) = (size.width as usize, size.height as usize);
                if dw == 0 || dh == 0 {
                    return; // Minimized window, skip drawing
                }

                renderer::render_frame(
                    &mut self.fb,
                    self.config.width,
                    self.config.height,
                    &self.map,
                    &self.palette,
                    &self.player,
                );

                surface
                    .resize(
                        NonZeroU32::new(dw as u32).unwrap(),
                        NonZeroU32::new(dh as u32).unwrap(),
                    )
                    .unwrap();

                let mut buf = surface.buffer_mut().expect("buffer_mut");
                blit_stretch(&mut buf, dw, &self.fb, self.config.width, &self.scale_lut);
                buf.present().unwrap();

                self.frame_counter += 1;
                let now = Instant::now();
                let elapsed = now.duration_since(self.last_fps_log).as_secs_f32();
                if elapsed >= 1.0 {
                    log::debug!("fps: {:.1}", self.frame_counter as f32 / elapsed);
                    self.frame_counter = 0;
                    self.last_fps_log = now;
                }

                self.window.as_ref().unwrap().request_redraw();
            }

            WindowEvent::Resized(new_size) => {
                let (dw, dh) = (new_size.width as usize, new_size.height as usize);
                if dw > 0 && dh > 0 {
                    self.scale_lut = build_scale_lut(dw, dh, self.config.width, self.config.height);
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn run() -> anyhow::Result<()> {
    let map = WorldMap::new(8, 8, REFERENCE_CELLS.to_vec()).context("reference map rejected")?;
    let mut app = App::new(Config::default(), map, Palette::reference())?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);
    event_loop.run_app(&mut app)?;
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        log::error!("startup failed: {err:#}");
        std::process::exit(1);
    }
}
