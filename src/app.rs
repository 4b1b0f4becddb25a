//! Windowed application: event loop, input dispatch and the frame loop

use std::{sync::Arc, time::Instant};

use log::{debug, error, info, trace, warn};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    animation::AnimationRegistry,
    config::SceneConfig,
    error::AppError,
    gfx::{picking::ObjectPicker, rendering::RenderEngine, scene::Scene},
};

/// Cursor travel (in physical pixels) below which a press/release is a click
pub const CLICK_DRAG_THRESHOLD: f64 = 4.0;

const WINDOW_TITLE: &str = "Spinning Boxes";

pub struct SpinningBoxesApp {
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    scene: Scene,
    animations: AnimationRegistry,
    picker: ObjectPicker,
    vsync: bool,
    start_time: Instant,
    cursor_position: PhysicalPosition<f64>,
    press: Option<ClickTracker>,
    error: Option<AppError>,
}

impl SpinningBoxesApp {
    /// Builds the scene described by `config`; the window and GPU come up
    /// once the event loop resumes.
    pub fn new(config: &SceneConfig, vsync: bool) -> Result<Self, AppError> {
        let (scene, animations) = Scene::from_config(config)?;

        let stats = scene.get_statistics();
        info!(
            "Scene ready: {} objects ({} interactive), {} materials, {} triangles",
            stats.object_count, stats.interactive_count, stats.material_count, stats.total_triangles
        );

        Ok(Self {
            app_state: AppState {
                window: None,
                render_engine: None,
                scene,
                animations,
                picker: ObjectPicker::new(),
                vsync,
                start_time: Instant::now(),
                cursor_position: PhysicalPosition::new(0.0, 0.0),
                press: None,
                error: None,
            },
        })
    }

    /// Runs the event loop until the window closes
    pub fn run(mut self) -> Result<(), AppError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;

        match self.app_state.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.app_state.scene
    }
}

/// Cursor travel between a left press and its release
///
/// Travel is the farthest the cursor got from the press point, so a drag
/// that returns to where it started is still a drag.
#[derive(Debug, Clone, Copy)]
pub struct ClickTracker {
    origin: PhysicalPosition<f64>,
    max_travel: f64,
}

impl ClickTracker {
    pub fn new(origin: PhysicalPosition<f64>) -> Self {
        Self {
            origin,
            max_travel: 0.0,
        }
    }

    pub fn cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        let dx = position.x - self.origin.x;
        let dy = position.y - self.origin.y;
        self.max_travel = self.max_travel.max((dx * dx + dy * dy).sqrt());
    }

    /// True when the cursor never left the click threshold
    pub fn is_click(&self) -> bool {
        self.max_travel < CLICK_DRAG_THRESHOLD
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        error!("{error}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window = event_loop.create_window(
            WindowAttributes::default()
                .with_title(WINDOW_TITLE)
                .with_inner_size(LogicalSize::new(1200, 800)),
        )?;
        let window_handle = Arc::new(window);
        let (width, height) = window_handle.inner_size().into();

        let shadow_map_size = self.scene.lights.directional.shadow.map_size;
        let renderer = pollster::block_on(RenderEngine::new(
            window_handle.clone(),
            width,
            height,
            self.vsync,
            shadow_map_size,
        ))?;

        self.scene
            .camera_manager
            .camera
            .resize_projection(width, height);
        self.scene
            .init_gpu_resources(renderer.device(), renderer.queue());

        self.window = Some(window_handle);
        self.render_engine = Some(renderer);
        Ok(())
    }

    fn handle_click(&mut self, position: PhysicalPosition<f64>) {
        let Some(render_engine) = self.render_engine.as_ref() else {
            return;
        };
        let (width, height) = render_engine.get_surface_size();

        let hit = self.picker.pick_at(
            (position.x as f32, position.y as f32),
            (width as f32, height as f32),
            &self.scene,
        );

        match hit {
            Some(hit) => {
                if self.animations.activate(hit.object_id) {
                    debug!(
                        "Activated {} at distance {:.2}",
                        hit.object_id, hit.distance
                    );
                } else {
                    trace!("{} has no animation bound", hit.object_id);
                }
            }
            None => trace!("Click at ({:.0}, {:.0}) hit nothing", position.x, position.y),
        }
    }

    fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        self.scene
            .camera_manager
            .process_mouse_button(button, state);

        if button != MouseButton::Left {
            return;
        }

        match state {
            ElementState::Pressed => self.press = Some(ClickTracker::new(self.cursor_position)),
            ElementState::Released => {
                if let Some(mut press) = self.press.take() {
                    press.cursor_moved(self.cursor_position);
                    if press.is_click() {
                        self.handle_click(self.cursor_position);
                    }
                }
            }
        }
    }

    fn handle_keyboard(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state == ElementState::Pressed
            && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
        {
            event_loop.exit();
            return;
        }

        self.scene.camera_manager.process_keyboard_event(event);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        // One animation step per frame
        self.animations.apply_to_scene(&mut self.scene);

        self.scene.update();
        self.scene
            .advance_materials(self.start_time.elapsed().as_secs_f32());
        self.scene.update_all_transforms(render_engine.queue());
        self.scene
            .update_materials(render_engine.device(), render_engine.queue());

        render_engine.update(&self.scene.camera_manager.camera.uniform, &self.scene.lights);

        match render_engine.render_frame(&self.scene) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost or outdated, reconfiguring");
                render_engine.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("Surface out of memory, stopping");
                self.error = Some(AppError::OutOfMemory);
                event_loop.exit();
            }
            Err(e) => warn!("Skipped frame: {e}"),
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.init_graphics(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.render_engine.is_none() {
            return;
        }

        match event {
            WindowEvent::KeyboardInput { event, .. } => self.handle_keyboard(event_loop, &event),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_position = position;
                if let Some(press) = self.press.as_mut() {
                    press.cursor_moved(position);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.handle_mouse_button(button, state)
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.scene
                    .camera_manager
                    .camera
                    .resize_projection(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if self.window.is_none() {
            return;
        }

        self.scene.camera_manager.process_event(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_threshold() {
        let press = PhysicalPosition::new(100.0, 100.0);

        let released_at = |x, y| {
            let mut tracker = ClickTracker::new(press);
            tracker.cursor_moved(PhysicalPosition::new(x, y));
            tracker.is_click()
        };

        assert!(ClickTracker::new(press).is_click());
        assert!(released_at(102.0, 102.0));
        assert!(!released_at(104.0, 100.0));
        assert!(!released_at(150.0, 80.0));
    }

    #[test]
    fn test_drag_that_returns_is_not_a_click() {
        let mut tracker = ClickTracker::new(PhysicalPosition::new(100.0, 100.0));
        tracker.cursor_moved(PhysicalPosition::new(101.0, 101.0));
        assert!(tracker.is_click());

        tracker.cursor_moved(PhysicalPosition::new(180.0, 120.0));
        tracker.cursor_moved(PhysicalPosition::new(100.0, 100.0));
        assert!(!tracker.is_click());
    }

    #[test]
    fn test_new_builds_default_scene() {
        let app = SpinningBoxesApp::new(&SceneConfig::default(), false).unwrap();
        assert_eq!(app.scene().objects.len(), 4);
        assert_eq!(app.app_state.animations.len(), 3);
        assert!(app.app_state.render_engine.is_none());
    }
}
