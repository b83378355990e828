use crate::camera::PerspectiveCamera;
use crate::container::Container;
use crate::controls::OrbitControls;
use crate::error::Result;
use crate::input::{Command, InputEvent};
use crate::preset::{Animation, ScenePreset};
use crate::renderer::Renderer;
use crate::scene::Scene;
use crate::scheduler::{DisplayScheduler, HostEvent};
use crate::state::ViewState;
use crate::surface::Surface;
use rand::Rng;
use std::cell::Cell;
use std::rc::Rc;

/// Shared flag that stops a render loop once set
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// What the loop should do after a frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Frame drawn; schedule the next one
    Continue,
    /// The view was unmounted; nothing was touched
    Cancelled,
}

/// A mounted scene: primitives, camera, optional orbit controls and the
/// drawing surface they are rendered into
#[derive(Debug)]
pub struct SceneView {
    preset: ScenePreset,
    scene: Scene,
    camera: PerspectiveCamera,
    controls: Option<OrbitControls>,
    animation: Animation,
    renderer: Renderer,
    surface: Surface,
    state: ViewState,
    token: CancelToken,
    attached: bool,
    frames: u64,
    frames_since_last_update: u64,
    last_fps_calculation: Option<f64>,
    fps: f64,
}

impl SceneView {
    /// Builds `preset` sized to the container's client area and attaches a
    /// drawing surface to the container
    pub fn mount<C, R>(
        container: &mut C,
        preset: ScenePreset,
        state: ViewState,
        rng: &mut R,
    ) -> Result<Self>
    where
        C: Container + ?Sized,
        R: Rng + ?Sized,
    {
        let (width, height) = container.client_size();
        if width == 0 || height == 0 {
            log::warn!("mounting {} view into an empty {}x{} container", preset, width, height);
        }

        let built = preset.build(PerspectiveCamera::aspect_for(width, height), rng);
        let surface = Surface::new(width, height);
        container.append_surface(&surface)?;
        log::info!("mounted {} view at {}x{}", preset, width, height);

        Ok(SceneView {
            preset,
            scene: built.scene,
            camera: built.camera,
            controls: built.controls,
            animation: built.animation,
            renderer: Renderer {
                wireframe: state.wireframe,
                shading: state.shading,
                ..Renderer::default()
            },
            surface,
            state,
            token: CancelToken::default(),
            attached: true,
            frames: 0,
            frames_since_last_update: 0,
            last_fps_calculation: None,
            fps: 0.0,
        })
    }

    pub fn preset(&self) -> ScenePreset {
        self.preset
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls(&self) -> Option<&OrbitControls> {
        self.controls.as_ref()
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    /// Frames drawn since mount
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Whether the drawing surface is still attached to the container
    pub fn is_mounted(&self) -> bool {
        self.attached
    }

    /// One iteration of the render loop: mutate, update controls, redraw, present
    pub fn frame<C: Container + ?Sized>(
        &mut self,
        container: &mut C,
        now_ms: f64,
    ) -> Result<FrameStatus> {
        if self.token.is_cancelled() {
            return Ok(FrameStatus::Cancelled);
        }

        if !self.state.paused {
            self.animation.step(&mut self.scene, now_ms);
        }
        if let Some(controls) = self.controls.as_mut() {
            controls.update(&mut self.camera);
        }

        self.renderer.render(&self.scene, &self.camera, &mut self.surface);
        self.frames += 1;
        self.update_fps(now_ms);
        container.present(&self.surface, &self.overlay())?;

        log::trace!("frame {} at {:.0}ms", self.frames, now_ms);
        Ok(FrameStatus::Continue)
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        if self.token.is_cancelled() {
            return;
        }
        let client_height = self.surface.height();
        match event {
            InputEvent::PointerDown { x, y } => {
                if let Some(controls) = self.controls.as_mut() {
                    controls.pointer_down(x, y);
                }
            }
            InputEvent::PointerMove { x, y } => {
                if let Some(controls) = self.controls.as_mut() {
                    controls.pointer_move(x, y, client_height);
                }
            }
            InputEvent::PointerUp => {
                if let Some(controls) = self.controls.as_mut() {
                    controls.pointer_up();
                }
            }
            InputEvent::Wheel { delta_y } => {
                if let Some(controls) = self.controls.as_mut() {
                    controls.wheel(delta_y);
                }
            }
            InputEvent::Command(command) => self.apply(command),
        }
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::TogglePause => {
                self.state.paused = !self.state.paused;
                if let Some(controls) = self.controls.as_mut() {
                    controls.pointer_up();
                }
            }
            Command::ToggleDebug => self.state.debug = !self.state.debug,
            Command::ToggleWireframe => {
                self.state.wireframe = !self.state.wireframe;
                self.renderer.wireframe = self.state.wireframe;
            }
            Command::ResetView => {
                if let Some(controls) = self.controls.as_mut() {
                    controls.reset(&mut self.camera);
                }
            }
        }
        log::debug!("{:?} -> {:?}", command, self.state);
    }

    /// Reallocates the surface and keeps the camera's aspect in step with it
    pub fn resize(&mut self, width: usize, height: usize) {
        if self.token.is_cancelled() {
            return;
        }
        self.surface.resize(width, height);
        self.camera.set_viewport(width, height);
        log::debug!("resized {} view to {}x{}", self.preset, width, height);
    }

    /// Stops the render loop, then detaches the drawing surface
    pub fn unmount<C: Container + ?Sized>(&mut self, container: &mut C) -> Result<()> {
        self.token.cancel();
        container.remove_surface()?;
        self.attached = false;
        log::info!("unmounted {} view after {} frames", self.preset, self.frames);
        Ok(())
    }

    fn update_fps(&mut self, now_ms: f64) {
        self.frames_since_last_update += 1;
        let Some(last) = self.last_fps_calculation else {
            self.last_fps_calculation = Some(now_ms);
            self.frames_since_last_update = 0;
            return;
        };
        let elapsed = now_ms - last;
        if elapsed >= 1000.0 {
            self.fps = self.frames_since_last_update as f64 * 1000.0 / elapsed;
            self.frames_since_last_update = 0;
            self.last_fps_calculation = Some(now_ms);
        }
    }

    fn overlay(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.state.debug {
            lines.push(format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")));
            lines.push(format!(
                "Preset: {}  Surface: {}x{}",
                self.preset,
                self.surface.width(),
                self.surface.height()
            ));
            let p = self.camera.position;
            lines.push(format!("Camera: ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z));
            lines.push(format!("FPS: {:.2}", self.fps));
        }
        if self.state.paused {
            lines.push("Paused".to_string());
        }
        lines
    }
}

/// Drives a mounted view from a scheduler until the host closes it or the
/// view is cancelled, then unmounts. Returns the number of frames drawn.
pub fn run<C, S>(view: &mut SceneView, container: &mut C, scheduler: &mut S) -> Result<u64>
where
    C: Container + ?Sized,
    S: DisplayScheduler + ?Sized,
{
    let result = drive(view, container, scheduler);
    let unmounted = if view.is_mounted() {
        view.unmount(container)
    } else {
        Ok(())
    };
    result?;
    unmounted?;
    Ok(view.frames())
}

fn drive<C, S>(view: &mut SceneView, container: &mut C, scheduler: &mut S) -> Result<()>
where
    C: Container + ?Sized,
    S: DisplayScheduler + ?Sized,
{
    loop {
        match scheduler.next_event()? {
            HostEvent::Frame(now_ms) => {
                if view.frame(container, now_ms)? == FrameStatus::Cancelled {
                    return Ok(());
                }
            }
            HostEvent::Input(event) => view.handle_input(event),
            HostEvent::Resize(width, height) => view.resize(width, height),
            HostEvent::Close => return Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::MemoryContainer;
    use crate::scheduler::ManualScheduler;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn mount(preset: ScenePreset, container: &mut MemoryContainer) -> SceneView {
        SceneView::mount(
            container,
            preset,
            ViewState::default(),
            &mut StdRng::seed_from_u64(11),
        )
        .unwrap()
    }

    #[test]
    fn cancelled_view_ignores_frames_and_input() {
        let mut container = MemoryContainer::new(32, 24);
        let mut view = mount(ScenePreset::Cube, &mut container);
        view.frame(&mut container, 0.0).unwrap();
        view.cancel_token().cancel();

        let before = view.scene().iter().next().unwrap().1.rotation;
        assert_eq!(view.frame(&mut container, 16.0).unwrap(), FrameStatus::Cancelled);
        view.handle_input(InputEvent::Command(Command::TogglePause));
        assert_eq!(view.scene().iter().next().unwrap().1.rotation, before);
        assert!(!view.state().paused);
        assert_eq!(container.presents(), 1);
    }

    #[test]
    fn pause_freezes_animation_but_keeps_drawing() {
        let mut container = MemoryContainer::new(32, 24);
        let mut view = mount(ScenePreset::Cube, &mut container);
        view.handle_input(InputEvent::Command(Command::TogglePause));
        for i in 0..5 {
            view.frame(&mut container, i as f64 * 16.0).unwrap();
        }
        assert_eq!(view.scene().iter().next().unwrap().1.rotation.x, 0.0);
        assert_eq!(container.presents(), 5);
        assert_eq!(container.overlay(), ["Paused".to_string()]);
    }

    #[test]
    fn debug_overlay_reports_fps() {
        let mut container = MemoryContainer::new(32, 24);
        let mut view = mount(ScenePreset::Cube, &mut container);
        view.handle_input(InputEvent::Command(Command::ToggleDebug));
        // 61 frames at 60 Hz: the first one starts the clock
        for i in 0..=60 {
            view.frame(&mut container, i as f64 * 1000.0 / 60.0).unwrap();
        }
        assert!(container.overlay().iter().any(|line| line == "FPS: 60.00"));
        assert!(container.overlay()[0].starts_with("boba3d "));
    }

    #[test]
    fn drag_orbits_the_cup_camera() {
        let mut container = MemoryContainer::new(40, 40);
        let mut view = mount(ScenePreset::Cup, &mut container);
        view.handle_input(InputEvent::PointerDown { x: 20.0, y: 20.0 });
        view.handle_input(InputEvent::PointerMove { x: 10.0, y: 20.0 });
        view.handle_input(InputEvent::PointerUp);
        for i in 0..30 {
            view.frame(&mut container, i as f64 * 16.0).unwrap();
        }
        let p = view.camera().position;
        assert!(p.x > 1.0, "camera did not orbit: {:?}", p);
        assert!((p.length() - 5.0).abs() < 1e-9);

        view.handle_input(InputEvent::Command(Command::ResetView));
        assert_eq!(view.camera().position, glam::DVec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn cube_view_ignores_pointer_input() {
        let mut container = MemoryContainer::new(32, 24);
        let mut view = mount(ScenePreset::Cube, &mut container);
        view.handle_input(InputEvent::PointerDown { x: 0.0, y: 0.0 });
        view.handle_input(InputEvent::PointerMove { x: 30.0, y: 0.0 });
        view.handle_input(InputEvent::Wheel { delta_y: -1.0 });
        view.frame(&mut container, 0.0).unwrap();
        assert!(view.controls().is_none());
        assert_eq!(view.camera().position, glam::DVec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn resize_updates_surface_and_aspect() {
        let mut container = MemoryContainer::new(32, 24);
        let mut view = mount(ScenePreset::Cube, &mut container);
        let mut scheduler = ManualScheduler::new(0.0, 16.0);
        scheduler.frames(1).push(HostEvent::Resize(50, 10)).frames(1);
        assert_eq!(run(&mut view, &mut container, &mut scheduler).unwrap(), 2);
        assert_eq!((view.surface().width(), view.surface().height()), (50, 10));
        assert_eq!(view.camera().aspect, 5.0);
        assert_eq!(container.last_frame().len(), 500);
    }
}
