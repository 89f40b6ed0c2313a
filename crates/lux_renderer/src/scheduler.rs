//! Interruptible multi-threaded frame rendering.
//!
//! A `FrameScheduler` owns a pool of worker threads for the current frame.
//! Each worker renders its own contiguous pixel span straight into the shared
//! [`Framebuffer`], in stride order. The coordinator can pause every worker
//! to present a consistent snapshot, resume them, or tear the pool down and
//! restart the frame (after a camera move, for instance).
//!
//! Lifecycle of the shared state:
//!
//! ```text
//! Work --pause--> Sleep --resume--> Work
//!  |                                  |
//!  +---- start_frame / stop ----> Quit
//!  |
//!  +-- all workers exited, observed by needs_presentation --> AllComplete
//! ```

use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::span::{split_spans, PixelSpan, StrideCursor};
use crate::{Framebuffer, World};

/// Shared lifecycle state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum ThreadState {
    /// Workers render pixels.
    Work = 0,
    /// Workers park until the state changes.
    Sleep = 1,
    /// Workers exit as soon as they observe it.
    Quit = 2,
    /// Coordinator only: every worker of the frame has exited.
    AllComplete = 3,
}

impl ThreadState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ThreadState::Work,
            1 => ThreadState::Sleep,
            2 => ThreadState::Quit,
            _ => ThreadState::AllComplete,
        }
    }
}

/// State shared between the coordinator and the workers.
struct Control {
    state: AtomicU8,
    /// Workers that have not exited
    running: AtomicUsize,
    /// Workers that are not parked
    working: AtomicUsize,
    /// Pixels written this frame
    written: AtomicUsize,
    lock: Mutex<()>,
    changed: Condvar,
}

impl Control {
    fn new() -> Self {
        Self {
            state: AtomicU8::new(ThreadState::Quit as u8),
            running: AtomicUsize::new(0),
            working: AtomicUsize::new(0),
            written: AtomicUsize::new(0),
            lock: Mutex::new(()),
            changed: Condvar::new(),
        }
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        // The mutex guards no data, so a poisoned lock is still usable
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn state(&self) -> ThreadState {
        ThreadState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: ThreadState) {
        let _guard = self.guard();
        self.state.store(state as u8, Ordering::Release);
        self.changed.notify_all();
    }

    /// Park the calling worker while the state is `Sleep`.
    fn park(&self) {
        let guard = self.guard();
        if self.state() != ThreadState::Sleep {
            return;
        }
        self.working.fetch_sub(1, Ordering::AcqRel);
        self.changed.notify_all();

        let _guard = self
            .changed
            .wait_while(guard, |_| self.state() == ThreadState::Sleep)
            .unwrap_or_else(PoisonError::into_inner);
        self.working.fetch_add(1, Ordering::AcqRel);
    }

    /// Block until no worker is actively rendering.
    fn wait_until_idle(&self) {
        let guard = self.guard();
        let _guard = self
            .changed
            .wait_while(guard, |_| self.working.load(Ordering::Acquire) > 0)
            .unwrap_or_else(PoisonError::into_inner);
    }
}

/// Decrements the worker counters when a worker exits, including by panic,
/// so the coordinator never waits on a dead thread.
struct ExitGuard<'a>(&'a Control);

impl Drop for ExitGuard<'_> {
    fn drop(&mut self) {
        let _guard = self.0.guard();
        self.0.working.fetch_sub(1, Ordering::AcqRel);
        self.0.running.fetch_sub(1, Ordering::AcqRel);
        self.0.changed.notify_all();
    }
}

fn run_worker(world: &World, framebuffer: &Framebuffer, control: &Control, span: PixelSpan) {
    let _exit = ExitGuard(control);
    let config = &world.config;
    let width = config.width as usize;
    let mut cursor = StrideCursor::new(span, config.spread_factor);

    loop {
        match control.state() {
            ThreadState::Quit => return,
            ThreadState::Sleep => control.park(),
            ThreadState::Work | ThreadState::AllComplete => {
                let Some(index) = cursor.next() else {
                    return;
                };
                let x = (index % width) as u32;
                let y = (index / width) as u32;
                framebuffer.store(index, world.render_pixel_seeded(x, y, config.seed));
                control.written.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

/// Drives one frame at a time over a fixed-size worker pool.
pub struct FrameScheduler {
    world: Arc<World>,
    framebuffer: Arc<Framebuffer>,
    control: Arc<Control>,
    workers: Vec<JoinHandle<()>>,
    frame_started: Option<Instant>,
}

impl FrameScheduler {
    pub fn new(world: World) -> Self {
        let framebuffer = Framebuffer::new(world.config.width, world.config.height);
        Self {
            world: Arc::new(world),
            framebuffer: Arc::new(framebuffer),
            control: Arc::new(Control::new()),
            workers: Vec::new(),
            frame_started: None,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the scene. Stops the current frame first; call
    /// `start_frame` afterwards to render the change.
    ///
    /// Returns `None` only if a worker thread leaked its handle to the world,
    /// which cannot happen once `stop` has joined the pool.
    pub fn world_mut(&mut self) -> Option<&mut World> {
        self.stop();
        Arc::get_mut(&mut self.world)
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn state(&self) -> ThreadState {
        self.control.state()
    }

    /// Stop any frame in flight, clear the buffer and start rendering a new
    /// frame on a fresh pool of `worker_count` threads.
    pub fn start_frame(&mut self) -> std::io::Result<()> {
        self.stop();

        let (width, height) = (self.world.config.width, self.world.config.height);
        if self.framebuffer.width() != width || self.framebuffer.height() != height {
            self.framebuffer = Arc::new(Framebuffer::new(width, height));
        } else {
            self.framebuffer.clear();
        }

        let spans = split_spans(self.framebuffer.len(), self.world.config.worker_count);
        let count = spans.len();

        self.control.written.store(0, Ordering::Relaxed);
        // Counters are raised before any thread exists, so a pause issued right
        // after this call waits for every worker
        self.control.running.store(count, Ordering::Release);
        self.control.working.store(count, Ordering::Release);
        self.control.set_state(ThreadState::Work);

        for (id, span) in spans.into_iter().enumerate() {
            let world = Arc::clone(&self.world);
            let framebuffer = Arc::clone(&self.framebuffer);
            let control = Arc::clone(&self.control);

            let spawned = thread::Builder::new()
                .name(format!("lux-worker{id}"))
                .spawn(move || run_worker(&world, &framebuffer, &control, span));

            match spawned {
                Ok(handle) => self.workers.push(handle),
                Err(err) => {
                    // Threads that were never spawned must not be waited on
                    let missing = count - id;
                    self.control.running.fetch_sub(missing, Ordering::AcqRel);
                    self.control.working.fetch_sub(missing, Ordering::AcqRel);
                    self.stop();
                    return Err(err);
                }
            }
        }

        self.frame_started = Some(Instant::now());
        log::debug!("Started frame {}x{} on {} workers", width, height, count);
        Ok(())
    }

    /// Ask every worker to quit and join them. Safe to call at any time.
    pub fn stop(&mut self) {
        if self.workers.is_empty() {
            return;
        }
        self.control.set_state(ThreadState::Quit);
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                log::error!("Render worker panicked");
            }
        }
    }

    /// Whether the presenter should pick up a new snapshot.
    ///
    /// Returns `true` while workers are running and once more after the last
    /// one exits (marking the frame `AllComplete`), then `false` until the
    /// next `start_frame`.
    pub fn needs_presentation(&mut self) -> bool {
        if self.control.state() == ThreadState::AllComplete {
            return false;
        }
        if self.control.running.load(Ordering::Acquire) == 0 {
            self.control.set_state(ThreadState::AllComplete);
            if let Some(started) = self.frame_started.take() {
                let (done, total) = self.progress();
                if done == total {
                    log::info!("Frame complete in {:.2?}", started.elapsed());
                } else {
                    log::info!("Frame stopped at {}/{} pixels", done, total);
                }
            }
        }
        true
    }

    /// Every pixel of the current frame has been written.
    pub fn is_frame_complete(&self) -> bool {
        self.control.written.load(Ordering::Acquire) == self.framebuffer.len()
            && self.control.running.load(Ordering::Acquire) == 0
    }

    /// Pause all workers and return the buffer for reading. Pair with
    /// `resume_after_presentation`.
    pub fn acquire_framebuffer_for_presentation(&self) -> &Framebuffer {
        if self.control.state() != ThreadState::AllComplete {
            self.control.set_state(ThreadState::Sleep);
            self.control.wait_until_idle();
        }
        &self.framebuffer
    }

    /// Let paused workers continue. No effect once the frame is complete.
    pub fn resume_after_presentation(&self) {
        if self.control.state() != ThreadState::AllComplete {
            self.control.set_state(ThreadState::Work);
        }
    }

    /// Pixels written so far and pixels in the frame.
    pub fn progress(&self) -> (usize, usize) {
        (
            self.control.written.load(Ordering::Relaxed),
            self.framebuffer.len(),
        )
    }

    pub fn progress_percent(&self) -> f32 {
        let (done, total) = self.progress();
        if total == 0 {
            return 100.0;
        }
        100.0 * done as f32 / total as f32
    }
}

impl Drop for FrameScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        render_reference, CameraPlacement, Color, Environment, Material, RenderConfig, Sphere,
        Texture, YPlane,
    };
    use crate::hittable::Primitive;
    use lux_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    fn test_world(width: u32, height: u32, workers: usize) -> World {
        let config = RenderConfig {
            width,
            height,
            worker_count: workers,
            samples_per_pixel_axis: 1,
            max_bounces: 2,
            spread_factor: 4,
            seed: 17,
            camera: CameraPlacement {
                position: [0.0, 1.0, 5.0],
                forward: [0.0, 0.0, -1.0],
            },
            ..RenderConfig::default()
        };
        let primitives: Vec<Box<dyn Primitive>> = vec![
            Box::new(YPlane::new(
                0.0,
                Material::diffuse(Texture::checker(Color::ONE, Color::splat(0.3))),
            )),
            Box::new(Sphere::new(
                Vec3::new(0.0, 1.0, 0.0),
                1.0,
                Material::metal(Color::splat(0.9), 0.8),
            )),
            Box::new(Sphere::new(
                Vec3::new(2.0, 0.5, 0.0),
                0.5,
                Material::light(Color::splat(3.0)),
            )),
        ];
        let sky = Environment::Uniform(Color::new(0.6, 0.7, 1.0));
        let mut rng = StdRng::seed_from_u64(3);
        World::new(primitives, sky, config, &mut rng).unwrap()
    }

    /// Present until the frame completes, like a display loop would.
    fn drain(scheduler: &mut FrameScheduler) -> usize {
        let mut presentations = 0;
        while scheduler.needs_presentation() {
            let fb = scheduler.acquire_framebuffer_for_presentation();
            let _ = fb.written();
            scheduler.resume_after_presentation();
            presentations += 1;
            thread::sleep(Duration::from_millis(1));
        }
        presentations
    }

    #[test]
    fn test_frame_writes_every_pixel() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut scheduler = FrameScheduler::new(test_world(40, 24, 3));
        scheduler.start_frame().unwrap();
        drain(&mut scheduler);

        assert!(scheduler.is_frame_complete());
        assert_eq!(scheduler.state(), ThreadState::AllComplete);
        assert_eq!(scheduler.framebuffer().written(), 40 * 24);
        assert_eq!(scheduler.progress(), (40 * 24, 40 * 24));
        assert!(!scheduler.needs_presentation());
    }

    #[test]
    fn test_threaded_frame_matches_reference() {
        let mut scheduler = FrameScheduler::new(test_world(24, 16, 5));
        let reference = render_reference(scheduler.world());

        scheduler.start_frame().unwrap();
        drain(&mut scheduler);

        assert_eq!(scheduler.framebuffer().to_argb_bytes(), reference.to_argb_bytes());
    }

    #[test]
    fn test_counters_reach_zero_only_when_done() {
        let mut scheduler = FrameScheduler::new(test_world(32, 32, 4));
        scheduler.start_frame().unwrap();

        loop {
            let running = scheduler.control.running.load(Ordering::Acquire);
            let written = scheduler.control.written.load(Ordering::Acquire);
            if running == 0 {
                assert_eq!(scheduler.control.written.load(Ordering::Acquire), 32 * 32);
                break;
            }
            assert!(written <= 32 * 32);
            thread::yield_now();
        }
        assert!(scheduler.is_frame_complete());
    }

    #[test]
    fn test_pause_holds_workers_still() {
        let mut scheduler = FrameScheduler::new(test_world(64, 48, 4));
        scheduler.start_frame().unwrap();

        let fb = scheduler.acquire_framebuffer_for_presentation();
        let before = fb.to_argb_bytes();
        thread::sleep(Duration::from_millis(20));
        assert_eq!(fb.to_argb_bytes(), before);
        assert_eq!(scheduler.control.working.load(Ordering::Acquire), 0);

        scheduler.resume_after_presentation();
        drain(&mut scheduler);
        assert!(scheduler.is_frame_complete());
    }

    #[test]
    fn test_restart_mid_frame() {
        let mut scheduler = FrameScheduler::new(test_world(48, 32, 3));

        for _ in 0..5 {
            scheduler.start_frame().unwrap();
        }
        drain(&mut scheduler);
        assert!(scheduler.is_frame_complete());

        // Restarting after completion renders a fresh frame
        scheduler.start_frame().unwrap();
        assert_ne!(scheduler.state(), ThreadState::AllComplete);
        drain(&mut scheduler);
        assert_eq!(scheduler.framebuffer().written(), 48 * 32);
    }

    #[test]
    fn test_restart_clears_previous_frame() {
        let config = RenderConfig {
            width: 32,
            height: 24,
            worker_count: 3,
            samples_per_pixel_axis: 1,
            ..RenderConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        let sky_only = World::new(Vec::new(), Environment::Uniform(Color::ONE), config, &mut rng);
        let mut scheduler = FrameScheduler::new(sky_only.unwrap());

        scheduler.start_frame().unwrap();
        drain(&mut scheduler);
        let white = [255, 255, 255, 255];
        assert_eq!(scheduler.framebuffer().pixel(0, 0), white);

        // Same size, so the buffer is reused rather than reallocated
        scheduler.world_mut().unwrap().environment = Environment::Uniform(Color::ZERO);
        scheduler.start_frame().unwrap();

        let fb = scheduler.acquire_framebuffer_for_presentation();
        for y in 0..24 {
            for x in 0..32 {
                assert_ne!(fb.pixel(x, y), white, "stale pixel at ({x}, {y})");
            }
        }
        scheduler.resume_after_presentation();
        drain(&mut scheduler);

        let black = [255, 0, 0, 0];
        let fb = scheduler.framebuffer();
        assert!((0..24).all(|y| (0..32).all(|x| fb.pixel(x, y) == black)));
    }

    #[test]
    fn test_stop_freezes_framebuffer() {
        let mut scheduler = FrameScheduler::new(test_world(64, 48, 4));
        scheduler.start_frame().unwrap();
        scheduler.stop();

        let before = scheduler.framebuffer().to_argb_bytes();
        let written = scheduler.progress().0;
        thread::sleep(Duration::from_millis(20));

        assert_eq!(scheduler.framebuffer().to_argb_bytes(), before);
        assert_eq!(scheduler.progress().0, written);
    }

    #[test]
    fn test_world_mut_applies_on_next_frame() {
        let mut scheduler = FrameScheduler::new(test_world(16, 8, 2));
        scheduler.start_frame().unwrap();

        let world = scheduler.world_mut().unwrap();
        world.camera.orbit_y(0.3, Vec3::ZERO);
        world.config.width = 20;
        let camera = world.camera;

        scheduler.start_frame().unwrap();
        drain(&mut scheduler);

        assert_eq!(scheduler.world().camera, camera);
        assert_eq!(scheduler.framebuffer().width(), 20);
        assert_eq!(scheduler.framebuffer().written(), 20 * 8);
    }

    #[test]
    fn test_more_workers_than_pixels() {
        let mut scheduler = FrameScheduler::new(test_world(2, 2, 9));
        scheduler.start_frame().unwrap();
        drain(&mut scheduler);
        assert!(scheduler.is_frame_complete());
    }

    #[test]
    fn test_stop_and_drop_join_workers() {
        let mut scheduler = FrameScheduler::new(test_world(64, 64, 4));
        scheduler.start_frame().unwrap();
        scheduler.stop();

        assert_eq!(scheduler.control.running.load(Ordering::Acquire), 0);
        assert_eq!(scheduler.state(), ThreadState::Quit);

        scheduler.start_frame().unwrap();
        drop(scheduler);
    }
}
