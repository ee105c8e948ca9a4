use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use glam::Vec3;
use log::{debug, info};

use crate::core::{Axis, Shape};
use crate::pipeline::{RenderMode, TerminalPipeline};
use crate::Metrics;

/// Rotation rate change per key press, in radians per tick.
pub const ROTATION_STEP: f32 = 0.02;
pub const TICK_INTERVAL: Duration = Duration::from_millis(20);

/// State shared between the input listener and the render loop.
///
/// Every field is an independent scalar, so each one is its own atomic and
/// relaxed ordering is enough. Rates are stored as `f32` bit patterns.
#[derive(Debug)]
pub struct Controls {
    running: AtomicBool,
    paused: AtomicBool,
    debug: AtomicBool,
    mode: AtomicU8,
    rates: [AtomicU32; 3],
}

impl Default for Controls {
    fn default() -> Self {
        Self::new(RenderMode::default(), false)
    }
}

impl Controls {
    pub fn new(mode: RenderMode, debug: bool) -> Self {
        Self {
            running: AtomicBool::new(true),
            paused: AtomicBool::new(false),
            debug: AtomicBool::new(debug),
            mode: AtomicU8::new(mode.as_u8()),
            rates: [
                AtomicU32::new(0f32.to_bits()),
                AtomicU32::new(0f32.to_bits()),
                AtomicU32::new(0f32.to_bits()),
            ],
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    /// Flip the pause flag, returning the new state.
    pub fn toggle_pause(&self) -> bool {
        let paused = !self.paused.fetch_xor(true, Ordering::Relaxed);
        debug!("Paused: {}", paused);
        paused
    }

    pub fn debug(&self) -> bool {
        self.debug.load(Ordering::Relaxed)
    }

    pub fn toggle_debug(&self) -> bool {
        let debug = !self.debug.fetch_xor(true, Ordering::Relaxed);
        debug!("Debug normals: {}", debug);
        debug
    }

    pub fn mode(&self) -> RenderMode {
        RenderMode::from_u8(self.mode.load(Ordering::Relaxed))
    }

    pub fn cycle_mode(&self) -> RenderMode {
        let prev = self
            .mode
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |m| {
                Some(RenderMode::from_u8(m).next().as_u8())
            })
            .unwrap_or_else(|m| m);
        let mode = RenderMode::from_u8(prev).next();
        debug!("Render mode: {}", mode);
        mode
    }

    pub fn rate(&self, axis: Axis) -> f32 {
        f32::from_bits(self.rates[axis.index()].load(Ordering::Relaxed))
    }

    pub fn rates(&self) -> Vec3 {
        Vec3::new(self.rate(Axis::X), self.rate(Axis::Y), self.rate(Axis::Z))
    }

    /// Press-to-spin, opposite-press-to-stop.
    ///
    /// A still axis takes `delta`. A spinning axis stops only when `delta`
    /// exactly cancels its rate; any other press is ignored. Returns the rate
    /// after the press.
    pub fn set_axis_rotation(&self, axis: Axis, delta: f32) -> f32 {
        let result = self.rates[axis.index()].fetch_update(
            Ordering::Relaxed,
            Ordering::Relaxed,
            |bits| {
                let current = f32::from_bits(bits);
                if current == 0.0 {
                    Some(delta.to_bits())
                } else if current + delta == 0.0 {
                    Some(0f32.to_bits())
                } else {
                    None
                }
            },
        );
        match result {
            Ok(prev) => {
                let rate = if f32::from_bits(prev) == 0.0 { delta } else { 0.0 };
                debug!("Rotation rate on {:?} is now {}", axis, rate);
                rate
            }
            Err(current) => f32::from_bits(current),
        }
    }
}

/// Owns the scene and drives reset -> rotate -> draw -> present on a timer.
pub struct Engine<W: Write> {
    pub shape: Shape,
    pub pipeline: TerminalPipeline<W>,
    controls: Arc<Controls>,
    metrics: Metrics,
    tick_interval: Duration,
}

impl<W: Write> Engine<W> {
    pub fn new(shape: Shape, pipeline: TerminalPipeline<W>, controls: Arc<Controls>) -> Self {
        Self {
            shape,
            pipeline,
            controls,
            metrics: Metrics::new(),
            tick_interval: TICK_INTERVAL,
        }
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Run one frame. Returns whether the frame reached the writer.
    pub fn tick(&mut self) -> io::Result<bool> {
        self.pipeline.reset();

        if !self.controls.is_paused() {
            self.shape.rotate(self.controls.rates());
        }

        self.pipeline.mode = self.controls.mode();
        self.pipeline.draw_shape(&self.shape, self.controls.debug());
        self.pipeline.draw()
    }

    /// Tick until `Controls::stop` is called.
    pub fn run(&mut self) -> io::Result<()> {
        info!("Render loop started, tick every {:?}", self.tick_interval);
        while self.controls.is_running() {
            let start = Instant::now();
            let written = self.tick()?;
            let elapsed = start.elapsed();
            self.metrics.update(elapsed, written);
            if self.metrics.report_due() {
                debug!("{}", self.metrics);
            }
            thread::sleep(self.tick_interval.saturating_sub(elapsed));
        }
        info!("Render loop stopped: {}", self.metrics);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{Grid, Rasterizer};

    fn engine(controls: Arc<Controls>) -> Engine<Vec<u8>> {
        let pipeline = TerminalPipeline::new(Grid::new(64, 48), Rasterizer::default(), Vec::new());
        Engine::new(Shape::cube(Vec3::ZERO, 30.0), pipeline, controls)
    }

    #[test]
    fn rate_toggle_rule() {
        let c = Controls::default();
        // Still axis takes the press
        assert_eq!(c.set_axis_rotation(Axis::X, ROTATION_STEP), ROTATION_STEP);
        // Same direction again is ignored
        assert_eq!(c.set_axis_rotation(Axis::X, ROTATION_STEP), ROTATION_STEP);
        // Opposite direction cancels
        assert_eq!(c.set_axis_rotation(Axis::X, -ROTATION_STEP), 0.0);
        // And from rest the opposite direction spins the other way
        assert_eq!(c.set_axis_rotation(Axis::X, -ROTATION_STEP), -ROTATION_STEP);
        // A press that does not exactly cancel is ignored
        assert_eq!(c.set_axis_rotation(Axis::X, 0.05), -ROTATION_STEP);
        assert_eq!(c.rates(), Vec3::new(-ROTATION_STEP, 0.0, 0.0));
    }

    #[test]
    fn axes_are_independent() {
        let c = Controls::default();
        c.set_axis_rotation(Axis::Y, ROTATION_STEP);
        c.set_axis_rotation(Axis::Z, -ROTATION_STEP);
        assert_eq!(c.rates(), Vec3::new(0.0, ROTATION_STEP, -ROTATION_STEP));
    }

    #[test]
    fn concurrent_presses_never_tear_rates() {
        let controls = Arc::new(Controls::default());
        let allowed = |r: f32| r == 0.0 || r == ROTATION_STEP || r == -ROTATION_STEP;

        let writers: Vec<_> = (0..4)
            .map(|i| {
                let controls = controls.clone();
                thread::spawn(move || {
                    let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
                    for n in 0..5_000 {
                        let axis = Axis::ALL[n % 3];
                        let rate = controls.set_axis_rotation(axis, sign * ROTATION_STEP);
                        assert!(allowed(rate), "press returned {rate}");
                    }
                })
            })
            .collect();
        let reader = {
            let controls = controls.clone();
            thread::spawn(move || {
                for _ in 0..20_000 {
                    let rates = controls.rates();
                    assert!(rates.to_array().into_iter().all(allowed), "read {rates}");
                }
            })
        };

        for handle in writers {
            handle.join().unwrap();
        }
        reader.join().unwrap();
        assert!(controls.rates().to_array().into_iter().all(allowed));
    }

    #[test]
    fn toggles_flip_and_report() {
        let c = Controls::new(RenderMode::Culled, false);
        assert!(c.toggle_pause());
        assert!(c.is_paused());
        assert!(!c.toggle_pause());
        assert!(c.toggle_debug());
        assert_eq!(c.cycle_mode(), RenderMode::Solid);
        assert_eq!(c.mode(), RenderMode::Solid);
        assert_eq!(c.cycle_mode(), RenderMode::Wireframe);
    }

    #[test]
    fn still_scene_is_written_once() {
        let controls = Arc::new(Controls::default());
        let mut e = engine(controls);
        assert!(e.tick().unwrap());
        assert!(!e.tick().unwrap());
        assert!(!e.tick().unwrap());
    }

    #[test]
    fn spinning_scene_rotates_each_tick() {
        let controls = Arc::new(Controls::default());
        controls.set_axis_rotation(Axis::Y, 0.3);
        let mut e = engine(controls.clone());
        let before = e.shape.vertices().to_vec();
        assert!(e.tick().unwrap());
        assert_ne!(e.shape.vertices(), &before[..]);
        assert!(e.tick().unwrap());
    }

    #[test]
    fn paused_scene_holds_still() {
        let controls = Arc::new(Controls::default());
        controls.set_axis_rotation(Axis::X, 0.3);
        controls.toggle_pause();
        let mut e = engine(controls);
        let before = e.shape.clone();
        e.tick().unwrap();
        assert_eq!(e.shape, before);
        assert!(!e.tick().unwrap());
    }

    #[test]
    fn mode_change_reaches_pipeline() {
        let controls = Arc::new(Controls::new(RenderMode::Culled, false));
        let mut e = engine(controls.clone());
        e.tick().unwrap();
        controls.cycle_mode();
        assert!(e.tick().unwrap());
        assert_eq!(e.pipeline.mode, RenderMode::Solid);
    }

    #[test]
    fn run_exits_once_stopped() {
        let controls = Arc::new(Controls::default());
        controls.stop();
        let mut e = engine(controls).with_tick_interval(Duration::ZERO);
        e.run().unwrap();
        assert_eq!(e.metrics().ticks, 0);
    }

    #[test]
    fn run_on_a_thread_stops_on_request() {
        let controls = Arc::new(Controls::default());
        let mut e = engine(controls.clone()).with_tick_interval(Duration::from_millis(1));
        let handle = thread::spawn(move || {
            e.run().map(|_| e.metrics().ticks)
        });
        thread::sleep(Duration::from_millis(20));
        controls.stop();
        let ticks = handle.join().unwrap().unwrap();
        assert!(ticks > 0);
    }
}
