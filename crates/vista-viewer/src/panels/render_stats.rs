//! Render statistics panel: FPS counter, frame timing and scene counts

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Tracks rendering performance metrics
pub struct RenderStats {
    frame_times: VecDeque<Instant>,
    fps: f32,
    last_update: Instant,
    /// Draw calls recorded last frame
    pub draw_items: usize,
}

impl Default for RenderStats {
    fn default() -> Self {
        Self {
            frame_times: VecDeque::new(),
            fps: 0.0,
            last_update: Instant::now(),
            draw_items: 0,
        }
    }
}

impl RenderStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a frame was rendered
    pub fn record_frame(&mut self) {
        self.record_frame_at(Instant::now());
    }

    fn record_frame_at(&mut self, now: Instant) {
        self.frame_times.push_back(now);

        // Keep only frames from the last second
        let cutoff = now.checked_sub(Duration::from_secs(1)).unwrap_or(now);
        while self.frame_times.front().is_some_and(|&t| t < cutoff) {
            self.frame_times.pop_front();
        }

        // Update FPS every 250ms
        if now.duration_since(self.last_update) > Duration::from_millis(250) {
            self.fps = self.frame_times.len() as f32;
            self.last_update = now;
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn ui(&self, ui: &mut egui::Ui, entity_count: usize) {
        ui.monospace(format!("FPS: {:.0}", self.fps));
        if self.fps > 0.0 {
            ui.monospace(format!("Frame: {:.1}ms", 1000.0 / self.fps));
        }
        ui.monospace(format!("Entities: {}", entity_count));
        ui.monospace(format!("Draws: {}", self.draw_items));
    }
}
