//! Consumer-side helpers for walking a planned path at a fixed cadence.

use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::mpsc;

use crate::event::{PlanOutput, PoseFrame, RequestId};
use crate::geometry::Pose;
use crate::path::Path;

/// Walks a path pose by pose
#[derive(Debug, Clone)]
pub struct PathCursor {
    path: Path,
    index: usize,
}

impl PathCursor {
    pub fn new(path: Path) -> Self {
        Self { path, index: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.path.len().saturating_sub(self.index)
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.path.len()
    }

    /// Fraction of poses consumed, 0.0 to 1.0
    pub fn progress(&self) -> f32 {
        if self.path.is_empty() {
            return 1.0;
        }
        self.index as f32 / self.path.len() as f32
    }
}

impl Iterator for PathCursor {
    type Item = Pose;

    fn next(&mut self) -> Option<Pose> {
        let pose = self.path.get(self.index).copied()?;
        self.index += 1;
        Some(pose)
    }
}

/// Fixed-rate tick bookkeeping
pub struct TickLoop {
    tick_duration: Duration,
    last_tick: Instant,
}

impl TickLoop {
    pub fn new(tick_duration: Duration) -> Self {
        Self {
            tick_duration,
            last_tick: Instant::now(),
        }
    }

    pub fn ticked(&mut self) {
        self.last_tick = Instant::now();
    }

    /// Time until next tick
    pub fn time_until_next_tick(&self) -> Duration {
        self.tick_duration.saturating_sub(self.last_tick.elapsed())
    }
}

/// Emit one frame per tick until the path is exhausted.
///
/// Returns the number of frames sent. Stops early when the receiver is gone.
pub async fn drive(
    id: RequestId,
    path: Path,
    tick_duration: Duration,
    sink: mpsc::Sender<PlanOutput>,
) -> usize {
    let mut cursor = PathCursor::new(path);
    let mut ticks = TickLoop::new(tick_duration);
    let mut sent = 0;

    log::info!("Driving {} over {} poses", id, cursor.remaining());

    while let Some(pose) = cursor.next() {
        let frame = PoseFrame {
            id: id.clone(),
            index: sent,
            pose,
            emitted_at: Utc::now(),
        };

        if sink.send(PlanOutput::Frame(frame)).await.is_err() {
            log::debug!(
                "Frame sink closed, stopping {} at {:.0}%",
                id,
                cursor.progress() * 100.0
            );
            break;
        }
        sent += 1;
        ticks.ticked();

        if !cursor.is_finished() {
            tokio::time::sleep(ticks.time_until_next_tick()).await;
        }
    }

    sent
}
