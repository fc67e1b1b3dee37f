use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::{FRAC_PI_2, PI};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::event::PathRequest;
use crate::geometry::Pose;

// ============================================================================
// JUNCTION LAYOUT
// ============================================================================

/// Distance from the junction centre to where cars enter and leave
pub const ARM_LENGTH: f64 = 20.0;

/// Offset of each lane from the road centre line (right-hand traffic)
pub const LANE_OFFSET: f64 = 1.5;

/// Step sizes the demo picks from
const DEMO_SPEEDS: [f64; 4] = [0.25, 0.5, 1.0, 1.5];

/// Arm of the four-way junction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Approach {
    North,
    East,
    South,
    West,
}

impl Approach {
    pub const ALL: [Approach; 4] = [Approach::North, Approach::East, Approach::South, Approach::West];

    /// Heading of a car arriving from this arm
    pub fn entry_heading(self) -> f64 {
        match self {
            Approach::North => -FRAC_PI_2,
            Approach::East => PI,
            Approach::South => FRAC_PI_2,
            Approach::West => 0.0,
        }
    }

    /// Where a car arriving from this arm enters the scene
    pub fn entry_pose(self) -> Pose {
        let (x, y) = match self {
            Approach::North => (-LANE_OFFSET, ARM_LENGTH),
            Approach::East => (ARM_LENGTH, LANE_OFFSET),
            Approach::South => (LANE_OFFSET, -ARM_LENGTH),
            Approach::West => (-ARM_LENGTH, -LANE_OFFSET),
        };
        Pose::new(x, y, self.entry_heading())
    }

    /// Where a car leaving through this arm exits the scene
    pub fn exit_position(self) -> (f64, f64) {
        match self {
            Approach::North => (LANE_OFFSET, ARM_LENGTH),
            Approach::East => (ARM_LENGTH, -LANE_OFFSET),
            Approach::South => (-LANE_OFFSET, -ARM_LENGTH),
            Approach::West => (-ARM_LENGTH, LANE_OFFSET),
        }
    }

    /// Arm a car arriving from `self` leaves through
    pub fn exit_for(self, manoeuvre: Manoeuvre) -> Approach {
        match (self, manoeuvre) {
            (Approach::West, Manoeuvre::Straight) => Approach::East,
            (Approach::West, Manoeuvre::Left) => Approach::North,
            (Approach::West, Manoeuvre::Right) => Approach::South,
            (Approach::East, Manoeuvre::Straight) => Approach::West,
            (Approach::East, Manoeuvre::Left) => Approach::South,
            (Approach::East, Manoeuvre::Right) => Approach::North,
            (Approach::South, Manoeuvre::Straight) => Approach::North,
            (Approach::South, Manoeuvre::Left) => Approach::West,
            (Approach::South, Manoeuvre::Right) => Approach::East,
            (Approach::North, Manoeuvre::Straight) => Approach::South,
            (Approach::North, Manoeuvre::Left) => Approach::East,
            (Approach::North, Manoeuvre::Right) => Approach::West,
        }
    }
}

/// What a car does at the junction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Manoeuvre {
    Left,
    Straight,
    Right,
}

impl Manoeuvre {
    pub const ALL: [Manoeuvre; 3] = [Manoeuvre::Left, Manoeuvre::Straight, Manoeuvre::Right];

    /// Signed heading change, counter-clockwise positive
    pub fn turn(self) -> f64 {
        match self {
            Manoeuvre::Left => FRAC_PI_2,
            Manoeuvre::Straight => 0.0,
            Manoeuvre::Right => -FRAC_PI_2,
        }
    }
}

/// Build the request for one car crossing the junction.
///
/// The exit heading is the entry heading plus the turn, never wrapped, so
/// every corner is exactly a quarter turn.
pub fn junction_request(id: impl Into<String>, approach: Approach, manoeuvre: Manoeuvre, speed: f64) -> PathRequest {
    let start = approach.entry_pose();
    let (x, y) = approach.exit_for(manoeuvre).exit_position();
    let end = Pose::new(x, y, start.theta + manoeuvre.turn());

    PathRequest::new(id, start, end).with_speed(speed)
}

// ============================================================================
// REQUEST GENERATOR
// ============================================================================

/// Demo generator settings
#[derive(Debug, Clone)]
pub struct DemoOptions {
    /// Fixed seed for reproducible runs
    pub seed: Option<u64>,
    /// Stop after this many requests
    pub count: Option<usize>,
    pub min_interval: Duration,
    pub max_interval: Duration,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            seed: None,
            count: None,
            min_interval: Duration::from_millis(300),
            max_interval: Duration::from_millis(900),
        }
    }
}

/// Pick a random car
fn random_request(index: usize, rng: &mut StdRng) -> PathRequest {
    let approach = Approach::ALL[rng.gen_range(0..Approach::ALL.len())];
    let manoeuvre = Manoeuvre::ALL[rng.gen_range(0..Manoeuvre::ALL.len())];
    let speed = DEMO_SPEEDS[rng.gen_range(0..DEMO_SPEEDS.len())];

    let mut request = junction_request(format!("car-{}", index), approach, manoeuvre, speed);
    request.timestamp = current_timestamp();
    request
}

/// Generate random junction crossings and send them to the channel.
///
/// Returns once `count` requests are sent or the receiver is dropped.
pub async fn generate_demo_requests(tx: mpsc::Sender<PathRequest>, options: DemoOptions) {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut index = 0;
    loop {
        if options.count.is_some_and(|count| index >= count) {
            break;
        }

        let request = random_request(index, &mut rng);
        log::debug!("demo request {}: {} -> {}", request.id, request.start, request.end);
        if tx.send(request).await.is_err() {
            log::debug!("Request receiver closed, stopping demo after {} requests", index);
            return;
        }
        index += 1;

        let interval = if options.max_interval > options.min_interval {
            rng.gen_range(options.min_interval..options.max_interval)
        } else {
            options.min_interval
        };
        tokio::time::sleep(interval).await;
    }
}

fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
