//! Delivery physics
//!
//! Maps a normalized 5-component bowling action to the physical parameters
//! of one delivery. Pure and deterministic: all randomness in the system
//! lives in the batsman model and the environment, never here.
//!
//! The trajectory model is deliberately simple (no drag/lift integration):
//! flight time is `length / speed`, and spin produces a linear lateral
//! drift over that flight time.

use serde::{Deserialize, Serialize};

use crate::error::{EnvError, Result};

// ============================================================
// Pitch Constants
// ============================================================
pub mod pitch {
    //! Fixed affine maps from the normalized action box to physical units.

    /// Slowest delivery (m/s). 20 m/s = 72 km/h.
    pub const SPEED_MIN_MPS: f32 = 20.0;
    /// Speed span (m/s); fastest delivery is 60 m/s = 216 km/h.
    pub const SPEED_SPAN_MPS: f32 = 40.0;

    /// Half-width of the line corridor (m). Negative = off side, positive = leg side.
    pub const LINE_HALF_WIDTH_M: f32 = 0.5;

    /// Fullest length (m from the batsman): a yorker.
    pub const LENGTH_MIN_M: f32 = 4.0;
    /// Length span (m); shortest delivery pitches 14 m out.
    pub const LENGTH_SPAN_M: f32 = 10.0;

    /// Maximum spin rate (rpm).
    pub const SPIN_MAX_RPM: f32 = 50.0;
    /// Normalized spin-type input at or above this is legspin.
    pub const SPIN_KIND_THRESHOLD: f32 = 0.5;

    /// Lateral drift per (rpm * second) of flight.
    pub const K_SPIN_DRIFT: f32 = 0.001;
    /// Off-the-pitch deviation per rpm.
    pub const K_BOUNCE: f32 = 0.002;
}

// ============================================================
// Action
// ============================================================

/// Bowler action: five normalized scalars in `[0, 1]`.
///
/// Out-of-range components are clamped deterministically at construction
/// (the usual RL-environment tolerance); only a wrong component count is
/// an error. See [`Action::from_slice`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Release speed, 0 = slowest, 1 = fastest.
    pub speed: f32,
    /// Line, 0 = widest off side, 1 = widest leg side.
    pub line: f32,
    /// Length, 0 = yorker, 1 = shortest.
    pub length: f32,
    /// Spin kind selector: below 0.5 offspin, otherwise legspin.
    pub spin_type: f32,
    /// Spin rate, 0 = none, 1 = maximum.
    pub spin_magnitude: f32,
}

impl Action {
    /// Number of action components.
    pub const DIM: usize = 5;

    /// Build an action, clamping every component into `[0, 1]`.
    pub fn new(speed: f32, line: f32, length: f32, spin_type: f32, spin_magnitude: f32) -> Self {
        Self {
            speed: speed.clamp(0.0, 1.0),
            line: line.clamp(0.0, 1.0),
            length: length.clamp(0.0, 1.0),
            spin_type: spin_type.clamp(0.0, 1.0),
            spin_magnitude: spin_magnitude.clamp(0.0, 1.0),
        }
    }

    /// Build an action from a flat slice, e.g. a policy network output.
    ///
    /// Fails on wrong dimensionality; component values are clamped.
    pub fn from_slice(values: &[f32]) -> Result<Self> {
        if values.len() != Self::DIM {
            return Err(EnvError::ActionDimension { expected: Self::DIM, found: values.len() });
        }
        Ok(Self::new(values[0], values[1], values[2], values[3], values[4]))
    }

    /// Flat component view in canonical order.
    pub fn to_array(&self) -> [f32; Self::DIM] {
        [self.speed, self.line, self.length, self.spin_type, self.spin_magnitude]
    }
}

// ============================================================
// Delivery Parameters
// ============================================================

/// Spin family of a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinKind {
    /// Turns away from a right-handed batsman.
    Off,
    /// Turns into a right-handed batsman.
    Leg,
}

impl SpinKind {
    /// Sign of the lateral drift this spin produces.
    pub fn drift_direction(&self) -> f32 {
        match self {
            SpinKind::Off => -1.0,
            SpinKind::Leg => 1.0,
        }
    }
}

/// Physical characteristics of one bowled ball.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeliveryParams {
    /// Release speed (20-60 m/s).
    pub speed_mps: f32,
    /// Line at release (-0.5..0.5 m).
    pub initial_line: f32,
    /// Pitching length (4-14 m from the batsman).
    pub length_m: f32,
    /// Line at the batsman after spin drift.
    pub final_line: f32,
    /// Time to reach the batsman (s).
    pub flight_time_s: f32,
    /// Deviation off the pitch (m). Diagnostic only: the batsman model
    /// reads `final_line`, not this, so it is reported but never consumed.
    pub bounce_deviation: f32,
    /// Spin family.
    pub spin: SpinKind,
    /// Spin rate (0-50 rpm).
    pub spin_magnitude: f32,
}

/// Simulate one delivery from a normalized action.
///
/// Output ranges follow directly from the affine maps in [`pitch`]:
/// speed in [20, 60], initial line in [-0.5, 0.5], length in [4, 14],
/// spin in [0, 50], flight time strictly positive.
pub fn simulate_delivery(action: &Action) -> Result<DeliveryParams> {
    let speed_mps = pitch::SPEED_MIN_MPS + action.speed * pitch::SPEED_SPAN_MPS;
    let initial_line = -pitch::LINE_HALF_WIDTH_M + action.line;
    let length_m = pitch::LENGTH_MIN_M + action.length * pitch::LENGTH_SPAN_M;
    let spin_magnitude = action.spin_magnitude * pitch::SPIN_MAX_RPM;
    let spin = if action.spin_type < pitch::SPIN_KIND_THRESHOLD {
        SpinKind::Off
    } else {
        SpinKind::Leg
    };

    // Structurally impossible with SPEED_MIN_MPS > 0, but the division
    // below must never see a non-positive speed.
    if speed_mps <= 0.0 {
        return Err(EnvError::DegenerateDelivery { speed_mps });
    }
    let flight_time_s = length_m / speed_mps;

    let drift = spin_magnitude * flight_time_s * pitch::K_SPIN_DRIFT;
    let final_line = initial_line + spin.drift_direction() * drift;

    let bounce_deviation = spin_magnitude * pitch::K_BOUNCE;

    Ok(DeliveryParams {
        speed_mps,
        initial_line,
        length_m,
        final_line,
        flight_time_s,
        bounce_deviation,
        spin,
        spin_magnitude,
    })
}

// ============================================================
// Tests
// ============================================================
