//! Simulation state management: line records and world storage.

use crate::geometry::{Point, Vector};
use linescreen_core::error::{LineScreenError, Result};
use serde::Serialize;
use std::collections::HashMap;

/// A moving line segment in the simulation.
///
/// Endpoints and velocity are read-only during a detection step; they are
/// mutated only by the resolver and the position advance between steps.
#[derive(Debug, Clone, Serialize)]
pub struct Line {
    /// Stable, unique identifier assigned by the caller
    pub id: u32,
    /// First endpoint
    pub p1: Point,
    /// Second endpoint
    pub p2: Point,
    /// Velocity (units per second)
    velocity: Vector,
    /// Cached velocity magnitude
    speed: f64,
}

impl Line {
    /// Creates a new line segment.
    pub fn new(id: u32, p1: Point, p2: Point, velocity: Vector) -> Self {
        Self {
            id,
            p1,
            p2,
            velocity,
            speed: velocity.norm(),
        }
    }

    /// Sets the endpoints.
    pub fn with_endpoints(mut self, p1: Point, p2: Point) -> Self {
        self.p1 = p1;
        self.p2 = p2;
        self
    }

    /// Sets the velocity, refreshing the cached speed.
    pub fn with_velocity(mut self, velocity: Vector) -> Self {
        self.set_velocity(velocity);
        self
    }

    /// Returns the velocity.
    pub fn velocity(&self) -> Vector {
        self.velocity
    }

    /// Updates the velocity and the cached speed together.
    pub fn set_velocity(&mut self, velocity: Vector) {
        self.velocity = velocity;
        self.speed = velocity.norm();
    }

    /// Returns the cached velocity magnitude.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Returns the segment direction `p2 - p1` (not normalized).
    pub fn direction(&self) -> Vector {
        self.p2 - self.p1
    }

    /// Returns the segment length.
    pub fn length(&self) -> f64 {
        self.direction().norm()
    }

    /// Advances both endpoints by one timestep.
    pub fn advance(&mut self, dt: f64) {
        let delta = self.velocity * dt;
        self.p1 += delta;
        self.p2 += delta;
    }

    /// Checks the record for non-finite coordinates.
    pub fn validate(&self) -> Result<()> {
        let finite = self.p1.x.is_finite()
            && self.p1.y.is_finite()
            && self.p2.x.is_finite()
            && self.p2.y.is_finite()
            && self.velocity.x.is_finite()
            && self.velocity.y.is_finite();
        if !finite {
            return Err(LineScreenError::validation_field(
                format!("Line {} has non-finite coordinates", self.id),
                format!("line[{}]", self.id),
            ));
        }
        Ok(())
    }
}

/// Complete simulation state: the line set owned by the driver.
///
/// The spatial index borrows this storage; nothing in the collision
/// pipeline copies or mutates it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct World {
    /// All lines, indexed by array position
    lines: Vec<Line>,
    /// Lookup from stable line id to array position
    #[serde(skip)]
    index_of: HashMap<u32, usize>,
}

impl World {
    /// Creates an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a world from a line set, validating records and id
    /// uniqueness.
    pub fn from_lines(lines: Vec<Line>) -> Result<Self> {
        let mut index_of = HashMap::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            line.validate()?;
            if index_of.insert(line.id, i).is_some() {
                return Err(LineScreenError::validation_field(
                    format!("Duplicate line id {}", line.id),
                    format!("line[{}]", line.id),
                ));
            }
        }
        Ok(Self { lines, index_of })
    }

    /// Returns the line slice.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Returns the mutable line slice.
    pub fn lines_mut(&mut self) -> &mut [Line] {
        &mut self.lines
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when the world holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the array position of a line id.
    pub fn position_of(&self, id: u32) -> Option<usize> {
        self.index_of.get(&id).copied()
    }

    /// Borrows two distinct lines mutably by id.
    pub fn line_pair_mut(&mut self, id1: u32, id2: u32) -> Result<(&mut Line, &mut Line)> {
        let i = self
            .position_of(id1)
            .ok_or_else(|| LineScreenError::validation(format!("Unknown line id {id1}")))?;
        let j = self
            .position_of(id2)
            .ok_or_else(|| LineScreenError::validation(format!("Unknown line id {id2}")))?;
        if i == j {
            return Err(LineScreenError::validation(format!(
                "Line pair ({id1}, {id2}) refers to the same line"
            )));
        }

        let (lo, hi) = (i.min(j), i.max(j));
        let (head, tail) = self.lines.split_at_mut(hi);
        let (a, b) = (&mut head[lo], &mut tail[0]);
        if i < j {
            Ok((a, b))
        } else {
            Ok((b, a))
        }
    }

    /// Advances every line by one timestep.
    pub fn advance(&mut self, dt: f64) {
        for line in &mut self.lines {
            line.advance(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_line(id: u32) -> Line {
        Line::new(
            id,
            Point::new(0.1 * id as f64, 0.2),
            Point::new(0.1 * id as f64 + 0.05, 0.2),
            Vector::new(0.1, -0.2),
        )
    }

    #[test]
    fn test_speed_cache_follows_velocity() {
        let mut line = sample_line(1);
        assert!((line.speed() - (0.1f64 * 0.1 + 0.2 * 0.2).sqrt()).abs() < 1e-12);

        line.set_velocity(Vector::new(3.0, 4.0));
        assert_eq!(line.speed(), 5.0);
    }

    #[test]
    fn test_advance_moves_both_endpoints() {
        let mut line = Line::new(
            7,
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Vector::new(0.5, 0.25),
        );
        line.advance(2.0);
        assert_eq!(line.p1, Point::new(1.0, 0.5));
        assert_eq!(line.p2, Point::new(2.0, 0.5));
    }

    #[test]
    fn test_world_rejects_duplicate_ids() {
        let lines = vec![sample_line(1), sample_line(1)];
        assert!(World::from_lines(lines).is_err());
    }

    #[test]
    fn test_world_rejects_non_finite() {
        let bad = Line::new(
            2,
            Point::new(f64::NAN, 0.0),
            Point::new(1.0, 0.0),
            Vector::new(0.0, 0.0),
        );
        assert!(World::from_lines(vec![bad]).is_err());
    }

    #[test]
    fn test_line_pair_mut_order() {
        let mut world = World::from_lines(vec![sample_line(5), sample_line(3)]).unwrap();
        let (a, b) = world.line_pair_mut(5, 3).unwrap();
        assert_eq!(a.id, 5);
        assert_eq!(b.id, 3);
    }
}
