//! Sweep and minimum-movement resolver
//!
//! Moves one entity from its previous position towards its goal, one axis at a
//! time. X is resolved before Y and the shapes are re-based onto the corrected
//! X before Y is tested, which is what lets movers slide along walls.
//!
//! Bullet movers split their motion into sub-steps no longer than their
//! smallest shape so they cannot pass through thin obstacles. Once an axis is
//! blocked it stays blocked for the remaining sub-steps.
//!
//! The resolver does not know about the entity table. Obstacles come from a
//! [`CandidateSource`], which the world implements over its live sets and the
//! terrain collaborator.

use crate::core::config::CollisionConfig;
use crate::ecs::{BodyFlags, CollisionBody, EntityId};
use crate::foundation::math::{is_finite, sign, Axis, Vec2};
use crate::physics::collision::{contact_separation, shapes_collide, Aabb, CollisionShape};
use crate::physics::collision_data::{CollisionDataCollection, CollisionDataEntry};
use crate::physics::collision_profile::CollisionProfile;
use crate::physics::collision_types::CollisionType;
use crate::physics::CollisionError;

/// Rank given to shapes without an owning entity (terrain)
pub const TERRAIN_RANK: u64 = u64::MAX;

/// An obstacle shape that may block the mover
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Owning entity; `None` for terrain
    pub owner: Option<EntityId>,
    /// Tie-break order; the lowest rank wins equal contacts
    pub rank: u64,
    /// Index of the owning profile on its entity
    pub profile: usize,
    /// Collision type of the owning profile
    pub collision_type: CollisionType,
    /// World-space shape
    pub shape: CollisionShape,
    /// One-way obstacle, solid from above only
    pub jump_through: bool,
}

/// Supplier of obstacles for a sweep
pub trait CandidateSource {
    /// Append every obstacle of a type in `profile.solid_types` whose bounds
    /// overlap `swept`
    ///
    /// `previous` is the bounds of the mover's profile at the start of the
    /// step; terrain receives it along with `swept`.
    fn gather(&self, mover: EntityId, profile: &MoverProfile, swept: &Aabb, previous: &Aabb, out: &mut Vec<Candidate>);
}

/// Snapshot of one blocking-capable profile of the mover
#[derive(Debug, Clone)]
pub struct MoverProfile {
    /// Index of the profile on its entity
    pub index: usize,
    /// Collision type of the profile
    pub collision_type: CollisionType,
    /// Types the profile is blocked by
    pub solid_types: Vec<CollisionType>,
    /// Shapes of the profile; only kind and offset are used
    pub shapes: Vec<CollisionShape>,
}

impl MoverProfile {
    /// Snapshot a profile, or `None` if it declares no blocking collisions
    pub fn from_profile(index: usize, profile: &CollisionProfile) -> Option<Self> {
        if !profile.has_solid() {
            return None;
        }
        Some(Self {
            index,
            collision_type: profile.collision_type(),
            solid_types: profile.solid_types().collect(),
            shapes: profile.previous_shapes().to_vec(),
        })
    }
}

/// Snapshot of an entity about to be resolved
///
/// Owned so the candidate source can borrow the entity table while the
/// mover is being resolved.
#[derive(Debug, Clone)]
pub struct Mover {
    /// Entity being moved
    pub entity: EntityId,
    /// Position at the end of the previous tick
    pub previous: Vec2,
    /// Position requested for this tick
    pub goal: Vec2,
    /// Behaviour flags
    pub flags: BodyFlags,
    /// Profiles that can be blocked
    pub profiles: Vec<MoverProfile>,
}

impl Mover {
    /// Snapshot a registered body
    pub fn from_body(entity: EntityId, body: &CollisionBody) -> Self {
        Self {
            entity,
            previous: body.previous_position(),
            goal: body.position(),
            flags: body.flags(),
            profiles: body
                .profiles()
                .iter()
                .enumerate()
                .filter_map(|(index, profile)| MoverProfile::from_profile(index, profile))
                .collect(),
        }
    }

    /// Smallest width and height among the blocking profiles' shapes
    pub fn min_shape_size(&self) -> (f32, f32) {
        self.profiles
            .iter()
            .flat_map(|profile| profile.shapes.iter())
            .fold((f32::INFINITY, f32::INFINITY), |(w, h), shape| {
                let (sw, sh) = shape.size();
                (w.min(sw), h.min(sh))
            })
    }
}

/// Outcome of resolving one mover
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Corrected position
    pub position: Vec2,
    /// Blocking contact per axis
    pub collisions: CollisionDataCollection,
    /// Sub-steps actually run
    pub steps: u32,
}

/// Number of sub-steps for a bullet moving by `delta`
///
/// Each axis contributes `|delta| / size`; an axis with no usable size
/// contributes nothing. The result is at least 1 and at most `cap`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn bullet_steps(delta: Vec2, min_width: f32, min_height: f32, cap: u32) -> u32 {
    let ratio = |distance: f32, size: f32| {
        if size > 0.0 && size.is_finite() {
            distance.abs() / size
        } else {
            0.0
        }
    };
    let steps = ratio(delta.x, min_width).max(ratio(delta.y, min_height)).ceil();
    if !steps.is_finite() || steps < 1.0 {
        return 1;
    }
    (steps as u32).clamp(1, cap.max(1))
}

/// Best contact found on one axis
#[derive(Debug, Clone, Copy)]
struct AxisContact {
    position: f32,
    travel: f32,
    this_type: CollisionType,
    this_profile: usize,
    this_shape: CollisionShape,
    candidate: Candidate,
}

impl AxisContact {
    fn beats(&self, other: &Self) -> bool {
        self.travel < other.travel || (self.travel == other.travel && self.candidate.rank < other.candidate.rank)
    }
}

/// Sweep resolver with scratch buffers reused across movers
#[derive(Debug)]
pub struct Resolver {
    max_steps: u32,
    epsilon: f32,
    candidates: Vec<Candidate>,
    shapes: Vec<CollisionShape>,
}

impl Resolver {
    /// Create a resolver for the given settings
    pub fn new(config: &CollisionConfig) -> Self {
        Self {
            max_steps: config.effective_bullet_steps(),
            epsilon: config.contact_epsilon,
            candidates: Vec::new(),
            shapes: Vec::new(),
        }
    }

    /// Move `mover` from its previous position towards its goal
    pub fn resolve<S: CandidateSource + ?Sized>(&mut self, mover: &Mover, source: &S) -> Result<Resolution, CollisionError> {
        for v in [mover.goal, mover.previous] {
            if !is_finite(&v) {
                return Err(CollisionError::NonFinitePosition { entity: mover.entity, x: v.x, y: v.y });
            }
        }

        let mut resolution = Resolution {
            position: mover.goal,
            collisions: CollisionDataCollection::new(),
            steps: 0,
        };
        let delta = mover.goal - mover.previous;
        if (delta.x == 0.0 && delta.y == 0.0) || mover.profiles.is_empty() {
            return Ok(resolution);
        }

        let steps = if mover.flags.contains(BodyFlags::BULLET) {
            let (min_width, min_height) = mover.min_shape_size();
            bullet_steps(delta, min_width, min_height, self.max_steps)
        } else {
            1
        };

        let mut position = mover.previous;
        // An axis without motion is closed from the start
        let mut open_x = delta.x != 0.0;
        let mut open_y = delta.y != 0.0;

        for step in 1..=steps {
            resolution.steps = step;
            #[allow(clippy::cast_precision_loss)]
            let step_goal = if step == steps {
                mover.goal
            } else {
                mover.previous + delta * (step as f32 / steps as f32)
            };

            for axis in [Axis::X, Axis::Y] {
                let open = match axis {
                    Axis::X => &mut open_x,
                    Axis::Y => &mut open_y,
                };
                if !*open {
                    continue;
                }
                let target = axis.component(&step_goal);
                if target == axis.component(&position) {
                    continue;
                }

                match self.resolve_axis(mover, source, axis, position, target) {
                    Some(contact) => {
                        axis.set_component(&mut position, contact.position);
                        *open = false;
                        resolution.collisions.try_record(Self::entry(mover, axis, &contact));
                    }
                    None => axis.set_component(&mut position, target),
                }
            }

            if !open_x && !open_y {
                break;
            }
        }

        resolution.position = position;
        Ok(resolution)
    }

    fn entry(mover: &Mover, axis: Axis, contact: &AxisContact) -> CollisionDataEntry {
        let direction = sign(axis.component(&mover.goal) - axis.component(&mover.previous));
        let cancelled = axis.component(&mover.goal) - contact.position;
        CollisionDataEntry {
            axis,
            direction,
            position: contact.position,
            delta_movement: (contact.position - axis.component(&mover.previous)).abs(),
            this_type: contact.this_type,
            that_type: contact.candidate.collision_type,
            this_profile: contact.this_profile,
            that_profile: contact.candidate.profile,
            this_shape: contact.this_shape,
            that_shape: contact.candidate.shape,
            that_entity: contact.candidate.owner,
            contact_vector: axis.unit() * cancelled,
        }
    }

    /// Earliest blocking contact moving from `position` to `target` along
    /// `axis`, if any
    fn resolve_axis<S: CandidateSource + ?Sized>(
        &mut self,
        mover: &Mover,
        source: &S,
        axis: Axis,
        position: Vec2,
        target: f32,
    ) -> Option<AxisContact> {
        let initial = axis.component(&position);
        let direction = sign(target - initial);
        let mut best: Option<AxisContact> = None;

        for profile in &mover.profiles {
            self.shapes.clear();
            let mut start_bounds = Aabb::empty();
            for shape in &profile.shapes {
                let mut shape = *shape;
                shape.update(position.x, position.y);
                start_bounds.include(shape.aabb());
                self.shapes.push(shape);
            }
            let mut swept = start_bounds;
            for shape in &self.shapes {
                let mut moved = *shape;
                moved.move_axis(axis, target);
                swept.include(moved.aabb());
            }

            self.candidates.clear();
            source.gather(mover.entity, profile, &swept, &start_bounds, &mut self.candidates);
            if self.candidates.is_empty() {
                continue;
            }

            for shape in &self.shapes {
                let mut moved = *shape;
                moved.move_axis(axis, target);

                for candidate in &self.candidates {
                    if !self.participates(mover.flags, axis, direction, &start_bounds, candidate) {
                        continue;
                    }
                    if !shapes_collide(&moved, &candidate.shape) {
                        continue;
                    }
                    let Some(separation) = contact_separation(shape, &candidate.shape, axis) else {
                        continue;
                    };

                    let contact = axis.component(&candidate.shape.center())
                        - direction * separation
                        - axis.component(&shape.offset());
                    let travel = direction * (contact - initial);
                    // Already overlapping at the start of the step
                    if travel < -self.epsilon {
                        continue;
                    }
                    let travel = travel.max(0.0);
                    let contact = initial + direction * travel;
                    if direction * (target - contact) <= 0.0 {
                        continue;
                    }

                    let mut this_shape = *shape;
                    this_shape.move_axis(axis, contact);
                    let found = AxisContact {
                        position: contact,
                        travel,
                        this_type: profile.collision_type,
                        this_profile: profile.index,
                        this_shape,
                        candidate: *candidate,
                    };
                    if best.as_ref().map_or(true, |current| found.beats(current)) {
                        best = Some(found);
                    }
                }
            }
        }

        best
    }

    /// Whether `candidate` can block this motion at all
    fn participates(&self, flags: BodyFlags, axis: Axis, direction: f32, start_bounds: &Aabb, candidate: &Candidate) -> bool {
        if candidate.jump_through {
            if axis == Axis::X || direction < 0.0 {
                return false;
            }
            // Coming from below: pass through
            if start_bounds.bottom > candidate.shape.aabb().top + self.epsilon {
                return false;
            }
        }
        !(flags.contains(BodyFlags::JUMP_THROUGH) && axis == Axis::Y && direction < 0.0)
    }
}
