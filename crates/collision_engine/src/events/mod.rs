//! Collision notifications
//!
//! The world never calls into game code while it is resolving. Every accepted
//! contact and overlap becomes a [`CollisionEvent`] queued for the tick;
//! after the pass the game hands them to a [`ReactionRouter`], which forwards
//! each one to the handlers registered for its reaction until one of them
//! returns `true` to consume it.

use std::collections::HashMap;

use crate::ecs::EntityId;
use crate::foundation::math::{Axis, Vec2};
use crate::physics::collision::CollisionShape;
use crate::physics::collision_types::{CollisionType, ReactionId};

/// How the participants met
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitType {
    /// Blocking contact produced by the resolver
    Solid,
    /// Overlap, no position change
    Soft,
}

/// Payload delivered with every reaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionMessage {
    /// The other participant; `None` for terrain
    pub other: Option<EntityId>,
    /// Collision type of the receiving side
    pub this_type: CollisionType,
    /// Collision type of the other side
    pub that_type: CollisionType,
    /// Solid or soft
    pub hit_type: HitType,
    /// Blocked axis, solid hits only
    pub axis: Option<Axis>,
    /// Direction along the axis as seen by the receiver (-1.0, 0.0 or 1.0)
    pub direction: f32,
    /// Cancelled movement as seen by the receiver
    pub contact_vector: Vec2,
    /// Receiver's shape
    pub this_shape: CollisionShape,
    /// Other participant's shape
    pub that_shape: CollisionShape,
}

impl CollisionMessage {
    /// The same contact as seen by the other participant
    pub fn mirrored(&self, receiver: Option<EntityId>) -> Self {
        Self {
            other: receiver,
            this_type: self.that_type,
            that_type: self.this_type,
            hit_type: self.hit_type,
            axis: self.axis,
            direction: -self.direction,
            contact_vector: -self.contact_vector,
            this_shape: self.that_shape,
            that_shape: self.this_shape,
        }
    }
}

/// A named reaction to deliver to one entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// Entity receiving the reaction
    pub target: EntityId,
    /// Reaction name
    pub reaction: ReactionId,
    /// Details of the contact
    pub message: CollisionMessage,
}

/// Event handler trait
/// Returns true if event was consumed (stops forwarding)
/// Returns false to allow forwarding to other handlers
pub trait EventHandler {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &CollisionEvent) -> bool;
}

impl<F> EventHandler for F
where
    F: FnMut(&CollisionEvent) -> bool,
{
    fn on_event(&mut self, event: &CollisionEvent) -> bool {
        self(event)
    }
}

/// Routes reactions to registered handlers
/// Follows chain of responsibility pattern
#[derive(Default)]
pub struct ReactionRouter {
    queue: Vec<CollisionEvent>,
    handlers: HashMap<ReactionId, Vec<Box<dyn EventHandler>>>,
}

impl ReactionRouter {
    /// Create a router with no handlers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one reaction
    pub fn register_handler(&mut self, reaction: ReactionId, handler: Box<dyn EventHandler>) {
        self.handlers.entry(reaction).or_default().push(handler);
    }

    /// Whether anything listens for `reaction`
    pub fn has_handler(&self, reaction: ReactionId) -> bool {
        self.handlers.get(&reaction).is_some_and(|handlers| !handlers.is_empty())
    }

    /// Queue events for the next dispatch
    pub fn send_all(&mut self, events: impl IntoIterator<Item = CollisionEvent>) {
        self.queue.extend(events);
    }

    /// Queue one event
    pub fn send(&mut self, event: CollisionEvent) {
        self.queue.push(event);
    }

    /// Number of queued events
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Deliver every queued event in order
    ///
    /// Returns how many events were consumed by a handler.
    pub fn dispatch(&mut self) -> usize {
        let queue = std::mem::take(&mut self.queue);
        queue.iter().filter(|event| self.dispatch_event(event)).count()
    }

    /// Stops on first handler that returns true (consumed)
    fn dispatch_event(&mut self, event: &CollisionEvent) -> bool {
        let Some(handlers) = self.handlers.get_mut(&event.reaction) else {
            return false;
        };
        handlers.iter_mut().any(|handler| handler.on_event(event))
    }

    /// Drop queued events without delivering them
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
