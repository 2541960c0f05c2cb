//! Core protocol types: positions and events.
//!
//! An [`Event`] is anything that happens in an arena. Each variant carries
//! exactly the fields its kind needs, so "which fields are meaningful for
//! this kind" is answered by the compiler instead of by convention.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// An arena-relative integer coordinate pair.
///
/// No sign invariant is enforced: a crawler that walks past the wall
/// simply reports a negative `x`. Rooms decide what coordinates mean.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Packs both coordinates into one `u64`, `x` in the high half.
    ///
    /// Used by zombies to store their position in a single atomic word so
    /// that readers never observe `x` from one move and `y` from another.
    pub const fn to_bits(self) -> u64 {
        ((self.x as u32 as u64) << 32) | (self.y as u32 as u64)
    }

    /// Inverse of [`to_bits`](Self::to_bits).
    pub const fn from_bits(bits: u64) -> Self {
        Self {
            x: (bits >> 32) as u32 as i32,
            y: bits as u32 as i32,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// EventKind
// ---------------------------------------------------------------------------

/// The tag of an [`Event`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A zombie moved.
    Walk,
    /// A player fired at a position.
    Shoot,
    /// The result of a shot.
    Boom,
    /// A client picked its name and wants to play.
    Start,
    /// A client picked a room to join.
    Join,
    /// A client asked for a new room.
    New,
}

impl EventKind {
    /// The verb used on the wire for this kind.
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Walk => "WALK",
            Self::Shoot => "SHOOT",
            Self::Boom => "BOOM",
            Self::Start => "START",
            Self::Join => "JOIN",
            Self::New => "NEW",
        }
    }

    /// Looks up a kind by verb, ignoring ASCII case.
    pub fn from_verb(verb: &str) -> Option<Self> {
        [
            Self::Walk,
            Self::Shoot,
            Self::Boom,
            Self::Start,
            Self::Join,
            Self::New,
        ]
        .into_iter()
        .find(|kind| kind.verb().eq_ignore_ascii_case(verb))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A discrete game occurrence.
///
/// `#[serde(tag = "type")]` gives the internally tagged JSON form used by
/// [`JsonCodec`](crate::JsonCodec):
///
/// ```text
/// { "type": "SHOOT", "actor": "ivan", "target": { "x": 1, "y": 2 } }
/// ```
///
/// `actor` defaults to empty when missing, because clients never know who
/// they are on the wire. The session layer stamps it before the event
/// reaches a room (see [`Event::with_actor`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Event {
    /// Zombie `actor` now stands at `at`.
    Walk {
        #[serde(default)]
        actor: String,
        at: Position,
    },

    /// Player `actor` fires at `target`.
    Shoot {
        #[serde(default)]
        actor: String,
        target: Position,
    },

    /// Player `actor`'s shot hit `points` zombies, named in `hits` in the
    /// order the room scanned them.
    Boom {
        #[serde(default)]
        actor: String,
        points: usize,
        hits: Vec<String>,
    },

    /// A client wants to play under `name`.
    Start { name: String },

    /// A client wants to join `room`.
    Join { room: String },

    /// A client wants a new room called `room`.
    New { room: String },
}

impl Event {
    pub fn walk(actor: impl Into<String>, at: Position) -> Self {
        Self::Walk {
            actor: actor.into(),
            at,
        }
    }

    /// A shot with no shooter yet.
    pub fn shoot(target: Position) -> Self {
        Self::Shoot {
            actor: String::new(),
            target,
        }
    }

    /// Builds the result of a shot. `points` is always `hits.len()`.
    pub fn boom(actor: impl Into<String>, hits: Vec<String>) -> Self {
        Self::Boom {
            actor: actor.into(),
            points: hits.len(),
            hits,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::Walk { .. } => EventKind::Walk,
            Self::Shoot { .. } => EventKind::Shoot,
            Self::Boom { .. } => EventKind::Boom,
            Self::Start { .. } => EventKind::Start,
            Self::Join { .. } => EventKind::Join,
            Self::New { .. } => EventKind::New,
        }
    }

    /// The acting zombie or player, for kinds that have one.
    pub fn actor(&self) -> Option<&str> {
        match self {
            Self::Walk { actor, .. }
            | Self::Shoot { actor, .. }
            | Self::Boom { actor, .. } => Some(actor),
            Self::Start { .. } | Self::Join { .. } | Self::New { .. } => None,
        }
    }

    /// Replaces the actor on kinds that have one. Other kinds are
    /// returned unchanged.
    pub fn with_actor(mut self, name: impl Into<String>) -> Self {
        match &mut self {
            Self::Walk { actor, .. }
            | Self::Shoot { actor, .. }
            | Self::Boom { actor, .. } => *actor = name.into(),
            Self::Start { .. } | Self::Join { .. } | Self::New { .. } => {}
        }
        self
    }
}

/// Renders the line-protocol form, without the trailing newline:
///
/// ```text
/// WALK crawler-leg-eater 7 3
/// SHOOT 7 3
/// BOOM ivan 1 [crawler-leg-eater]
/// ```
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Walk { actor, at } => write!(f, "WALK {actor} {at}"),
            Self::Shoot { target, .. } => write!(f, "SHOOT {target}"),
            Self::Boom {
                actor,
                points,
                hits,
            } => write!(f, "BOOM {actor} {points} [{}]", hits.join(" ")),
            Self::Start { name } => write!(f, "START {name}"),
            Self::Join { room } => write!(f, "JOIN {room}"),
            Self::New { room } => write!(f, "NEW {room}"),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_display() {
        let e = Event::walk("zombie", Position::new(1, 2));
        assert_eq!(e.to_string(), "WALK zombie 1 2");
    }

    #[test]
    fn test_shoot_display_omits_actor() {
        let e = Event::shoot(Position::new(1, 2)).with_actor("player");
        assert_eq!(e.to_string(), "SHOOT 1 2");
    }

    #[test]
    fn test_boom_display_lists_hits() {
        let e = Event::boom("player", vec![]);
        assert_eq!(e.to_string(), "BOOM player 0 []");

        let e = Event::boom("ivan", vec!["a".into(), "b".into()]);
        assert_eq!(e.to_string(), "BOOM ivan 2 [a b]");
    }

    #[test]
    fn test_boom_points_track_hits() {
        match Event::boom("ivan", vec!["a".into(), "b".into()]) {
            Event::Boom { points, .. } => assert_eq!(points, 2),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_lobby_commands_display() {
        assert_eq!(Event::Start { name: "ivan".into() }.to_string(), "START ivan");
        assert_eq!(Event::Join { room: "woods".into() }.to_string(), "JOIN woods");
        assert_eq!(Event::New { room: "moon".into() }.to_string(), "NEW moon");
    }

    #[test]
    fn test_with_actor_leaves_lobby_commands_alone() {
        let e = Event::Join { room: "woods".into() }.with_actor("ivan");
        assert_eq!(e, Event::Join { room: "woods".into() });
        assert_eq!(e.actor(), None);
    }

    #[test]
    fn test_kind_from_verb_is_case_insensitive() {
        assert_eq!(EventKind::from_verb("shoot"), Some(EventKind::Shoot));
        assert_eq!(EventKind::from_verb("StArT"), Some(EventKind::Start));
        assert_eq!(EventKind::from_verb("dance"), None);
    }

    #[test]
    fn test_position_bits_keep_negative_coordinates() {
        for pos in [
            Position::new(0, 0),
            Position::new(-1, 5),
            Position::new(29, -9),
            Position::new(i32::MIN, i32::MAX),
        ] {
            assert_eq!(Position::from_bits(pos.to_bits()), pos);
        }
    }

    #[test]
    fn test_event_json_is_internally_tagged() {
        let e = Event::walk("crawler-eye-eater", Position::new(3, 4));
        let json: serde_json::Value = serde_json::to_value(&e).unwrap();

        assert_eq!(json["type"], "WALK");
        assert_eq!(json["actor"], "crawler-eye-eater");
        assert_eq!(json["at"]["x"], 3);
        assert_eq!(json["at"]["y"], 4);
    }

    #[test]
    fn test_shoot_json_actor_defaults_to_empty() {
        let json = r#"{ "type": "SHOOT", "target": { "x": 1, "y": 2 } }"#;
        let e: Event = serde_json::from_str(json).unwrap();
        assert_eq!(e, Event::shoot(Position::new(1, 2)));
    }
}
