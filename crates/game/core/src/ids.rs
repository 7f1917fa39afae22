//! Strongly-typed identifiers for actors and things.

use std::fmt;

use uuid::Uuid;

/// Identity of a player actor. Generated once per connection and stable for
/// the player's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerKey(pub Uuid);

impl PlayerKey {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PlayerKey {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for PlayerKey {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! define_numeric_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub i64);

        impl $name {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

define_numeric_id!(
    /// Identity of a room actor, assigned by the map.
    RoomId,
    "room"
);
define_numeric_id!(
    /// Identity of a monster actor, assigned by the map.
    MonsterId,
    "monster"
);
define_numeric_id!(
    /// Identity of an in-world item.
    ThingId,
    "thing"
);

/// Kind tag of an actor identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ActorKind {
    Room,
    Player,
    Monster,
}

/// Identity plus kind tag: the address of any actor in the world.
///
/// Used as the persistence key for actor state and in diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActorKey {
    Room(RoomId),
    Player(PlayerKey),
    Monster(MonsterId),
}

impl ActorKey {
    pub const fn kind(&self) -> ActorKind {
        match self {
            ActorKey::Room(_) => ActorKind::Room,
            ActorKey::Player(_) => ActorKind::Player,
            ActorKey::Monster(_) => ActorKind::Monster,
        }
    }

    /// Filesystem-safe name, e.g. `room_3` or `player_<uuid>`.
    ///
    /// Negative room ids are encoded with an `m` prefix (`room_m2`).
    pub fn file_stem(&self) -> String {
        fn signed(value: i64) -> String {
            if value < 0 {
                format!("m{}", value.unsigned_abs())
            } else {
                value.to_string()
            }
        }

        match self {
            ActorKey::Room(id) => format!("room_{}", signed(id.0)),
            ActorKey::Player(key) => format!("player_{}", key.0.simple()),
            ActorKey::Monster(id) => format!("monster_{}", signed(id.0)),
        }
    }

    /// Inverse of [`ActorKey::file_stem`].
    pub fn from_file_stem(stem: &str) -> Option<Self> {
        fn signed(raw: &str) -> Option<i64> {
            match raw.strip_prefix('m') {
                Some(abs) => abs.parse::<i64>().ok().map(|v| -v),
                None => raw.parse().ok(),
            }
        }

        let (kind, raw) = stem.split_once('_')?;
        match kind {
            "room" => signed(raw).map(|id| ActorKey::Room(RoomId(id))),
            "monster" => signed(raw).map(|id| ActorKey::Monster(MonsterId(id))),
            "player" => Uuid::parse_str(raw)
                .ok()
                .map(|uuid| ActorKey::Player(PlayerKey(uuid))),
            _ => None,
        }
    }
}

impl fmt::Display for ActorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorKey::Room(id) => write!(f, "room/{}", id.0),
            ActorKey::Player(key) => write!(f, "player/{}", key.0),
            ActorKey::Monster(id) => write!(f, "monster/{}", id.0),
        }
    }
}

impl From<RoomId> for ActorKey {
    fn from(id: RoomId) -> Self {
        ActorKey::Room(id)
    }
}

impl From<PlayerKey> for ActorKey {
    fn from(key: PlayerKey) -> Self {
        ActorKey::Player(key)
    }
}

impl From<MonsterId> for ActorKey {
    fn from(id: MonsterId) -> Self {
        ActorKey::Monster(id)
    }
}
