//! Core document types for the shared room schema.
//!
//! These are the structures that live in the document store: a `Room` is
//! the root aggregate for one match, addressed by a short room code, and
//! every client reads and writes the same document. The serde attributes
//! pin the exact JSON shape of the stored document, so a change here is a
//! schema change — the shape tests at the bottom of this file are the
//! contract.
//!
//! Documents that do not parse are rejected outright
//! (`deny_unknown_fields`, no silent defaulting of missing fields). The
//! one deliberate exception is `Player.uid`, which may be absent: an
//! absent uid is how a vacant slot is represented.

use serde::{Deserialize, Serialize};

use std::fmt;

use crate::grid;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A stable player identifier issued by the identity collaborator.
///
/// Newtype over the provider's opaque uid string. Serializes as a plain
/// JSON string (`#[serde(transparent)]`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uid(pub String);

impl Uid {
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A short human-typeable room key (e.g. `"K7Q2X"`).
///
/// This is the document key in the store; players exchange it out of band
/// to join each other's rooms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(pub String);

impl RoomCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

/// A fixed player position within a room.
///
/// Rooms hold exactly two slots. Keying players by slot (rather than by
/// uid) makes the two-player invariant structural: there is nowhere for a
/// third entry to live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Player1,
    Player2,
}

impl Slot {
    /// Both slots, in order. Handy for per-slot iteration.
    pub const BOTH: [Slot; 2] = [Slot::Player1, Slot::Player2];

    /// The other slot.
    pub fn opposite(self) -> Slot {
        match self {
            Slot::Player1 => Slot::Player2,
            Slot::Player2 => Slot::Player1,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Player1 => write!(f, "player1"),
            Slot::Player2 => write!(f, "player2"),
        }
    }
}

// ---------------------------------------------------------------------------
// Room lifecycle status
// ---------------------------------------------------------------------------

/// The lifecycle state of a room. Single source of truth for what actions
/// are legal.
///
/// ```text
/// waiting → prepare → playing → finished
///              ↑__________________|        (rematch)
/// ```
///
/// - **Waiting**: room exists, second slot may still be vacant.
/// - **Prepare**: both players place fleets and confirm readiness.
/// - **Playing**: shots alternate until one fleet is sunk.
/// - **Finished**: winner recorded; a rematch resets back to Prepare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Waiting,
    Prepare,
    Playing,
    Finished,
}

impl RoomStatus {
    /// Returns `true` if the room is accepting new players.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Waiting)
    }

    /// Returns `true` if shots may be fired.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Returns `true` if moving to `target` is a legal edge, including the
    /// rematch edge `Finished → Prepare`.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Waiting, Self::Prepare)
                | (Self::Prepare, Self::Playing)
                | (Self::Playing, Self::Finished)
                | (Self::Finished, Self::Prepare)
        )
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Prepare => write!(f, "prepare"),
            Self::Playing => write!(f, "playing"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

// ---------------------------------------------------------------------------
// Ships
// ---------------------------------------------------------------------------

/// Fleet class of a ship. The class fixes the ship's length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipClass {
    Small,
    Medium,
    Large,
    Xlarge,
}

impl ShipClass {
    /// The configured fleet roster: exactly one ship of each class.
    pub const ROSTER: [ShipClass; 4] = [
        ShipClass::Small,
        ShipClass::Medium,
        ShipClass::Large,
        ShipClass::Xlarge,
    ];

    /// Length of a ship of this class, in cells.
    pub fn length(self) -> usize {
        match self {
            ShipClass::Small => 2,
            ShipClass::Medium => 3,
            ShipClass::Large => 4,
            ShipClass::Xlarge => 5,
        }
    }
}

impl fmt::Display for ShipClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShipClass::Small => write!(f, "small"),
            ShipClass::Medium => write!(f, "medium"),
            ShipClass::Large => write!(f, "large"),
            ShipClass::Xlarge => write!(f, "xlarge"),
        }
    }
}

/// Orientation of a ship on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    /// Linear-index stride between consecutive cells of a ship.
    pub fn stride(self) -> usize {
        match self {
            Direction::Horizontal => 1,
            Direction::Vertical => grid::GRID_WIDTH,
        }
    }
}

/// A placed ship: a contiguous run of cells in one direction.
///
/// Written once at setup confirmation and never mutated afterwards,
/// except when a rematch clears the whole fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ship {
    /// Fleet class; determines `positions.len()`.
    #[serde(rename = "type")]
    pub class: ShipClass,
    pub direction: Direction,
    /// Occupied cell indices, anchor first, contiguous per `direction`.
    pub positions: Vec<usize>,
}

impl Ship {
    /// Returns `true` if the ship occupies the given cell.
    pub fn contains(&self, index: usize) -> bool {
        self.positions.contains(&index)
    }
}

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

/// One player's record inside a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Player {
    /// Identifier of the occupying client. Absent means the slot is vacant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<Uid>,
    pub name: String,
    /// Player has confirmed fleet placement.
    pub ready: bool,
    pub ships: Vec<Ship>,
    /// Cell indices where this player's fleet has been struck.
    pub hits_received: Vec<usize>,
    /// Cell indices where an opponent shot landed on empty water.
    pub misses_received: Vec<usize>,
}

impl Player {
    /// An unoccupied slot record.
    pub fn vacant() -> Self {
        Self {
            uid: None,
            name: String::new(),
            ready: false,
            ships: Vec::new(),
            hits_received: Vec::new(),
            misses_received: Vec::new(),
        }
    }

    /// A freshly occupied slot: identity set, nothing placed yet.
    pub fn occupied(uid: Uid, name: impl Into<String>) -> Self {
        Self {
            uid: Some(uid),
            name: name.into(),
            ready: false,
            ships: Vec::new(),
            hits_received: Vec::new(),
            misses_received: Vec::new(),
        }
    }

    pub fn is_vacant(&self) -> bool {
        self.uid.is_none()
    }

    /// Every cell occupied by any of this player's ships.
    pub fn fleet_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.ships.iter().flat_map(|s| s.positions.iter().copied())
    }

    /// Returns `true` if the cell has already been shot at (hit or miss).
    pub fn was_shot(&self, index: usize) -> bool {
        self.hits_received.contains(&index) || self.misses_received.contains(&index)
    }
}

/// The two fixed player slots of a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Players {
    pub player1: Player,
    pub player2: Player,
}

impl Players {
    pub fn get(&self, slot: Slot) -> &Player {
        match slot {
            Slot::Player1 => &self.player1,
            Slot::Player2 => &self.player2,
        }
    }

    pub fn get_mut(&mut self, slot: Slot) -> &mut Player {
        match slot {
            Slot::Player1 => &mut self.player1,
            Slot::Player2 => &mut self.player2,
        }
    }
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// The root aggregate for one match: the shared document every client
/// reads from and writes back to.
///
/// Invariants (enforced by the rules layer, assumed by consumers):
/// - `current_turn`, when set, equals the uid of one occupant.
/// - `status == Playing` implies both fleets are non-empty and
///   `current_turn` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Room {
    /// Uid of the player who owns the room. Always a uid, never a display
    /// name.
    pub host: Uid,
    pub status: RoomStatus,
    /// Uid of the player allowed to fire next; `None` outside `Playing`.
    pub current_turn: Option<Uid>,
    /// Creation time in milliseconds since the Unix epoch. Write-once.
    pub created_at: u64,
    pub players: Players,
}

impl Room {
    /// A brand-new room: host occupies `player1`, second slot vacant,
    /// status `Waiting`.
    pub fn create(host_uid: Uid, host_name: impl Into<String>, created_at: u64) -> Self {
        Self {
            host: host_uid.clone(),
            status: RoomStatus::Waiting,
            current_turn: None,
            created_at,
            players: Players {
                player1: Player::occupied(host_uid, host_name),
                player2: Player::vacant(),
            },
        }
    }

    pub fn player(&self, slot: Slot) -> &Player {
        self.players.get(slot)
    }

    pub fn player_mut(&mut self, slot: Slot) -> &mut Player {
        self.players.get_mut(slot)
    }

    /// The slot occupied by the given uid, if any.
    pub fn slot_of(&self, uid: &Uid) -> Option<Slot> {
        Slot::BOTH
            .into_iter()
            .find(|&slot| self.player(slot).uid.as_ref() == Some(uid))
    }

    /// The first vacant slot, if any.
    pub fn vacant_slot(&self) -> Option<Slot> {
        Slot::BOTH
            .into_iter()
            .find(|&slot| self.player(slot).is_vacant())
    }

    pub fn occupied_count(&self) -> usize {
        Slot::BOTH
            .into_iter()
            .filter(|&slot| !self.player(slot).is_vacant())
            .count()
    }

    pub fn is_full(&self) -> bool {
        self.occupied_count() == 2
    }

    /// Uid occupying the given slot, if any.
    pub fn uid_of(&self, slot: Slot) -> Option<&Uid> {
        self.player(slot).uid.as_ref()
    }
}

// =========================================================================
// Tests
// =========================================================================
