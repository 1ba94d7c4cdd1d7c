/// The simulation tick counter; the unit of deterministic advancement.
///
/// Each tick consumes exactly one input value per known player, so two
/// simulations that agree on inputs for ticks `0..=N` agree on all state
/// at tick `N`.
pub type Tick = u64;

/// Identifies a player on the wire. Assigned by whatever session layer
/// brokered the connection; the core only compares them for equality.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct PlayerId(u64);

impl PlayerId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

/// Process-wide entity identifier: monotonic, never reused, immutable after
/// assignment. Generated by the owning `EntityStore`, never by callers.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct EntityId(u64);

impl EntityId {
    /// Sentinel for an entity that has not yet been registered with a store.
    pub const UNSET: EntityId = EntityId(0);

    pub fn from_u64(value: u64) -> Self {
        Self(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }

    pub fn is_unset(&self) -> bool {
        self.0 == 0
    }
}

/// Integer type tag assigned once per concrete entity kind.
///
/// Compared by equality; substitutes for runtime type inspection in
/// "find all entities of kind X" queries.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct EntityKind(u32);

impl EntityKind {
    pub const fn new(tag: u32) -> Self {
        Self(tag)
    }

    pub fn tag(&self) -> u32 {
        self.0
    }
}

/// Which side of the two-player session this process plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostRole {
    Host,
    Peer,
}

impl HostRole {
    pub fn invert(self) -> Self {
        match self {
            HostRole::Host => HostRole::Peer,
            HostRole::Peer => HostRole::Host,
        }
    }
}
