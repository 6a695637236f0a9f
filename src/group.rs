//! Airlock group model.
//!
//! The block query hands back a raw [`BlockGroup`]: every terminal block
//! in a named group, with its display name and kind.  [`AirlockGroup`]
//! is the validated view of it: outer doors (name contains the outer
//! tag), inner doors (everything else) and exactly one vent.
//!
//! ```text
//!   vacuum │ outer doors │ chamber + vent │ inner doors │ pressurized
//! ```

use core::fmt;

use crate::error::ValidationError;

/// Opaque handle for a block on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a block is, as far as the sequencer cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Door,
    AirVent,
    /// Lights, sensors, anything else people put in the group.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockInfo {
    pub id: BlockId,
    pub name: String,
    pub kind: BlockKind,
}

/// Raw result of a group lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockGroup {
    pub name: String,
    pub blocks: Vec<BlockInfo>,
}

impl BlockGroup {
    /// Blocks of `kind` matching `pred`, in query order.
    pub fn blocks_of(&self, kind: BlockKind, pred: impl Fn(&BlockInfo) -> bool) -> Vec<BlockId> {
        self.blocks
            .iter()
            .filter(|b| b.kind == kind && pred(b))
            .map(|b| b.id)
            .collect()
    }
}

/// Which doors an action applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorSide {
    /// Doors facing vacuum.
    Outer,
    /// Doors facing the pressurized area.
    Inner,
    All,
}

/// A structurally valid airlock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirlockGroup {
    name: String,
    outer: Vec<BlockId>,
    inner: Vec<BlockId>,
    vent: BlockId,
}

impl AirlockGroup {
    /// Partition `group` by `outer_tag` and check the airlock shape:
    /// at least one outer door, at least one inner door, exactly one vent.
    pub fn validate(group: &BlockGroup, outer_tag: &str) -> Result<Self, ValidationError> {
        let outer = group.blocks_of(BlockKind::Door, |b| b.name.contains(outer_tag));
        if outer.is_empty() {
            return Err(ValidationError::NoOuterDoor {
                tag: outer_tag.to_owned(),
            });
        }

        let inner = group.blocks_of(BlockKind::Door, |b| !b.name.contains(outer_tag));
        if inner.is_empty() {
            return Err(ValidationError::NoInnerDoor {
                tag: outer_tag.to_owned(),
            });
        }

        let vents = group.blocks_of(BlockKind::AirVent, |_| true);
        let [vent] = vents[..] else {
            return Err(ValidationError::VentCount(vents.len()));
        };

        Ok(Self {
            name: group.name.clone(),
            outer,
            inner,
            vent,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vent(&self) -> BlockId {
        self.vent
    }

    /// Door handles on `side`.  Outer doors come first for [`DoorSide::All`].
    pub fn doors(&self, side: DoorSide) -> Vec<BlockId> {
        match side {
            DoorSide::Outer => self.outer.clone(),
            DoorSide::Inner => self.inner.clone(),
            DoorSide::All => self.outer.iter().chain(&self.inner).copied().collect(),
        }
    }
}
