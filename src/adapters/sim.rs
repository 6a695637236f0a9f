//! In-memory grid simulator.
//!
//! Implements [`BlockQuery`] and [`DevicePort`] over a set of named
//! groups loaded from a [`GridLayout`].  Doors move instantly but only
//! while enabled; the vent flips the chamber state as soon as its
//! direction changes.  Good enough to watch a sequence run on the
//! console and to drive integration tests; no gas model.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::app::ports::{BlockQuery, DevicePort};
use crate::error::DeviceError;
use crate::group::{BlockGroup, BlockId, BlockInfo, BlockKind};

// ── Layout ────────────────────────────────────────────────────

/// Serializable description of the grid's groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub groups: Vec<GroupLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupLayout {
    pub name: String,
    #[serde(default)]
    pub doors: Vec<String>,
    #[serde(default)]
    pub vents: Vec<String>,
    /// Non-airlock blocks sharing the group.
    #[serde(default)]
    pub other: Vec<String>,
}

impl GridLayout {
    /// One airlock named "Airlock" with a door on each side.
    pub fn demo() -> Self {
        Self {
            groups: vec![GroupLayout {
                name: "Airlock".into(),
                doors: vec!["Airlock Door [Outer]".into(), "Airlock Door Inner".into()],
                vents: vec!["Airlock Vent".into()],
                other: vec!["Airlock Light".into()],
            }],
        }
    }
}

// ── Block state ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoorState {
    pub name: String,
    pub enabled: bool,
    pub open: bool,
    pub functional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VentState {
    pub name: String,
    pub depressurize: bool,
    pub pressurized: bool,
    pub functional: bool,
}

#[derive(Debug, Clone)]
enum Block {
    Door(DoorState),
    Vent(VentState),
    Other(String),
}

impl Block {
    fn info(&self, id: BlockId) -> BlockInfo {
        let (name, kind) = match self {
            Self::Door(d) => (d.name.clone(), BlockKind::Door),
            Self::Vent(v) => (v.name.clone(), BlockKind::AirVent),
            Self::Other(name) => (name.clone(), BlockKind::Other),
        };
        BlockInfo { id, name, kind }
    }
}

// ── SimulatedGrid ─────────────────────────────────────────────

pub struct SimulatedGrid {
    blocks: BTreeMap<BlockId, Block>,
    groups: Vec<(String, Vec<BlockId>)>,
}

impl SimulatedGrid {
    /// Build a grid.  Doors start closed and enabled; chambers start
    /// pressurized.
    pub fn from_layout(layout: &GridLayout) -> Self {
        let mut blocks = BTreeMap::new();
        let mut groups = Vec::new();
        let mut next_id = 1;
        let mut add = |block: Block, members: &mut Vec<BlockId>| {
            let id = BlockId(next_id);
            next_id += 1;
            blocks.insert(id, block);
            members.push(id);
        };

        for group in &layout.groups {
            let mut members = Vec::new();
            for name in &group.doors {
                add(
                    Block::Door(DoorState {
                        name: name.clone(),
                        enabled: true,
                        open: false,
                        functional: true,
                    }),
                    &mut members,
                );
            }
            for name in &group.vents {
                add(
                    Block::Vent(VentState {
                        name: name.clone(),
                        depressurize: false,
                        pressurized: true,
                        functional: true,
                    }),
                    &mut members,
                );
            }
            for name in &group.other {
                add(Block::Other(name.clone()), &mut members);
            }
            groups.push((group.name.clone(), members));
        }

        Self { blocks, groups }
    }

    /// First block whose name matches exactly.
    pub fn find(&self, name: &str) -> Option<BlockId> {
        self.blocks.iter().find_map(|(id, b)| {
            let matches = match b {
                Block::Door(d) => d.name == name,
                Block::Vent(v) => v.name == name,
                Block::Other(n) => n == name,
            };
            matches.then_some(*id)
        })
    }

    pub fn door(&self, id: BlockId) -> Option<&DoorState> {
        match self.blocks.get(&id) {
            Some(Block::Door(d)) => Some(d),
            _ => None,
        }
    }

    pub fn vent(&self, id: BlockId) -> Option<&VentState> {
        match self.blocks.get(&id) {
            Some(Block::Vent(v)) => Some(v),
            _ => None,
        }
    }

    /// Take a block off the grid (grinded down, destroyed).
    pub fn remove_block(&mut self, id: BlockId) {
        self.blocks.remove(&id);
    }

    /// Mark a door or vent as damaged or repaired.
    pub fn set_functional(&mut self, id: BlockId, functional: bool) {
        match self.blocks.get_mut(&id) {
            Some(Block::Door(d)) => d.functional = functional,
            Some(Block::Vent(v)) => v.functional = functional,
            _ => {}
        }
    }

    /// One line per door and vent, for the console.
    pub fn describe(&self) -> Vec<String> {
        self.blocks
            .iter()
            .filter_map(|(id, b)| match b {
                Block::Door(d) => Some(format!(
                    "{id} {}: {}, {}",
                    d.name,
                    if d.open { "open" } else { "closed" },
                    if d.enabled { "enabled" } else { "disabled" },
                )),
                Block::Vent(v) => Some(format!(
                    "{id} {}: {}",
                    v.name,
                    if v.pressurized {
                        "pressurized"
                    } else {
                        "depressurized"
                    },
                )),
                Block::Other(_) => None,
            })
            .collect()
    }

    fn door_mut(&mut self, id: BlockId) -> Result<&mut DoorState, DeviceError> {
        match self.blocks.get_mut(&id) {
            Some(Block::Door(d)) if d.functional => Ok(d),
            Some(Block::Door(_)) => Err(DeviceError::NotFunctional(id)),
            Some(_) => Err(DeviceError::WrongKind(id)),
            None => Err(DeviceError::BlockMissing(id)),
        }
    }
}

impl BlockQuery for SimulatedGrid {
    fn resolve_group(&self, name: &str) -> Option<BlockGroup> {
        let (group_name, members) = self.groups.iter().find(|(n, _)| n == name)?;
        let blocks = members
            .iter()
            .filter_map(|id| self.blocks.get(id).map(|b| b.info(*id)))
            .collect();
        Some(BlockGroup {
            name: group_name.clone(),
            blocks,
        })
    }
}

impl DevicePort for SimulatedGrid {
    fn set_door_enabled(&mut self, door: BlockId, enabled: bool) -> Result<(), DeviceError> {
        self.door_mut(door)?.enabled = enabled;
        Ok(())
    }

    fn open_door(&mut self, door: BlockId) -> Result<(), DeviceError> {
        let d = self.door_mut(door)?;
        if d.enabled {
            d.open = true;
        } else {
            debug!("{} is disabled, ignoring open", d.name);
        }
        Ok(())
    }

    fn close_door(&mut self, door: BlockId) -> Result<(), DeviceError> {
        let d = self.door_mut(door)?;
        if d.enabled {
            d.open = false;
        } else {
            debug!("{} is disabled, ignoring close", d.name);
        }
        Ok(())
    }

    fn set_vent_depressurize(&mut self, vent: BlockId, on: bool) -> Result<(), DeviceError> {
        match self.blocks.get_mut(&vent) {
            Some(Block::Vent(v)) if v.functional => {
                v.depressurize = on;
                v.pressurized = !on;
                Ok(())
            }
            Some(Block::Vent(_)) => Err(DeviceError::NotFunctional(vent)),
            Some(_) => Err(DeviceError::WrongKind(vent)),
            None => Err(DeviceError::BlockMissing(vent)),
        }
    }

    fn vent_is_pressurized(&self, vent: BlockId) -> Result<bool, DeviceError> {
        match self.blocks.get(&vent) {
            Some(Block::Vent(v)) => Ok(v.pressurized),
            Some(_) => Err(DeviceError::WrongKind(vent)),
            None => Err(DeviceError::BlockMissing(vent)),
        }
    }
}
