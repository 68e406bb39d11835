use super::group::PairGroup;
use super::ids::GroupId;
use super::topology::Bond;

/// A structural change to a molecule, carrying enough data for a view to mirror it.
///
/// Removal events carry the state the group or bond had just before it was removed.
#[derive(Debug, Clone, PartialEq)]
pub enum MoleculeEvent {
    GroupAdded { id: GroupId, group: PairGroup },
    GroupRemoved { id: GroupId, group: PairGroup },
    BondAdded(Bond),
    BondRemoved(Bond),
}

impl MoleculeEvent {
    pub fn group_id(&self) -> Option<GroupId> {
        match self {
            Self::GroupAdded { id, .. } | Self::GroupRemoved { id, .. } => Some(*id),
            Self::BondAdded(_) | Self::BondRemoved(_) => None,
        }
    }
}

/// Pending change events, in emission order. The owner drains it once per frame.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<MoleculeEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: MoleculeEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<MoleculeEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MoleculeEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
