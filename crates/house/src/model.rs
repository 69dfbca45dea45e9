use crate::resolve::Identity;

/// Which of the two legal condition containers a state was decoded from.
/// Encode re-emits the same container tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionSource {
    Prerequisites,
    Actions,
}

impl ConditionSource {
    pub fn container_tag(self) -> &'static str {
        match self {
            ConditionSource::Prerequisites => "prerequisites",
            ConditionSource::Actions => "actions",
        }
    }

    pub fn condition_tag(self) -> &'static str {
        match self {
            ConditionSource::Prerequisites => "prereq",
            ConditionSource::Actions => "action",
        }
    }
}

/// "State `state` of item `item`", used to gate a state's availability or
/// as a triggered action. The identities are free-standing references, not
/// links to declared items or states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub item: Identity,
    pub state: Identity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub identity: Identity,
    pub image: Option<String>,
    pub description: String,
    pub condition_source: ConditionSource,
    pub conditions: Vec<Condition>,
    pub get: Option<String>,
    pub gettable: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub identity: Identity,
    pub states: Vec<State>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub identity: Identity,
    pub adjacent_rooms: Vec<Identity>,
    pub states: Vec<State>,
    pub items: Vec<Item>,
}

/// A scripted reaction keyed by item, state, and command, independent of
/// the room tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialResponse {
    pub item: Identity,
    pub image: Option<String>,
    pub command: Option<String>,
    pub response: Option<String>,
    pub item_state: Identity,
    pub actions: Vec<Condition>,
}

/// Root of one conversion: the full entity graph built by a decode and
/// consumed by an encode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct House {
    pub rooms: Vec<Room>,
    pub special_responses: Vec<SpecialResponse>,
}
