use roxmltree::Node;

use crate::error::{error_at_node, node_location, ConvertError, ConvertErrorCode};
use crate::model::{Condition, ConditionSource, House, Item, Room, SpecialResponse, State};
use crate::resolve::{lookup_int, lookup_text, resolve_identity, Identity, Lookup, ResolveContext};

/// Locate a container among direct children. Comparison is ASCII
/// case-insensitive: legacy documents spell `adjacentRooms` in camelCase.
fn child_element<'a, 'i>(node: Node<'a, 'i>, tag: &str) -> Option<Node<'a, 'i>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name().eq_ignore_ascii_case(tag))
}

fn element_children<'a, 'i>(node: Node<'a, 'i>) -> impl Iterator<Item = Node<'a, 'i>> {
    node.children().filter(|child| child.is_element())
}

pub fn decode_house(root: Node<'_, '_>) -> Result<House, ConvertError> {
    let rooms = match child_element(root, "rooms") {
        Some(container) => element_children(container)
            .map(decode_room)
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };
    let special_responses = match child_element(root, "specialresponses") {
        Some(container) => element_children(container)
            .map(decode_special_response)
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };
    Ok(House {
        rooms,
        special_responses,
    })
}

fn decode_room(node: Node<'_, '_>) -> Result<Room, ConvertError> {
    let identity = resolve_identity(node, ResolveContext::Entity);
    let adjacent_rooms = match child_element(node, "adjacentrooms") {
        Some(container) => element_children(container)
            .map(|reference| resolve_identity(reference, ResolveContext::AdjacentRoom))
            .collect(),
        None => Vec::new(),
    };
    let states = decode_state_container(node)?;
    let items = match child_element(node, "items") {
        Some(container) => element_children(container)
            .enumerate()
            .map(|(index, child)| decode_item(child, index))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };
    Ok(Room {
        identity,
        adjacent_rooms,
        states,
        items,
    })
}

fn decode_item(node: Node<'_, '_>, index: usize) -> Result<Item, ConvertError> {
    let mut identity = resolve_identity(node, ResolveContext::Entity);
    if identity.id.is_none() {
        identity.id = Some(index as i64);
    }
    let states = match child_element(node, "states") {
        Some(_) => decode_state_container(node)?,
        // Shorthand authoring: an item with no states container carries the
        // fields of its single state directly on the item element.
        None => vec![decode_state_fields(
            node,
            Identity::from_id(0, Some(node_location(node))),
        )?],
    };
    Ok(Item { identity, states })
}

fn decode_state_container(node: Node<'_, '_>) -> Result<Vec<State>, ConvertError> {
    match child_element(node, "states") {
        Some(container) => element_children(container)
            .enumerate()
            .map(|(index, child)| decode_state(child, index))
            .collect(),
        None => Ok(Vec::new()),
    }
}

fn decode_state(node: Node<'_, '_>, index: usize) -> Result<State, ConvertError> {
    let mut identity = resolve_identity(node, ResolveContext::Entity);
    if identity.id.is_none() {
        identity.id = Some(index as i64);
    }
    decode_state_fields(node, identity)
}

fn decode_state_fields(node: Node<'_, '_>, identity: Identity) -> Result<State, ConvertError> {
    let image = lookup_text(node, &[Lookup::Attribute("image")]).map(str::to_string);
    let description = lookup_text(node, &[Lookup::ChildText("description")])
        .unwrap_or_default()
        .to_string();

    let prerequisites = child_element(node, "prerequisites");
    let actions = child_element(node, "actions");
    let (condition_source, container) = match (prerequisites, actions) {
        (Some(_), Some(_)) => {
            return Err(error_at_node(
                ConvertErrorCode::AmbiguousConditions,
                "state has both a prerequisites and an actions container".to_string(),
                node,
            ))
        }
        (None, None) => {
            return Err(error_at_node(
                ConvertErrorCode::MissingConditions,
                "state has neither a prerequisites nor an actions container".to_string(),
                node,
            ))
        }
        (Some(container), None) => (ConditionSource::Prerequisites, container),
        (None, Some(container)) => (ConditionSource::Actions, container),
    };
    let conditions = element_children(container).map(decode_condition).collect();

    let get = lookup_text(node, &[Lookup::ChildText("get")]).map(str::to_string);
    let gettable = decode_gettable(node)?;

    Ok(State {
        identity,
        image,
        description,
        condition_source,
        conditions,
        get,
        gettable,
    })
}

fn decode_gettable(node: Node<'_, '_>) -> Result<Option<bool>, ConvertError> {
    let raw = lookup_text(
        node,
        &[Lookup::Attribute("gettable"), Lookup::ChildText("gettable")],
    );
    match raw {
        None => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("true") => Ok(Some(true)),
        Some(value) if value.eq_ignore_ascii_case("false") => Ok(Some(false)),
        Some(value) => Err(error_at_node(
            ConvertErrorCode::InvalidGettable,
            format!("gettable must be 'true' or 'false', got '{value}'"),
            node,
        )),
    }
}

fn decode_condition(node: Node<'_, '_>) -> Condition {
    Condition {
        item: resolve_identity(node, ResolveContext::ItemRef),
        state: resolve_identity(node, ResolveContext::StateRef),
    }
}

fn decode_special_response(node: Node<'_, '_>) -> Result<SpecialResponse, ConvertError> {
    // An explicit itemindex child wins over the keyed item reference.
    let item = match lookup_int(node, &[Lookup::ChildText("itemindex")]) {
        Some(id) => Identity::from_id(id, Some(node_location(node))),
        None => resolve_identity(node, ResolveContext::ItemRef),
    };
    let image = lookup_text(
        node,
        &[Lookup::Attribute("image"), Lookup::ChildText("image")],
    )
    .map(str::to_string);
    let command = lookup_text(
        node,
        &[Lookup::Attribute("command"), Lookup::ChildText("command")],
    )
    .map(str::to_string);
    // Canonical spelling first, then the misspelling legacy documents use.
    let response = lookup_text(
        node,
        &[Lookup::ChildText("response"), Lookup::ChildText("reponse")],
    )
    .map(str::to_string);
    let item_state = resolve_identity(node, ResolveContext::ResponseState);
    let actions = match child_element(node, "actions") {
        Some(container) => element_children(container).map(decode_condition).collect(),
        None => Vec::new(),
    };
    Ok(SpecialResponse {
        item,
        image,
        command,
        response,
        item_state,
        actions,
    })
}
