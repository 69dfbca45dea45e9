use xmltree::{Element, XMLNode};

use crate::error::ConvertError;
use crate::model::{Condition, ConditionSource, House, Item, Room, SpecialResponse, State};
use crate::resolve::Identity;

/// Explicit encode configuration; never global state.
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions {
    /// Emit an entity's name as its element tag when the name is a simple
    /// word. Falls back to the generic kind tag otherwise.
    pub prefer_tag_identity: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            prefer_tag_identity: true,
        }
    }
}

pub fn encode_house(house: &House, options: &EncodeOptions) -> Result<Element, ConvertError> {
    let mut root = Element::new("house");
    let mut rooms = Element::new("rooms");
    for room in &house.rooms {
        rooms
            .children
            .push(XMLNode::Element(encode_room(room, options)?));
    }
    root.children.push(XMLNode::Element(rooms));

    let mut responses = Element::new("specialresponses");
    for response in &house.special_responses {
        responses
            .children
            .push(XMLNode::Element(encode_special_response(response)?));
    }
    root.children.push(XMLNode::Element(responses));
    Ok(root)
}

fn encode_room(room: &Room, options: &EncodeOptions) -> Result<Element, ConvertError> {
    let mut element = identity_element(&room.identity, "room", options)?;

    let mut adjacent = Element::new("adjacentrooms");
    for reference in &room.adjacent_rooms {
        let mut child = Element::new("room");
        child.children.push(XMLNode::Text(reference.display()?));
        adjacent.children.push(XMLNode::Element(child));
    }
    element.children.push(XMLNode::Element(adjacent));

    element
        .children
        .push(XMLNode::Element(encode_states(&room.states, options)?));

    let mut items = Element::new("items");
    for item in &room.items {
        items
            .children
            .push(XMLNode::Element(encode_item(item, options)?));
    }
    element.children.push(XMLNode::Element(items));
    Ok(element)
}

fn encode_item(item: &Item, options: &EncodeOptions) -> Result<Element, ConvertError> {
    let mut element = identity_element(&item.identity, "item", options)?;
    element
        .children
        .push(XMLNode::Element(encode_states(&item.states, options)?));
    Ok(element)
}

fn encode_states(states: &[State], options: &EncodeOptions) -> Result<Element, ConvertError> {
    let mut container = Element::new("states");
    for state in states {
        container
            .children
            .push(XMLNode::Element(encode_state(state, options)?));
    }
    Ok(container)
}

fn encode_state(state: &State, options: &EncodeOptions) -> Result<Element, ConvertError> {
    let mut element = identity_element(&state.identity, "state", options)?;
    if let Some(image) = &state.image {
        element
            .attributes
            .insert("image".to_string(), image.clone());
    }
    if let Some(gettable) = state.gettable {
        element
            .attributes
            .insert("gettable".to_string(), gettable.to_string());
    }

    element
        .children
        .push(XMLNode::Element(text_element("description", &state.description)));
    if let Some(get) = &state.get {
        element
            .children
            .push(XMLNode::Element(text_element("get", get)));
    }

    // The same container tag the state was decoded from, so that encode
    // stays the structural inverse of decode.
    let mut container = Element::new(state.condition_source.container_tag());
    for condition in &state.conditions {
        container.children.push(XMLNode::Element(encode_condition(
            condition,
            state.condition_source.condition_tag(),
        )?));
    }
    element.children.push(XMLNode::Element(container));
    Ok(element)
}

fn encode_condition(condition: &Condition, tag: &str) -> Result<Element, ConvertError> {
    let mut element = Element::new(tag);
    element
        .attributes
        .insert("item".to_string(), condition.item.display()?);
    element
        .attributes
        .insert("state".to_string(), condition.state.display()?);
    Ok(element)
}

fn encode_special_response(response: &SpecialResponse) -> Result<Element, ConvertError> {
    // A special response has no identity of its own, only references, so
    // the tag-identity policy never applies here.
    let mut element = Element::new("specialresponse");
    element
        .attributes
        .insert("item".to_string(), response.item.display()?);
    element
        .attributes
        .insert("state".to_string(), response.item_state.display()?);
    if let Some(image) = &response.image {
        element
            .attributes
            .insert("image".to_string(), image.clone());
    }
    if let Some(command) = &response.command {
        element
            .attributes
            .insert("command".to_string(), command.clone());
    }
    if let Some(text) = &response.response {
        element
            .children
            .push(XMLNode::Element(text_element("response", text)));
    }

    let mut actions = Element::new("actions");
    for condition in &response.actions {
        actions
            .children
            .push(XMLNode::Element(encode_condition(condition, "action")?));
    }
    element.children.push(XMLNode::Element(actions));
    Ok(element)
}

/// Choose the output shape for an identity-bearing entity: a custom tag
/// spelled from the entity's name, or the generic kind tag. The identity
/// attribute is emitted in both shapes, so decoding never depends on which
/// shape was chosen.
fn identity_element(
    identity: &Identity,
    generic_tag: &str,
    options: &EncodeOptions,
) -> Result<Element, ConvertError> {
    let (key, value) = identity.to_attribute()?;
    let tag = match &identity.name {
        Some(name) if options.prefer_tag_identity && usable_as_tag(name) => {
            name.to_ascii_lowercase()
        }
        _ => generic_tag.to_string(),
    };
    let mut element = Element::new(&tag);
    element.attributes.insert(key.to_string(), value);
    Ok(element)
}

/// Numeric names and names with whitespace cannot become tags; they fall
/// back to the generic shape regardless of the flag.
fn usable_as_tag(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(char::is_whitespace) && name.parse::<i64>().is_err()
}

fn text_element(tag: &str, text: &str) -> Element {
    let mut element = Element::new(tag);
    if !text.is_empty() {
        element.children.push(XMLNode::Text(text.to_string()));
    }
    element
}
