use roxmltree::Node;

use crate::error::{node_location, ConvertError, ConvertErrorCode, SourceLocation};

/// One step of an ordered fallback chain for pulling a field out of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Attribute(&'static str),
    ChildText(&'static str),
    OwnText,
}

impl Lookup {
    fn apply<'a>(self, node: Node<'a, '_>) -> Option<&'a str> {
        match self {
            Lookup::Attribute(key) => node.attribute(key),
            Lookup::ChildText(key) => node
                .descendants()
                .skip(1)
                .find(|descendant| descendant.has_tag_name(key))
                .and_then(element_text),
            Lookup::OwnText => element_text(node),
        }
    }
}

fn element_text<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.text().map(str::trim).filter(|text| !text.is_empty())
}

/// First strategy in the chain that yields a value wins.
pub fn lookup_text<'a>(node: Node<'a, '_>, chain: &[Lookup]) -> Option<&'a str> {
    chain.iter().find_map(|lookup| lookup.apply(node))
}

/// Same chain as `lookup_text`, but a candidate that fails to parse as an
/// integer falls through to the next candidate instead of aborting.
pub fn lookup_int(node: Node<'_, '_>, chain: &[Lookup]) -> Option<i64> {
    chain
        .iter()
        .filter_map(|lookup| lookup.apply(node))
        .find_map(|candidate| candidate.trim().parse::<i64>().ok())
}

#[derive(Debug, Clone, Copy)]
pub struct IdentityProfile {
    pub name_search: &'static [Lookup],
    pub id_search: &'static [Lookup],
}

/// Which position in the document an identity is being resolved from.
/// Each context maps to a fixed pair of lookup chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveContext {
    /// A standalone room, item, or state element.
    Entity,
    /// An item referenced from inside another entity.
    ItemRef,
    /// A state referenced from inside another entity.
    StateRef,
    /// A room referenced from an adjacency list; identified purely by the
    /// referencing node's own text, and only through the integer chain.
    AdjacentRoom,
    /// The item-state reference on a special response, which also accepts
    /// the legacy `itemstate` key.
    ResponseState,
}

const ENTITY_PROFILE: IdentityProfile = IdentityProfile {
    name_search: &[Lookup::Attribute("name"), Lookup::ChildText("name")],
    id_search: &[
        Lookup::Attribute("id"),
        Lookup::ChildText("id"),
        Lookup::Attribute("index"),
        Lookup::ChildText("index"),
    ],
};

const ITEM_REF_SEARCH: &[Lookup] = &[Lookup::Attribute("item"), Lookup::ChildText("item")];

const ITEM_REF_PROFILE: IdentityProfile = IdentityProfile {
    name_search: ITEM_REF_SEARCH,
    id_search: ITEM_REF_SEARCH,
};

const STATE_REF_SEARCH: &[Lookup] = &[Lookup::Attribute("state"), Lookup::ChildText("state")];

const STATE_REF_PROFILE: IdentityProfile = IdentityProfile {
    name_search: STATE_REF_SEARCH,
    id_search: STATE_REF_SEARCH,
};

const ADJACENT_ROOM_PROFILE: IdentityProfile = IdentityProfile {
    name_search: &[],
    id_search: &[Lookup::OwnText],
};

const RESPONSE_STATE_SEARCH: &[Lookup] = &[
    Lookup::Attribute("state"),
    Lookup::ChildText("state"),
    Lookup::Attribute("itemstate"),
    Lookup::ChildText("itemstate"),
];

const RESPONSE_STATE_PROFILE: IdentityProfile = IdentityProfile {
    name_search: RESPONSE_STATE_SEARCH,
    id_search: RESPONSE_STATE_SEARCH,
};

pub fn profile(context: ResolveContext) -> &'static IdentityProfile {
    match context {
        ResolveContext::Entity => &ENTITY_PROFILE,
        ResolveContext::ItemRef => &ITEM_REF_PROFILE,
        ResolveContext::StateRef => &STATE_REF_PROFILE,
        ResolveContext::AdjacentRoom => &ADJACENT_ROOM_PROFILE,
        ResolveContext::ResponseState => &RESPONSE_STATE_PROFILE,
    }
}

/// The (id, name) pair identifying an entity. Either side may be absent;
/// completeness is only enforced at the moment the identity is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub source: Option<SourceLocation>,
}

impl Identity {
    pub fn from_id(id: i64, source: Option<SourceLocation>) -> Self {
        Self {
            id: Some(id),
            name: None,
            source,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_none()
    }

    /// Render for display or element text: name first, then id.
    pub fn display(&self) -> Result<String, ConvertError> {
        if let Some(name) = &self.name {
            Ok(name.clone())
        } else if let Some(id) = self.id {
            Ok(id.to_string())
        } else {
            Err(self.missing())
        }
    }

    /// Render as an attribute pair. Must stay consistent with `display`:
    /// same priority order, name before id.
    pub fn to_attribute(&self) -> Result<(&'static str, String), ConvertError> {
        if let Some(name) = &self.name {
            Ok(("name", name.clone()))
        } else if let Some(id) = self.id {
            Ok(("id", id.to_string()))
        } else {
            Err(self.missing())
        }
    }

    fn missing(&self) -> ConvertError {
        ConvertError {
            code: ConvertErrorCode::MissingIdentity,
            message: "identity has neither a name nor an id".to_string(),
            location: self.source,
        }
    }
}

pub fn resolve_identity(node: Node<'_, '_>, context: ResolveContext) -> Identity {
    let searches = profile(context);
    Identity {
        id: lookup_int(node, searches.id_search),
        name: lookup_text(node, searches.name_search).map(str::to_string),
        source: Some(node_location(node)),
    }
}

#[cfg(test)]
mod tests {
    use roxmltree::Document;

    use super::*;

    fn with_root<T>(xml: &str, check: impl FnOnce(Node<'_, '_>) -> T) -> T {
        let doc = Document::parse(xml).expect("parse");
        check(doc.root_element())
    }

    #[test]
    fn int_lookup_skips_unparsable_candidates() {
        with_root(r#"<node a="abc" b="12" c="7"/>"#, |node| {
            let chain = [
                Lookup::Attribute("a"),
                Lookup::Attribute("b"),
                Lookup::Attribute("c"),
            ];
            assert_eq!(lookup_int(node, &chain), Some(12));
        });
    }

    #[test]
    fn int_lookup_is_none_when_no_candidate_parses() {
        with_root(r#"<node a="abc"/>"#, |node| {
            let chain = [Lookup::Attribute("a"), Lookup::Attribute("missing")];
            assert_eq!(lookup_int(node, &chain), None);
        });
    }

    #[test]
    fn text_lookup_prefers_earlier_strategies() {
        with_root(r#"<node name="attr"><name>child</name></node>"#, |node| {
            let chain = [Lookup::Attribute("name"), Lookup::ChildText("name")];
            assert_eq!(lookup_text(node, &chain), Some("attr"));
        });
    }

    #[test]
    fn child_text_finds_first_matching_descendant() {
        with_root(
            "<node><inner><name>nested</name></inner><name>direct</name></node>",
            |node| {
                assert_eq!(
                    lookup_text(node, &[Lookup::ChildText("name")]),
                    Some("nested")
                );
            },
        );
    }

    #[test]
    fn child_text_never_matches_the_node_itself() {
        with_root("<name>own</name>", |node| {
            assert_eq!(lookup_text(node, &[Lookup::ChildText("name")]), None);
        });
    }

    #[test]
    fn own_text_is_trimmed_and_empty_is_none() {
        with_root("<room>  Kitchen  </room>", |node| {
            assert_eq!(lookup_text(node, &[Lookup::OwnText]), Some("Kitchen"));
        });
        with_root("<room>   </room>", |node| {
            assert_eq!(lookup_text(node, &[Lookup::OwnText]), None);
        });
    }

    #[test]
    fn entity_profile_reads_index_as_id_fallback() {
        with_root(r#"<item index="3"/>"#, |node| {
            let identity = resolve_identity(node, ResolveContext::Entity);
            assert_eq!(identity.id, Some(3));
            assert_eq!(identity.name, None);
        });
    }

    #[test]
    fn keyed_profile_reads_attribute_and_child_forms() {
        with_root(r#"<prereq item="Sword" state="4"/>"#, |node| {
            let item = resolve_identity(node, ResolveContext::ItemRef);
            assert_eq!(item.name.as_deref(), Some("Sword"));
            assert_eq!(item.id, None);
            let state = resolve_identity(node, ResolveContext::StateRef);
            assert_eq!(state.id, Some(4));
        });
        with_root("<prereq><item>Sword</item></prereq>", |node| {
            let item = resolve_identity(node, ResolveContext::ItemRef);
            assert_eq!(item.name.as_deref(), Some("Sword"));
        });
    }

    #[test]
    fn adjacency_profile_drops_non_numeric_references() {
        // OwnText feeds only the integer chain, so a room referenced by
        // name decodes to a fully empty identity.
        with_root("<room>Kitchen</room>", |node| {
            let identity = resolve_identity(node, ResolveContext::AdjacentRoom);
            assert!(identity.is_empty());
        });
        with_root("<room>2</room>", |node| {
            let identity = resolve_identity(node, ResolveContext::AdjacentRoom);
            assert_eq!(identity.id, Some(2));
        });
    }

    #[test]
    fn response_state_profile_accepts_legacy_key() {
        with_root(r#"<specialresponse itemstate="Lit"/>"#, |node| {
            let identity = resolve_identity(node, ResolveContext::ResponseState);
            assert_eq!(identity.name.as_deref(), Some("Lit"));
        });
    }

    #[test]
    fn display_prefers_name_over_id() {
        let identity = Identity {
            id: Some(7),
            name: Some("Sword".to_string()),
            source: None,
        };
        assert_eq!(identity.display().expect("display"), "Sword");
    }

    #[test]
    fn display_falls_back_to_id() {
        let identity = Identity::from_id(7, None);
        assert_eq!(identity.display().expect("display"), "7");
    }

    #[test]
    fn display_of_empty_identity_is_missing_identity() {
        let identity = Identity {
            id: None,
            name: None,
            source: Some(SourceLocation { line: 4, column: 2 }),
        };
        let error = identity.display().expect_err("empty identity");
        assert_eq!(error.code, ConvertErrorCode::MissingIdentity);
        assert_eq!(error.location, Some(SourceLocation { line: 4, column: 2 }));
    }

    #[test]
    fn attribute_rendering_matches_display_priority() {
        let named = Identity {
            id: Some(7),
            name: Some("Sword".to_string()),
            source: None,
        };
        assert_eq!(
            named.to_attribute().expect("named"),
            ("name", "Sword".to_string())
        );
        let numbered = Identity::from_id(7, None);
        assert_eq!(
            numbered.to_attribute().expect("numbered"),
            ("id", "7".to_string())
        );
        let empty = Identity {
            id: None,
            name: None,
            source: None,
        };
        assert_eq!(
            empty.to_attribute().expect_err("empty").code,
            ConvertErrorCode::MissingIdentity
        );
    }
}
