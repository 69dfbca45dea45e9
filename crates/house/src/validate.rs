use crate::error::SourceLocation;
use crate::model::{Condition, House};
use crate::resolve::Identity;

/// A non-fatal identity-completeness finding. The encoder still fails hard
/// on the first empty identity it has to render; validation exists to
/// report all of them up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub entity: &'static str,
    pub location: Option<SourceLocation>,
    pub message: String,
}

/// Collect every identity the encoder would have to render that has
/// neither a name nor an id. Referential integrity of the references is
/// deliberately not checked.
pub fn validate_house(house: &House) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for room in &house.rooms {
        check(&room.identity, "room", &mut issues);
        for reference in &room.adjacent_rooms {
            check(reference, "adjacent room reference", &mut issues);
        }
        for state in &room.states {
            check(&state.identity, "state", &mut issues);
            check_conditions(&state.conditions, &mut issues);
        }
        for item in &room.items {
            check(&item.identity, "item", &mut issues);
            for state in &item.states {
                check(&state.identity, "state", &mut issues);
                check_conditions(&state.conditions, &mut issues);
            }
        }
    }
    for response in &house.special_responses {
        check(&response.item, "special response item reference", &mut issues);
        check(
            &response.item_state,
            "special response state reference",
            &mut issues,
        );
        check_conditions(&response.actions, &mut issues);
    }
    issues
}

fn check_conditions(conditions: &[Condition], issues: &mut Vec<ValidationIssue>) {
    for condition in conditions {
        check(&condition.item, "condition item reference", issues);
        check(&condition.state, "condition state reference", issues);
    }
}

fn check(identity: &Identity, entity: &'static str, issues: &mut Vec<ValidationIssue>) {
    if identity.is_empty() {
        issues.push(ValidationIssue {
            entity,
            location: identity.source,
            message: format!("{entity} is missing both a name and an id"),
        });
    }
}

#[cfg(test)]
mod tests {
    use roxmltree::Document;

    use crate::decode::decode_house;

    use super::*;

    fn decode(xml: &str) -> House {
        let doc = Document::parse(xml).expect("parse");
        decode_house(doc.root_element()).expect("decode")
    }

    #[test]
    fn complete_identities_produce_no_issues() {
        let house = decode(
            r#"<house><rooms><room name="Hall">
                <adjacentrooms><room>1</room></adjacentrooms>
                <states><state name="Dim"><actions/></state></states>
            </room></rooms></house>"#,
        );
        assert!(validate_house(&house).is_empty());
    }

    #[test]
    fn empty_identities_are_each_reported_once() {
        // A nameless room and a named-only adjacency reference both decode
        // to empty identities.
        let house = decode(
            r#"<house><rooms><room>
                <adjacentrooms><room>Kitchen</room></adjacentrooms>
            </room></rooms></house>"#,
        );
        let issues = validate_house(&house);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].entity, "room");
        assert_eq!(issues[1].entity, "adjacent room reference");
        assert!(issues[1].location.is_some());
    }
}
