// src/extractors/party.rs
use crate::extractors::clean_text;
use crate::extractors::paths::{PartyPaths, RolePaths};
use crate::markup::{MarkupNode, MarkupTree, TagPath};
use crate::patent::models::{Examiners, Parties, Party};

/// Turns role containers into [`Party`] records with one shared sub-pattern.
///
/// The same routine serves applicants, inventors, assignees, agents and both
/// examiner sub-roles; the role only decides which containers are supplied
/// and where the resulting list lands.
pub struct PartyExtractor<'p> {
    paths: &'p PartyPaths,
}

impl<'p> PartyExtractor<'p> {
    pub fn new(paths: &'p PartyPaths) -> Self {
        Self { paths }
    }

    /// Parses one container. Containers with no populated field yield `None`.
    pub fn extract(&self, container: MarkupNode<'_>) -> Option<Party> {
        let mut party = Party::default();
        // Several paths may target the same field; the first non-empty one wins
        for (field, path) in &self.paths.fields {
            if let Some(value) = clean_text(container.query_one(path)) {
                party.fill(*field, value);
            }
        }

        if party.is_empty() {
            tracing::trace!("Dropping empty <{}> party container", container.name());
            None
        } else {
            Some(party)
        }
    }

    pub fn extract_all(&self, containers: &[MarkupNode<'_>]) -> Vec<Party> {
        containers.iter().filter_map(|c| self.extract(*c)).collect()
    }

    /// Every party role of one document, plus the role-level metadata.
    pub fn extract_roles(&self, tree: &MarkupTree, roles: &RolePaths) -> Parties {
        let role = |path: &Option<TagPath>| -> Vec<Party> {
            path.as_ref()
                .map(|p| self.extract_all(&tree.query_all(p)))
                .unwrap_or_default()
        };
        let metadata = |path: &Option<TagPath>| -> Option<String> {
            path.as_ref().and_then(|p| clean_text(tree.query_one(p)))
        };

        // Roles the schema lacks stay empty rather than failing
        Parties {
            applicants: role(&roles.applicants),
            inventors: role(&roles.inventors),
            assignees: role(&roles.assignees),
            assignee_role: metadata(&roles.assignee_role),
            agents: role(&roles.agents),
            examiners: Examiners {
                primary: role(&roles.primary_examiners),
                assistant: role(&roles.assistant_examiners),
                department: metadata(&roles.examiner_department),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::paths::GRANT_B_TAGS;

    fn containers<'a>(tree: &'a MarkupTree, path: &str) -> Vec<MarkupNode<'a>> {
        tree.query_all(&TagPath::parse(path).unwrap())
    }

    #[test]
    fn test_organization_only_party() {
        let tree = MarkupTree::parse("<B731><PARTY-US><NAM><ONM><STEXT><PDAT>Acme Corp</PDAT></STEXT></ONM></NAM></PARTY-US></B731>");
        let extractor = PartyExtractor::new(&GRANT_B_TAGS.party);
        let parties = extractor.extract_all(&containers(&tree, "b731"));
        assert_eq!(parties.len(), 1);
        assert_eq!(
            parties[0],
            Party {
                organization: Some("Acme Corp".to_string()),
                ..Party::default()
            }
        );
    }

    #[test]
    fn test_empty_container_yields_no_party() {
        let tree = MarkupTree::parse("<B721><NAM><FNM> </FNM><SNM></SNM></NAM><ADR><CITY>\n</CITY></ADR></B721>");
        let extractor = PartyExtractor::new(&GRANT_B_TAGS.party);
        assert!(extractor.extract_all(&containers(&tree, "b721")).is_empty());
    }

    #[test]
    fn test_full_inventor_record() {
        let tree = MarkupTree::parse(
            "<B720><B721><PARTY-US><NAM><FNM><PDAT>Jane Q.</PDAT></FNM><SNM><STEXT><PDAT>Public</PDAT></STEXT></SNM><SFX><PDAT>Jr.</PDAT></SFX></NAM>\
             <ADR><CITY><PDAT>Austin</PDAT></CITY><STATE><PDAT>TX</PDAT></STATE><PCODE><PDAT>78701</PDAT></PCODE><CTRY><PDAT>US</PDAT></CTRY></ADR></PARTY-US>\
             <NCTRY><CTRY>US</CTRY></NCTRY></B721>\
             <B721><PARTY-US><NAM><FNM><PDAT>Bo</PDAT></FNM></NAM></PARTY-US></B721></B720>",
        );
        let extractor = PartyExtractor::new(&GRANT_B_TAGS.party);
        let parties = extractor.extract_all(&containers(&tree, "b720//b721"));
        assert_eq!(parties.len(), 2);
        let jane = &parties[0];
        assert_eq!(jane.first_name.as_deref(), Some("Jane Q."));
        assert_eq!(jane.last_name.as_deref(), Some("Public"));
        assert_eq!(jane.suffix.as_deref(), Some("Jr."));
        assert_eq!(jane.city.as_deref(), Some("Austin"));
        assert_eq!(jane.state.as_deref(), Some("TX"));
        assert_eq!(jane.postal_code.as_deref(), Some("78701"));
        assert_eq!(jane.country.as_deref(), Some("US"));
        assert_eq!(jane.residence.as_deref(), Some("US"));
        assert_eq!(jane.nationality, None);
        assert_eq!(parties[1].first_name.as_deref(), Some("Bo"));
        assert_eq!(parties[1].last_name, None);
    }

    #[test]
    fn test_roles_and_metadata() {
        let tree = MarkupTree::parse(
            "<PATDOC><B700>\
             <B730><B731><PARTY-US><NAM><ONM>Acme Corp</ONM></NAM></PARTY-US></B731><B732US><PDAT>02</PDAT></B732US></B730>\
             <B740><B741><PARTY-US><NAM><ONM>Law LLP</ONM></NAM></PARTY-US></B741></B740>\
             <B745><B746><PARTY-US><NAM><FNM>Pat</FNM><SNM>Prime</SNM></NAM></PARTY-US></B746>\
             <B747><PARTY-US><NAM><FNM>Al</FNM><SNM>Assist</SNM></NAM></PARTY-US></B747><B748US>2841</B748US></B745>\
             </B700></PATDOC>",
        );
        let extractor = PartyExtractor::new(&GRANT_B_TAGS.party);
        let parties = extractor.extract_roles(&tree, &GRANT_B_TAGS.roles);

        assert!(parties.applicants.is_empty());
        assert!(parties.inventors.is_empty());
        assert_eq!(parties.assignees.len(), 1);
        assert_eq!(parties.assignee_role.as_deref(), Some("02"));
        assert_eq!(parties.agents[0].organization.as_deref(), Some("Law LLP"));
        assert_eq!(parties.examiners.primary[0].last_name.as_deref(), Some("Prime"));
        assert_eq!(parties.examiners.assistant[0].first_name.as_deref(), Some("Al"));
        assert_eq!(parties.examiners.department.as_deref(), Some("2841"));
    }

    #[test]
    fn test_first_alternative_wins() {
        let paths = PartyPaths {
            fields: vec![
                (crate::patent::models::PartyField::City, TagPath::parse("residence//city").unwrap()),
                (crate::patent::models::PartyField::City, TagPath::parse("address/city").unwrap()),
            ],
        };
        let tree = MarkupTree::parse("<inventor><address><city>Mail</city></address><residence><residence-us><city>Home</city></residence-us></residence></inventor>");
        let extractor = PartyExtractor::new(&paths);
        let party = extractor.extract(containers(&tree, "inventor")[0]).unwrap();
        assert_eq!(party.city.as_deref(), Some("Home"));
    }
}
