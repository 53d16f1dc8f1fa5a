// src/extractors/paths.rs
//! Path tables: one per supported dialect.
//!
//! Each table maps every `PatentDocument` field to a query path and a
//! post-processing rule. The grant SGML 2.4 and XML 2.5 generations share the
//! ST.32 B-tag vocabulary and therefore one table.

use crate::extractors::leading_integer;
use crate::markup::{MarkupTree, TagPath};
use crate::patent::dialect::Dialect;
use crate::patent::models::{DocFamily, PartyField, SchemaVersion};
use once_cell::sync::Lazy;

/// How raw element text becomes a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostRule {
    Trim,
    /// Leading decimal digits, 0 when absent or non-numeric.
    IntegerOrZero,
    DefaultIfEmpty(&'static str),
}

impl PostRule {
    pub fn apply(&self, raw: Option<&str>) -> String {
        let trimmed = raw.map(str::trim).unwrap_or("");
        match self {
            PostRule::Trim => trimmed.to_string(),
            PostRule::IntegerOrZero => leading_integer(trimmed).unwrap_or(0).to_string(),
            PostRule::DefaultIfEmpty(default) if trimmed.is_empty() => default.to_string(),
            PostRule::DefaultIfEmpty(_) => trimmed.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldRule {
    pub path: TagPath,
    pub rule: PostRule,
}

impl FieldRule {
    /// Resolves the field against the whole fragment; a missing path yields the rule's default.
    pub fn text(&self, tree: &MarkupTree) -> String {
        let raw = tree.query_one(&self.path).map(|node| node.text());
        let value = self.rule.apply(raw.as_deref());
        if raw.is_none() {
            tracing::trace!("No match for '{}', using default {:?}", self.path.as_str(), value);
        }
        value
    }

    /// Numeric view of [`text`](Self::text); anything the rule leaves non-numeric counts as 0.
    pub fn integer(&self, tree: &MarkupTree) -> u32 {
        leading_integer(&self.text(tree)).unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct ClaimPaths {
    pub container: TagPath,
    /// Claim elements, relative to the container.
    pub claim: TagPath,
    pub id_attribute: &'static str,
    pub declared_count: Option<FieldRule>,
    pub exemplary: Option<TagPath>,
}

/// One classification scheme; member paths are relative to the container.
#[derive(Debug, Clone)]
pub struct SchemePaths {
    pub container: TagPath,
    pub main: TagPath,
    pub sub: TagPath,
    pub country: Option<TagPath>,
    /// Set when entries are structured rather than a single text symbol.
    pub symbol: Option<SymbolPaths>,
}

/// Parts of a structured entry such as ST.36 `classification-ipcr`,
/// rendered as `<prefix parts concatenated> <group>/<subgroup>` (e.g. `H01L 21/02`).
#[derive(Debug, Clone)]
pub struct SymbolPaths {
    pub prefix: Vec<TagPath>,
    pub group: TagPath,
    pub subgroup: TagPath,
}

#[derive(Debug, Clone)]
pub struct ClassificationPaths {
    pub domestic: Option<SchemePaths>,
    pub international: Option<SchemePaths>,
}

/// The name/address sub-pattern shared by every party role.
/// Paths are relative to a role container; the first non-empty match per field wins.
#[derive(Debug, Clone)]
pub struct PartyPaths {
    pub fields: Vec<(PartyField, TagPath)>,
}

/// Where each role's containers live. `None` means the schema has no such role.
#[derive(Debug, Clone, Default)]
pub struct RolePaths {
    pub applicants: Option<TagPath>,
    pub inventors: Option<TagPath>,
    pub assignees: Option<TagPath>,
    pub assignee_role: Option<TagPath>,
    pub agents: Option<TagPath>,
    pub primary_examiners: Option<TagPath>,
    pub assistant_examiners: Option<TagPath>,
    pub examiner_department: Option<TagPath>,
}

#[derive(Debug, Clone)]
pub struct GrantInfoPaths {
    pub disclaimer: TagPath,
    pub term_extension: TagPath,
}

#[derive(Debug, Clone)]
pub struct PathTable {
    pub delimiter: &'static str,
    pub doc_number: FieldRule,
    pub kind_code: FieldRule,
    pub publication_date: FieldRule,
    pub country: FieldRule,
    pub application_number: FieldRule,
    pub filing_date: FieldRule,
    pub series_code: Option<FieldRule>,
    pub title: FieldRule,
    pub abstract_text: FieldRule,
    pub description: FieldRule,
    pub claims: ClaimPaths,
    pub classifications: ClassificationPaths,
    pub party: PartyPaths,
    pub roles: RolePaths,
    pub grant_info: Option<GrantInfoPaths>,
}

pub fn table_for(dialect: Dialect) -> Option<&'static PathTable> {
    match (dialect.family(), dialect.schema()) {
        (DocFamily::Grant, SchemaVersion::SgmlV2 | SchemaVersion::XmlV2) => Some(&*GRANT_B_TAGS),
        (DocFamily::Grant, SchemaVersion::XmlV4) => Some(&*GRANT_XML_V4),
        (DocFamily::Application, SchemaVersion::XmlV1) => Some(&*APPLICATION_XML_V1),
        (DocFamily::Application, SchemaVersion::XmlV4) => Some(&*APPLICATION_XML_V4),
        _ => None,
    }
}

fn path(p: &str) -> TagPath {
    TagPath::parse(p).expect("Failed to compile path table entry")
}

fn trim(p: &str) -> FieldRule {
    FieldRule { path: path(p), rule: PostRule::Trim }
}

fn default_if_empty(p: &str, default: &'static str) -> FieldRule {
    FieldRule { path: path(p), rule: PostRule::DefaultIfEmpty(default) }
}

fn integer(p: &str) -> FieldRule {
    FieldRule { path: path(p), rule: PostRule::IntegerOrZero }
}

fn party_paths(fields: &[(PartyField, &str)]) -> PartyPaths {
    PartyPaths {
        fields: fields.iter().map(|(field, p)| (*field, path(p))).collect(),
    }
}

// --- Grants, SGML 2.4 / XML 2.5 (ST.32 B-tags) ---
pub static GRANT_B_TAGS: Lazy<PathTable> = Lazy::new(|| PathTable {
    delimiter: "PATDOC",
    doc_number: trim("b110"),
    kind_code: trim("b130"),
    publication_date: trim("b140"),
    country: default_if_empty("b190", "US"),
    application_number: trim("b210"),
    filing_date: trim("b220"),
    series_code: None,
    title: trim("b540"),
    abstract_text: trim("sdoab"),
    description: trim("sdod"),
    claims: ClaimPaths {
        container: path("sdocl"),
        claim: path("clm"),
        id_attribute: "id",
        declared_count: Some(integer("b570//b577")),
        exemplary: Some(path("b570//b578us")),
    },
    // B510 is stored as domestic and B520 (which carries the B527 country) as international.
    classifications: ClassificationPaths {
        domestic: Some(SchemePaths {
            container: path("b510"),
            main: path("b511"),
            sub: path("b512"),
            country: None,
            symbol: None,
        }),
        international: Some(SchemePaths {
            container: path("b520"),
            main: path("b521"),
            sub: path("b522"),
            country: Some(path("b527")),
            symbol: None,
        }),
    },
    party: party_paths(&[
        (PartyField::FirstName, "nam/fnm"),
        (PartyField::LastName, "nam/snm"),
        (PartyField::Suffix, "nam/sfx"),
        (PartyField::Organization, "nam/onm"),
        (PartyField::Division, "nam/odv"),
        (PartyField::Residence, "nctry"),
        (PartyField::Nationality, "rctry"),
        (PartyField::City, "adr/city"),
        (PartyField::State, "adr/state"),
        (PartyField::PostalCode, "adr/pcode"),
        (PartyField::Country, "adr/ctry"),
    ]),
    roles: RolePaths {
        applicants: Some(path("b710//b711")),
        inventors: Some(path("b720//b721")),
        assignees: Some(path("b730//b731")),
        assignee_role: Some(path("b730//b732us")),
        agents: Some(path("b740//b741")),
        primary_examiners: Some(path("b745//b746")),
        assistant_examiners: Some(path("b745//b747")),
        examiner_department: Some(path("b745//b748us")),
    },
    grant_info: Some(GrantInfoPaths {
        disclaimer: path("b472//b473us"),
        term_extension: path("b472//b474us"),
    }),
});

// --- Applications, XML 1.x (pap-v15/v16) ---
const APP_ROOT: &str = "patent-application-publication";
const APP_BIB: &str = "patent-application-publication/subdoc-bibliographic-information";

pub static APPLICATION_XML_V1: Lazy<PathTable> = Lazy::new(|| {
    let bib = |p: &str| format!("{}/{}", APP_BIB, p);
    PathTable {
        delimiter: "patent-application-publication",
        doc_number: trim(&bib("document-id/doc-number")),
        kind_code: trim(&bib("document-id/kind-code")),
        publication_date: trim(&bib("document-id/document-date")),
        country: default_if_empty(&bib("document-id/country-code"), "US"),
        application_number: trim(&bib("domestic-filing-data/application-number/doc-number")),
        filing_date: trim(&bib("domestic-filing-data/filing-date")),
        series_code: Some(trim(&bib("domestic-filing-data/application-number-series-code"))),
        title: trim(&bib("technical-information/title-of-invention")),
        abstract_text: trim(&format!("{}/subdoc-abstract", APP_ROOT)),
        description: trim(&format!("{}/subdoc-description", APP_ROOT)),
        claims: ClaimPaths {
            container: path(&format!("{}/subdoc-claims", APP_ROOT)),
            claim: path("claim"),
            id_attribute: "id",
            declared_count: None,
            exemplary: None,
        },
        classifications: ClassificationPaths {
            domestic: Some(SchemePaths {
                container: path(&bib("technical-information/classification-us")),
                main: path("classification-us-primary//uspc"),
                sub: path("classification-us-secondary//uspc"),
                country: None,
                symbol: None,
            }),
            international: Some(SchemePaths {
                container: path(&bib("technical-information/classification-ipc")),
                main: path("classification-ipc-primary//ipc"),
                sub: path("classification-ipc-secondary//ipc"),
                country: None,
                symbol: None,
            }),
        },
        party: party_paths(&[
            (PartyField::FirstName, "name/given-name"),
            (PartyField::LastName, "name/family-name"),
            (PartyField::Suffix, "name/name-suffix"),
            (PartyField::Organization, "organization-name | name-1"),
            (PartyField::Residence, "residence//country-code"),
            (PartyField::Nationality, "citizenship"),
            (PartyField::City, "residence//city | address/city"),
            (PartyField::State, "residence//state | address/state"),
            (PartyField::PostalCode, "address/postalcode"),
            (PartyField::Country, "address//country-code | residence//country-code"),
        ]),
        roles: RolePaths {
            inventors: Some(path(&format!(
                "{} | {}",
                bib("inventors/first-named-inventor"),
                bib("inventors/inventor")
            ))),
            assignees: Some(path(&bib("assignee"))),
            assignee_role: Some(path(&bib("assignee/assignee-type"))),
            agents: Some(path(&bib("correspondence-address"))),
            ..RolePaths::default()
        },
        grant_info: None,
    }
});

// --- ST.36 XML 4.x, grants and applications ---
pub static GRANT_XML_V4: Lazy<PathTable> =
    Lazy::new(|| xml_v4_table("us-patent-grant", "us-bibliographic-data-grant", DocFamily::Grant));

pub static APPLICATION_XML_V4: Lazy<PathTable> = Lazy::new(|| {
    xml_v4_table("us-patent-application", "us-bibliographic-data-application", DocFamily::Application)
});

fn xml_v4_table(root: &'static str, bib_name: &str, family: DocFamily) -> PathTable {
    let bib = |p: &str| format!("{}/{}/{}", root, bib_name, p);
    let is_grant = family == DocFamily::Grant;

    let mut roles = RolePaths {
        applicants: Some(path(&format!(
            "{} | {}",
            bib("parties/applicants/applicant"),
            bib("us-parties/us-applicants/us-applicant")
        ))),
        inventors: Some(path(&format!(
            "{} | {}",
            bib("parties/inventors/inventor"),
            bib("us-parties/inventors/inventor")
        ))),
        assignees: Some(path(&bib("assignees/assignee"))),
        assignee_role: Some(path(&bib("assignees/assignee//role"))),
        agents: Some(path(&format!(
            "{} | {}",
            bib("parties/agents/agent"),
            bib("us-parties/agents/agent")
        ))),
        ..RolePaths::default()
    };
    if is_grant {
        roles.primary_examiners = Some(path(&bib("examiners/primary-examiner")));
        roles.assistant_examiners = Some(path(&bib("examiners/assistant-examiner")));
        roles.examiner_department = Some(path(&bib("examiners//department")));
    }

    PathTable {
        delimiter: root,
        doc_number: trim(&bib("publication-reference/document-id/doc-number")),
        kind_code: trim(&bib("publication-reference/document-id/kind")),
        publication_date: trim(&bib("publication-reference/document-id/date")),
        country: default_if_empty(&bib("publication-reference/document-id/country"), "US"),
        application_number: trim(&bib("application-reference/document-id/doc-number")),
        filing_date: trim(&bib("application-reference/document-id/date")),
        series_code: (!is_grant).then(|| trim(&bib("us-application-series-code"))),
        title: trim(&bib("invention-title")),
        abstract_text: trim(&format!("{}/abstract", root)),
        description: trim(&format!("{}/description", root)),
        claims: ClaimPaths {
            container: path(&format!("{}/claims", root)),
            claim: path("claim"),
            id_attribute: "id",
            declared_count: Some(integer(&bib("number-of-claims"))),
            exemplary: Some(path(&bib("us-exemplary-claim"))),
        },
        classifications: ClassificationPaths {
            domestic: Some(SchemePaths {
                container: path(&bib("classification-national")),
                main: path("main-classification"),
                sub: path("further-classification"),
                country: None,
                symbol: None,
            }),
            // IPC up to 7th edition, or IPCR (v4.1 onward) with one structured entry per class.
            international: Some(SchemePaths {
                container: path(&format!("{} | {}", bib("classification-ipc"), bib("classifications-ipcr"))),
                main: path("main-classification | classification-ipcr"),
                sub: path("further-classification"),
                country: None,
                symbol: Some(SymbolPaths {
                    prefix: vec![path("section"), path("class"), path("subclass")],
                    group: path("main-group"),
                    subgroup: path("subgroup"),
                }),
            }),
        },
        party: party_paths(&[
            (PartyField::FirstName, "first-name"),
            (PartyField::LastName, "last-name"),
            (PartyField::Suffix, "suffix"),
            (PartyField::Organization, "orgname"),
            (PartyField::Residence, "residence/country"),
            (PartyField::Nationality, "nationality/country"),
            (PartyField::City, "address/city"),
            (PartyField::State, "address/state"),
            (PartyField::PostalCode, "address/postcode"),
            (PartyField::Country, "address/country"),
        ]),
        roles,
        grant_info: is_grant.then(|| GrantInfoPaths {
            disclaimer: path(&bib("us-term-of-grant/disclaimer")),
            term_extension: path(&bib("us-term-of-grant/us-term-extension")),
        }),
    }
}
