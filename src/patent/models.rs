// src/patent/models.rs
use serde::{Deserialize, Serialize};

/// Which publication series a bulk file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DocFamily {
    Grant,
    Application,
}

/// Tag-naming generation of the source markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SchemaVersion {
    SgmlV2,
    XmlV2,
    XmlV1,
    XmlV4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatentType {
    Utility,
    Other,
}

/// One document extracted from a bulk file.
///
/// Text fields whose path had no match hold an empty string; optional
/// sub-records are omitted when their source elements are missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatentDocument {
    pub doc_family: DocFamily,
    pub schema_version: SchemaVersion,
    pub doc_number: String,
    pub kind_code: String,
    pub patent_type: PatentType,
    pub publication_date: String,
    pub country: String,
    pub application_number: String,
    pub filing_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_code: Option<String>,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub description: String,
    pub classifications: Classifications,
    pub claims: Vec<Claim>,
    /// Count taken from the document's own metadata; 0 when absent.
    pub declared_claim_count: u32,
    /// Number of claim elements actually present. Not reconciled with the declared count.
    pub observed_claim_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exemplary_claim: Option<u32>,
    pub parties: Parties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grant_info: Option<GrantInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classifications {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domestic: Option<ClassificationSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub international: Option<ClassificationSet>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationSet {
    pub main_classes: Vec<String>,
    pub sub_classes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    pub text: String,
}

/// A person or organization attached to a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Addressable field of a [`Party`], used by the per-schema path tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyField {
    FirstName,
    LastName,
    Suffix,
    Organization,
    Division,
    Residence,
    Nationality,
    City,
    State,
    PostalCode,
    Country,
}

impl Party {
    pub fn is_empty(&self) -> bool {
        *self == Party::default()
    }

    fn slot(&mut self, field: PartyField) -> &mut Option<String> {
        match field {
            PartyField::FirstName => &mut self.first_name,
            PartyField::LastName => &mut self.last_name,
            PartyField::Suffix => &mut self.suffix,
            PartyField::Organization => &mut self.organization,
            PartyField::Division => &mut self.division,
            PartyField::Residence => &mut self.residence,
            PartyField::Nationality => &mut self.nationality,
            PartyField::City => &mut self.city,
            PartyField::State => &mut self.state,
            PartyField::PostalCode => &mut self.postal_code,
            PartyField::Country => &mut self.country,
        }
    }

    /// Sets `field` unless an earlier path already filled it.
    pub fn fill(&mut self, field: PartyField, value: String) {
        let slot = self.slot(field);
        if slot.is_none() {
            *slot = Some(value);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parties {
    pub applicants: Vec<Party>,
    pub inventors: Vec<Party>,
    pub assignees: Vec<Party>,
    /// Assignee type code (e.g. B732US), attached to the role rather than to a party.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_role: Option<String>,
    pub agents: Vec<Party>,
    pub examiners: Examiners,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Examiners {
    pub primary: Vec<Party>,
    pub assistant: Vec<Party>,
    /// Art group / unit, shared by the whole examiner group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_extension: Option<String>,
}

impl GrantInfo {
    pub fn is_empty(&self) -> bool {
        self.disclaimer.is_none() && self.term_extension.is_none()
    }
}
