// src/patent/dialect.rs
use crate::extractors::paths::{self, PathTable};
use crate::patent::models::{DocFamily, SchemaVersion};
use crate::utils::error::ExtractError;
use std::fmt;

/// A supported (family, schema generation) pair.
///
/// Chosen by the caller, never detected: the same bulk file read under the
/// wrong dialect simply yields no fragments or empty fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dialect {
    family: DocFamily,
    schema: SchemaVersion,
}

impl Dialect {
    pub fn new(family: DocFamily, schema: SchemaVersion) -> Result<Self, ExtractError> {
        let dialect = Self { family, schema };
        if paths::table_for(dialect).is_none() {
            return Err(ExtractError::UnsupportedDialect {
                family: format!("{:?}", family).to_lowercase(),
                schema: format!("{:?}", schema).to_lowercase(),
            });
        }
        Ok(dialect)
    }

    pub fn family(&self) -> DocFamily {
        self.family
    }

    pub fn schema(&self) -> SchemaVersion {
        self.schema
    }

    /// Root tag that delimits one document inside a bulk file.
    pub fn delimiter(&self) -> &'static str {
        self.path_table().delimiter
    }

    pub(crate) fn path_table(&self) -> &'static PathTable {
        // `new` is the only constructor and it rejects pairs without a table.
        paths::table_for(*self).unwrap_or(&*paths::GRANT_B_TAGS)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let family = match self.family {
            DocFamily::Grant => "grant",
            DocFamily::Application => "application",
        };
        let schema = match self.schema {
            SchemaVersion::SgmlV2 => "sgml_v2",
            SchemaVersion::XmlV2 => "xml_v2",
            SchemaVersion::XmlV1 => "xml_v1",
            SchemaVersion::XmlV4 => "xml_v4",
        };
        write!(f, "{}/{}", family, schema)
    }
}
