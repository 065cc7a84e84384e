//! # Resource Entities
//!
//! Small leaf entities shared by non-linear and companion ads.

use serde::Serialize;
use vast_core::{field_keys, Converter, Entity, FieldRules, Fields, RawMap, Target, Violation};

field_keys! {
    /// Raw keys of a [`StaticResource`].
    pub enum StaticResourceField {
        Resource => "resource",
        CreativeType => "creative_type",
    }
}

/// A static creative file (image, Flash) and its MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticResource {
    resource: String,
    creative_type: String,
}

impl StaticResource {
    /// URI of the resource.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// MIME type of the resource, e.g. `image/png`.
    pub fn creative_type(&self) -> &str {
        &self.creative_type
    }
}

impl Entity for StaticResource {
    type Field = StaticResourceField;
    const NAME: &'static str = "StaticResource";
    const RULES: FieldRules<StaticResourceField> = FieldRules {
        required: &[StaticResourceField::Resource, StaticResourceField::CreativeType],
        converters: &[Converter::new(
            Target::Text,
            &[StaticResourceField::Resource, StaticResourceField::CreativeType],
        )],
        ..FieldRules::new()
    };

    fn assemble(fields: &mut Fields<StaticResourceField>) -> Result<Self, Violation> {
        Ok(Self {
            resource: fields.require_text(StaticResourceField::Resource)?,
            creative_type: fields.require_text(StaticResourceField::CreativeType)?,
        })
    }

    fn to_raw(&self) -> RawMap {
        RawMap::new()
            .with("resource", self.resource.as_str())
            .with("creative_type", self.creative_type.as_str())
    }
}

field_keys! {
    /// Raw keys of a [`UriWithId`].
    pub enum UriWithIdField {
        Resource => "resource",
        Id => "id",
    }
}

/// A URI with an optional identifier, such as a click-through target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UriWithId {
    resource: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
}

impl UriWithId {
    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Entity for UriWithId {
    type Field = UriWithIdField;
    const NAME: &'static str = "UriWithId";
    const RULES: FieldRules<UriWithIdField> = FieldRules {
        required: &[UriWithIdField::Resource],
        converters: &[Converter::new(
            Target::Text,
            &[UriWithIdField::Resource, UriWithIdField::Id],
        )],
        ..FieldRules::new()
    };

    fn assemble(fields: &mut Fields<UriWithIdField>) -> Result<Self, Violation> {
        Ok(Self {
            resource: fields.require_text(UriWithIdField::Resource)?,
            id: fields.text(UriWithIdField::Id)?,
        })
    }

    fn to_raw(&self) -> RawMap {
        RawMap::new()
            .with("resource", self.resource.as_str())
            .with_opt("id", self.id.clone())
    }
}
