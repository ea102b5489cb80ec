//! Mappable-field catalog
//!
//! The static list of source expressions configuration tooling offers when
//! a tenant edits mapping rules. Runtime mapping does not consult this:
//! tenants may type any expression the language parses.

use serde::Serialize;

use crate::core::constants::OBJECT_TYPE_COMPANY;

/// One selectable source expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappableField {
    pub value: String,
    pub label: String,
}

/// Catalog response for one object type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldsSchema {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub options: Vec<MappableField>,
}

/// Company profile fields of the Domain API, `(expression, label)`
const COMPANY_FIELDS: &[(&str, &str)] = &[
    ("Results[0].Result.IsDB", "Ecommerce Indicator"),
    ("Results[0].Result.Spend", "Tech Spend (USD)"),
    ("Results[0].Result.SalesRevenue", "Sales Revenue (USD)"),
    (
        "$fromMillis($min(Results[0].Result.Paths.FirstIndexed))",
        "First Indexed At",
    ),
    (
        "$fromMillis($min(Results[0].Result.Paths.LastIndexed))",
        "Last Indexed At",
    ),
    (
        "$distinct(Results[0].Result.Paths.Technologies.Name)",
        "All Technologies",
    ),
    (
        "$distinct(Results[0].Result.Paths.Technologies[IsPremium=\"yes\"].Name)",
        "Premium Technologies",
    ),
    ("Results[0].Meta.CompanyName", "Company Name"),
    ("Results[0].Meta.City", "City"),
    ("Results[0].Meta.Postcode", "Postal Code"),
    ("Results[0].Meta.State", "State"),
    ("Results[0].Meta.Country", "Country"),
    ("Results[0].Meta.Vertical", "Vertical"),
    ("Results[0].Meta.Telephones", "Telephones"),
    ("Results[0].Meta.Emails", "Domain Emails"),
    ("Results[0].Meta.Social", "Social Profiles"),
    ("Results[0].Meta.Names", "Contact Names"),
    ("Results[0].Attributes.DomainRank", "Domain Rank"),
    ("Results[0].Attributes.TldRank", "Domain Rank within TLD"),
    ("Results[0].Attributes.RefSubnets", "Referring Subnets"),
    ("Results[0].Attributes.RefIps", "Referring IPs"),
    ("Results[0].Attributes.Ttfb", "Seconds to First Byte"),
    ("Results[0].Attributes.Sitemap", "Pages in Indexable Sitemap"),
    (
        "Results[0].Attributes.GtmTags",
        "Tags Loaded via Google Tag Manager",
    ),
    (
        "Results[0].Attributes.CDimensions",
        "Custom Dimensions in Google Analytics",
    ),
    ("Results[0].Attributes.CGoals", "Custom Goals in Google Analytics"),
    (
        "Results[0].Attributes.CMetrics",
        "Custom Metrics in Google Analytics",
    ),
    ("Results[0].Attributes.SourceBytes", "Document Size (Bytes)"),
];

/// List the source expressions available for an object type
pub fn mappable_fields(object_type: &str) -> FieldsSchema {
    if object_type != OBJECT_TYPE_COMPANY {
        return FieldsSchema {
            ok: false,
            error: Some(format!(
                "Unsupported object type '{object_type}'. Supported types: {OBJECT_TYPE_COMPANY}."
            )),
            options: Vec::new(),
        };
    }
    FieldsSchema {
        ok: true,
        error: None,
        options: COMPANY_FIELDS
            .iter()
            .map(|(value, label)| MappableField {
                value: (*value).to_string(),
                label: (*label).to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::expr::Expression;

    #[test]
    fn test_company_catalog_is_listed() {
        let schema = mappable_fields("enrichcompany");
        assert!(schema.ok);
        assert!(schema.error.is_none());
        assert_eq!(schema.options.len(), COMPANY_FIELDS.len());
        assert!(
            schema
                .options
                .iter()
                .any(|f| f.value == "Results[0].Meta.City" && f.label == "City")
        );
    }

    #[test]
    fn test_every_catalog_expression_parses() {
        for field in mappable_fields("enrichcompany").options {
            assert!(
                Expression::parse(&field.value).is_ok(),
                "catalog expression must parse: {}",
                field.value
            );
        }
    }

    #[test]
    fn test_unknown_object_type_is_rejected() {
        let schema = mappable_fields("enrichperson");
        assert!(!schema.ok);
        assert!(schema.error.is_some());
        assert!(schema.options.is_empty());
    }

    #[test]
    fn test_unknown_type_serializes_with_error() {
        let schema = mappable_fields("bogus");
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["ok"], serde_json::json!(false));
        assert!(value["error"].as_str().unwrap().contains("bogus"));
    }
}
