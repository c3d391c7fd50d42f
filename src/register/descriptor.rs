//! The repository-description descriptor.
//!
//! This is the fixed shape every record body must conform to: operational
//! metadata in one or more languages, the software stack, contacts and
//! organisations with their roles, content/metadata/data policies, machine
//! interfaces (OAI-PMH, SWORD, and friends), and integrations with external
//! systems.
//!
//! The descriptor is an explicit constructed value handed into record
//! operations, so a revised shape can coexist with this one during a
//! migration.

use crate::schema::Descriptor;

/// Builds the current repository-description descriptor.
pub fn register_descriptor() -> Descriptor {
    Descriptor::new()
        .with_fields(["replaces", "isreplacedby", "operational_status"])
        .with_lists([
            "metadata",
            "software",
            "contact",
            "organisation",
            "policy",
            "api",
            "integration",
        ])
        .with_list_entry("metadata", metadata_descriptor())
        .with_list_entry(
            "software",
            Descriptor::new().with_fields(["name", "version", "url"]),
        )
        .with_list_entry("contact", contact_descriptor())
        .with_list_entry("organisation", organisation_descriptor())
        .with_list_entry(
            "policy",
            Descriptor::new()
                .with_fields(["policy_type", "policy_grade", "description"])
                .with_lists(["terms"]),
        )
        .with_list_entry("api", api_descriptor())
        .with_list_entry(
            "integration",
            Descriptor::new().with_fields([
                "integrated_with",
                "nature",
                "url",
                "software",
                "version",
            ]),
        )
}

/// Per-language metadata block: a language tag, a default flag, and the
/// descriptive record itself.
fn metadata_descriptor() -> Descriptor {
    Descriptor::new()
        .with_bools(["default"])
        .with_fields(["lang"])
        .with_objects(["record"])
        .with_object_entry(
            "record",
            Descriptor::new()
                .with_fields([
                    "country",
                    "country_code",
                    "continent",
                    "continent_code",
                    "twitter",
                    "acronym",
                    "description",
                    "established_date",
                    "name",
                    "url",
                ])
                .with_lists([
                    "language",
                    "language_code",
                    "subject",
                    "repository_type",
                    "certification",
                    "content_type",
                ])
                .with_list_entry(
                    "subject",
                    Descriptor::new().with_fields(["scheme", "term", "code"]),
                ),
        )
}

fn contact_descriptor() -> Descriptor {
    Descriptor::new()
        .with_lists(["role"])
        .with_objects(["details"])
        .with_object_entry(
            "details",
            Descriptor::new().with_fields([
                "name",
                "email",
                "address",
                "fax",
                "phone",
                "lat",
                "lon",
                "job_title",
            ]),
        )
}

fn organisation_descriptor() -> Descriptor {
    Descriptor::new()
        .with_lists(["role"])
        .with_objects(["details"])
        .with_object_entry(
            "details",
            Descriptor::new().with_fields([
                "name",
                "acronym",
                "url",
                "unit",
                "unit_acronym",
                "unit_url",
                "country",
                "country_code",
                "lat",
                "lon",
            ]),
        )
}

/// Machine interface block. The scalar fields are common to all API types;
/// the list fields cover OAI-PMH metadata formats and SWORD accept lists.
fn api_descriptor() -> Descriptor {
    Descriptor::new()
        .with_bools(["authenticated"])
        .with_fields(["api_type", "version", "base_url"])
        .with_lists([
            "metadata_prefixes",
            "metadata_formats",
            "accepts",
            "accept_packaging",
        ])
        .with_list_entry(
            "metadata_formats",
            Descriptor::new().with_fields(["prefix", "namespace", "schema"]),
        )
}
