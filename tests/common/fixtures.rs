//! Discovery documents used across tests

/// Path the mock discovery document is served from
pub const DISCOVERY_PATH: &str = "/rest/v1.0/resource_groups";

/// Two groups, the second with several versions of the same document
pub const TWO_GROUPS: &str = r#"{
  "groups": [
    { "name": "RFIs", "links": ["/rest/v1.0/rfis"] },
    { "name": "ToDos", "links": ["/rest/v1.0/todos?v=1", "/rest/v1.0/todos?v=2"] }
  ]
}"#;

/// Five single-link groups named one through five
pub const FIVE_GROUPS: &str = r#"{
  "groups": [
    { "name": "One", "links": ["/rest/v1.0/one"] },
    { "name": "Two", "links": ["/rest/v1.0/two"] },
    { "name": "Three", "links": ["/rest/v1.0/three"] },
    { "name": "Four", "links": ["/rest/v1.0/four"] },
    { "name": "Five", "links": ["/rest/v1.0/five"] }
  ]
}"#;

/// Groups with nested, directory and explicit-extension links
pub const NESTED_LINKS: &str = r#"{
  "groups": [
    { "name": "Project RFIs", "links": [{ "href": "/rest/v1.0/projects/rfis" }] },
    { "name": "Index", "links": ["/rest/v1.0/companies/"] },
    { "name": "Schema", "links": ["/rest/v1.0/schema.v2.json"] }
  ]
}"#;

/// Groups carrying support levels, as served by the groups endpoint
pub const SUPPORT_LEVEL_GROUPS: &str = r#"[
  { "name": "Managed Equipment - Company Level", "highest_support_level": "production",
    "links": ["/rest/v1.0/managed_equipment"] },
  { "name": "Budget Views", "highest_support_level": "beta",
    "links": ["/rest/v1.0/budget_views"] },
  { "name": "Legacy Things", "highest_support_level": "internal",
    "links": ["/rest/v1.0/legacy"] }
]"#;
