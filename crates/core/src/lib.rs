//! Core library for the rhstor tools
//!
//! This crate is the **Functional Core** of the two rhstor binaries
//! (`rhstor-stories` and `rhstor-view`). Every function here is pure: no
//! HTTP, no terminal, no environment access. The `rhstor` crate owns all of
//! that and calls into this crate for the decisions.
//!
//! # Module Organization
//!
//! - [`profile`]: per-tool configuration (project, allowed statuses, default label)
//! - [`version`]: fix-version format check and the product tag transform
//! - [`query`]: JQL construction for epic searches and duplicate checks
//! - [`jira`]: Jira REST wire models and their conversion into domain types
//! - [`epic_link`]: locating the custom field that links a story to its epic
//! - [`template`]: story templates and template selection
//! - [`story`]: rendering a template against an epic into a create payload
//! - [`plan`]: deciding which stories each epic needs
//! - [`summary`]: status counts for the view tool
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use rhstor_core::profile::ToolProfile;
//! use rhstor_core::query::{build_epic_query, SearchFilters};
//!
//! let profile = ToolProfile::stories();
//! let filters = SearchFilters {
//!     label: Some("ODF-4.19-candidate".to_string()),
//!     ..Default::default()
//! };
//!
//! let query = build_epic_query(&profile, &filters).unwrap();
//! assert_eq!(
//!     query.jql,
//!     r#"project = RHSTOR AND issuetype = Epic AND labels = "ODF-4.19-candidate""#
//! );
//! ```

pub mod epic_link;
pub mod jira;
pub mod plan;
pub mod profile;
pub mod query;
pub mod story;
pub mod summary;
pub mod template;
pub mod version;
