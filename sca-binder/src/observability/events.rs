//! Canonical structured event names used across `sca-binder`.

// Binder events.
pub const BIND_START: &str = "bind_start";
pub const BIND_OK: &str = "bind_ok";
pub const BIND_FAILED: &str = "bind_failed";
pub const BIND_DEFERRED: &str = "bind_deferred";
pub const BIND_MATCH_AUDIT: &str = "bind_match_audit";
pub const AUTOWIRE_CANDIDATE_WIRED: &str = "autowire_candidate_wired";
pub const AUTOWIRE_SINGLE_TARGET_SELECTED: &str = "autowire_single_target_selected";
pub const FORWARD_ENDPOINT_SELECTED: &str = "forward_endpoint_selected";
pub const FORWARD_ENDPOINT_NOT_FOUND: &str = "forward_endpoint_not_found";
pub const CALLBACK_ENDPOINT_SELECTED: &str = "callback_endpoint_selected";
pub const CALLBACK_ENDPOINT_SYNTHESIZED: &str = "callback_endpoint_synthesized";
pub const ASYNC_CALLBACK_SYNTHESIZED: &str = "async_callback_synthesized";
pub const UNKNOWN_ENDPOINT_RESOLVED: &str = "unknown_endpoint_resolved";
pub const REFERENCE_OUT_OF_DATE: &str = "reference_out_of_date";

// Monitor and structural builder events.
pub const MONITOR_PROBLEM: &str = "monitor_problem";
pub const BINDING_URI_ASSIGNED: &str = "binding_uri_assigned";
pub const BINDING_NAME_DEFAULTED: &str = "binding_name_defaulted";

// Registry and directory events.
pub const REGISTRY_ENDPOINT_ADDED: &str = "registry_endpoint_added";
pub const REGISTRY_ENDPOINT_REPLACED: &str = "registry_endpoint_replaced";
pub const REGISTRY_ENDPOINT_REMOVED: &str = "registry_endpoint_removed";
pub const REGISTRY_LOOKUP_EMPTY: &str = "registry_lookup_empty";
pub const DIRECTORY_FETCH_START: &str = "directory_fetch_start";
pub const DIRECTORY_FETCH_OK: &str = "directory_fetch_ok";
pub const DIRECTORY_FETCH_FAILED: &str = "directory_fetch_failed";

// Domain lifecycle events.
pub const DEPLOY_START: &str = "deploy_start";
pub const DEPLOY_OK: &str = "deploy_ok";
pub const DEPLOY_FAILED: &str = "deploy_failed";
pub const DEPLOY_ROLLED_BACK: &str = "deploy_rolled_back";
pub const UNDEPLOY_OK: &str = "undeploy_ok";
pub const UNDEPLOY_COMPOSITE_OK: &str = "undeploy_composite_ok";
pub const ENDPOINT_PUBLISHED: &str = "endpoint_published";
pub const DEFINITION_UNRESOLVED: &str = "definition_unresolved";
