//! REST Endpoint Wrappers
//!
//! Typed bindings to backend resources, organized by domain. Every call goes
//! through the `ApiClient` interceptor chain.

mod activity;
mod auth;
mod boards;
mod cards;
mod columns;
mod comments;
mod labels;
mod notifications;
mod search;
mod users;
mod workspaces;

pub use activity::*;
pub use auth::*;
pub use boards::*;
pub use cards::*;
pub use columns::*;
pub use comments::*;
pub use labels::*;
pub use notifications::*;
pub use search::*;
pub use users::*;
pub use workspaces::*;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Unreserved characters stay readable in ids
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Percent-encode a value for use inside a URL
pub(crate) fn encode(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

/// Encode one id for use as a path segment
pub(crate) fn segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::harness;
    use futures::executor::block_on;

    #[test]
    fn test_segment_keeps_uuid_and_escapes_separators() {
        assert_eq!(segment("3f2a-41_b.c~d"), "3f2a-41_b.c~d");
        assert_eq!(segment("a/b?c"), "a%2Fb%3Fc");
    }

    #[test]
    fn test_ids_are_encoded_in_paths() {
        let h = harness();
        h.backend.respond(204, "");
        block_on(delete_card(&h.api, "c1/../admin")).unwrap();
        assert_eq!(h.backend.paths(), vec!["DELETE /cards/c1%2F..%2Fadmin"]);
    }
}
