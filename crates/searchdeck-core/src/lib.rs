//! Shared search-console domain modules.
//!
//! - `params`: one query's worth of operator-chosen parameters.
//! - `envelope`: wire-shaped request body for the search service.
//! - `validate`: pre-submit checks that block a request client-side.
//! - `answer`: wire-shaped search reply and per-hit field access.
//! - `results`: retrieval-toggle driven hit selection and flattening.
//! - `share_link`: document deep-link build/parse round trip.
//! - `secret`: URL-safe obfuscation for key material carried in links.
//! - `notice`: code-to-message catalog for operator notifications.

pub mod answer;
pub mod envelope;
pub mod notice;
pub mod params;
pub mod results;
pub mod secret;
pub mod share_link;
pub mod validate;

pub use answer::{Answer, ResultBucket, SearchReply, SourceHit};
pub use envelope::{RequestEnvelope, build_filter_metadata, build_request};
pub use notice::{MessageCatalog, Notice, Severity};
pub use params::{FilterEntry, QueryParameters};
pub use results::{FilteredHits, SourceSelection, filter_hits, select_source};
pub use share_link::{ShareLink, ShareLinkError, build_share_url, parse_share_url};
pub use validate::{ValidationError, validate_submit};
