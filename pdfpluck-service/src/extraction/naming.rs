//! Output identifier generation.
//!
//! The first surviving image of a run is the primary subject photo, the
//! second the signature image; both get a fixed role prefix followed by a
//! truncated random token. Everything after that is a bare random token.
//! All identifiers carry the canonical extension and are generated
//! independently of the document's structure.

use uuid::Uuid;

pub const PRIMARY_PREFIX: &str = "user-img-";
pub const SECONDARY_PREFIX: &str = "sign-img-";
pub const CANONICAL_EXTENSION: &str = ".png";

/// Length of the truncated UUID suffix on role-prefixed identifiers.
const ROLE_SUFFIX_LEN: usize = 18;

/// Generate the identifier for the image at `position` in the sequence of
/// successfully normalized images.
pub fn assign_identifier(position: usize) -> String {
    let token = Uuid::new_v4().to_string();
    match position {
        0 => format!("{PRIMARY_PREFIX}{}{CANONICAL_EXTENSION}", &token[..ROLE_SUFFIX_LEN]),
        1 => format!("{SECONDARY_PREFIX}{}{CANONICAL_EXTENSION}", &token[..ROLE_SUFFIX_LEN]),
        _ => format!("{token}{CANONICAL_EXTENSION}"),
    }
}
