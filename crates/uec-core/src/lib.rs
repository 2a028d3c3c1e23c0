//! Version-aware validation and transformation engine for Unified Entity
//! Cards. Every operation is a pure, synchronous function over
//! `serde_json::Value`: validators accumulate dotted-path error strings and
//! never throw; transformations return fresh documents and report their
//! preconditions through [`CardError`]; lint findings and merge conflicts are
//! plain data.

mod assets;
mod codec;
mod convert;
mod diff;
mod error;
mod lint;
mod merge;
mod payload;
mod shapes;
mod transfer;
mod validate;
mod value;

pub use assets::{extract_assets, rewrite_assets};
pub use codec::{normalize_uec, parse_uec, stringify_uec};
pub use convert::convert_uec_v1_to_v2;
pub use diff::diff_uec;
pub use error::CardError;
pub use lint::lint_uec;
pub use merge::merge_uec;
pub use transfer::{downgrade_uec, upgrade_uec};
pub use validate::{
    assert_uec, is_character_uec, is_persona_uec, is_uec, validate_uec, validate_uec_at_version,
    validate_uec_strict,
};
pub use value::MAX_DEPTH;

pub use uec_protocol as protocol;
