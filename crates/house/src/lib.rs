pub mod convert;
pub mod decode;
pub mod encode;
pub mod error;
pub mod model;
pub mod resolve;
pub mod validate;

pub use convert::{convert, ConvertOptions, ConvertOutcome};
pub use decode::decode_house;
pub use encode::{encode_house, EncodeOptions};
pub use error::{ConvertError, ConvertErrorCode, SourceLocation};
pub use model::{Condition, ConditionSource, House, Item, Room, SpecialResponse, State};
pub use resolve::{
    lookup_int, lookup_text, profile, resolve_identity, Identity, IdentityProfile, Lookup,
    ResolveContext,
};
pub use validate::{validate_house, ValidationIssue};
