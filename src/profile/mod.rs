//! Profile module
//!
//! The dynamic attribute record used by the OAuth2 API. Each tenant
//! configures its own profile fields, so values are stored in a closed
//! tagged union and read back through typed accessors.

mod record;
mod value;

pub use record::{Profile, ProfileRecord, Property, GROUP, MEMBER_TYPE, PROFILE_ID};
pub use value::{AttrMap, AttrValue, FromAttr};
