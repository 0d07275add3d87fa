//! Domain resources
//!
//! Events, groups, countries, member types and member statuses. Each is a
//! plain GET returning every item at once.

mod types;

pub use types::{
    Country, CountryList, Event, EventList, Group, GroupList, MemberStatus, MemberStatusList,
    MemberType, MemberTypeList, ResourceList,
};
