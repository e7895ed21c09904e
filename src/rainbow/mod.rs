pub(crate) mod cycle;
pub(crate) mod role;

pub(crate) use cycle::ColorCycle;
pub(crate) use role::SerenityRoles;
