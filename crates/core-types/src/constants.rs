// Inventory group ids of moon asteroids in the game's static data.
pub const EVE_GROUP_ID_UBIQUITOUS_MOON_ASTEROIDS: i32 = 1884;
pub const EVE_GROUP_ID_COMMON_MOON_ASTEROIDS: i32 = 1920;
pub const EVE_GROUP_ID_UNCOMMON_MOON_ASTEROIDS: i32 = 1921;
pub const EVE_GROUP_ID_RARE_MOON_ASTEROIDS: i32 = 1922;
pub const EVE_GROUP_ID_EXCEPTIONAL_MOON_ASTEROIDS: i32 = 1923;

/// chrono format string used for every timestamp shown in a table.
pub const DATETIME_FORMAT: &str = "%Y-%b-%d %H:%M";

/// Values are displayed in billions of ISK.
pub const VALUE_DIVIDER: i64 = 1_000_000_000;

/// Expected ore volume a moon yields per month, in m³.
pub const DEFAULT_VOLUME_PER_MONTH: i64 = 14_557_923;

/// Number of calendar months covered by the user mining report.
pub const USER_MINING_REPORT_MONTHS: usize = 4;
