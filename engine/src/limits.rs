// Largest world radius, in chunks, that generated worlds may use
pub const VIEW_DISTANCE: i32 = 22;
