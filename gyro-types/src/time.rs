/// Monotonic time since boot, in microseconds. Zero means "never".
pub type Microseconds = u64;
