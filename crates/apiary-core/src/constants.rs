/// Request-control constants shared across crates
pub const UNIT_HEADER_PREFIX: &str = "X-Apiary";

/// Opt-in control for recursive cell deletion. Only the literal value
/// `"true"` selects the recursive path.
pub const RECURSIVE_HEADER: &str = const_str::concat!(UNIT_HEADER_PREFIX, "-Recursive");

/// Name of the box created together with every cell. The main box cannot be
/// deleted on its own and is only removed when its cell goes away.
pub const MAIN_BOX_NAME: &str = "__";
