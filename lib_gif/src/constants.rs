/// Marker substring identifying the embedded byte-array declaration.
pub const ARRAY_MARKER: &str = "_map[]";

/// Bytes per line when regenerating an array body in place.
pub const PATCH_BYTES_PER_LINE: usize = 13;

/// Bytes per line when exporting a fresh source file.
pub const EXPORT_BYTES_PER_LINE: usize = 16;

/// Hard upper bound on palette entries in the container format.
pub const MAX_PALETTE_COLORS: usize = 256;
