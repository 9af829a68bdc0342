/// Data layer: parsing, alignment, and export.
///
/// Architecture:
/// ```text
///  co-pol .csv        cross-pol .csv
///        │                  │
///        ▼                  ▼
///   ┌──────────┐      ┌──────────┐
///   │  loader   │      │  loader   │  raw bytes → Series
///   └──────────┘      └──────────┘
///        │                  │
///        └───────┬──────────┘
///                ▼
///           ┌──────────┐
///           │  align    │  union grid, interpolation, rejection
///           └──────────┘
///                │
///                ▼
///          AlignedTable ──► export (legacy-header CSV)
/// ```

pub mod align;
pub mod export;
pub mod loader;
pub mod model;
