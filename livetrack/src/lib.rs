//! LiveTrack - live race-track map core.
//!
//! Turns a raw circuit coordinate trace into a rotated, sector-segmented
//! path, colors each sector from the race-control message stream, and maps
//! live car telemetry into the same display frame.
//!
//! # Pipeline
//!
//! ```text
//! MapProvider ──► TrackMapService ──► MapGeometry (atomic publish)
//!                                        │
//!          race-control messages ──► flags::affected_sectors ─┐
//!                  status lookup ────────────────────────────►├─► render::project
//!                                        sectors ─────────────┘
//!                                        │
//!                 telemetry ticks ──► LivePositionMapper (per-driver)
//! ```
//!
//! Geometry is derived once per circuit load. Sector coloring recomputes on
//! race-control or status changes; position mapping recomputes per driver on
//! telemetry ticks. The two streams are independent and never share mutable
//! state.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use livetrack::provider::{HttpMapProvider, ReqwestClient};
//! use livetrack::service::TrackMapService;
//! use livetrack::status::{StaticStatusTable, StatusLookup};
//!
//! let client = ReqwestClient::new()?;
//! let provider = Arc::new(HttpMapProvider::new(client, 2024));
//! let service = TrackMapService::new(provider);
//!
//! service.load_circuit(circuit_key).await?;
//! let geometry = service.current().expect("just loaded");
//!
//! let affected = livetrack::flags::affected_sectors(&messages);
//! let status = StaticStatusTable.status(Some("2"));
//! let paths = livetrack::render::project(&geometry.sectors, &affected, status.as_ref());
//! ```

pub mod flags;
pub mod geometry;
pub mod logging;
pub mod map;
pub mod position;
pub mod provider;
pub mod render;
pub mod service;
pub mod status;

pub use geometry::TrackPosition;
pub use map::{RawMap, Sector};
pub use position::{DisplayFrame, DriverStatus, LivePositionMapper, RenderedDriver};
pub use render::{RenderedSector, SectorColor};
pub use service::{MapGeometry, TrackMapService};
