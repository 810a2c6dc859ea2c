//! # Beacon Core
//!
//! Core library for Beacon, a rate-limit-aware dispatcher for lookup requests
//! across interchangeable upstream providers.
//!
//! This crate provides the foundational components for:
//!
//! - **[`upstream`]**: Per-provider rolling-window health statistics, admission
//!   control against per-minute rate limits, best-provider selection, and the
//!   transport seam used for the outbound call.
//!
//! - **[`config`]**: Layered application configuration (compiled defaults →
//!   TOML file → environment overrides) with validation and conversion into
//!   runtime provider definitions.
//!
//! - **[`types`]**: Shared provider definitions.
//!
//! ## Dispatch Flow
//!
//! ```text
//! Caller
//!   │
//!   ▼
//! ┌──────────────┐
//! │    Broker    │
//! │  (dispatch)  │
//! └──────┬───────┘
//!        │ snapshot every provider's stats
//!        ▼
//! ┌─────────────────────────────┐
//! │ Admission filter            │ ── none eligible ──► NoProviderAvailable
//! │ (requests this minute < cap)│
//! └──────┬──────────────────────┘
//!        │ rank: error count, then mean latency
//!        ▼
//! ┌──────────────┐
//! │  Transport   │ ◄── resolved target URL, elapsed time measured around call
//! └──────┬───────┘
//!        │
//!   ┌────┴─────┐
//!   ▼          ▼
//! success    failure
//!   │          │
//!   ▼          ▼
//! record ok  record error
//! return     propagate
//! body       ProviderError
//! ```
//!
//! Each provider's tracker is its own critical section; selection reads one
//! snapshot per provider and never takes a cross-provider lock.

pub mod config;
pub mod types;
pub mod upstream;
