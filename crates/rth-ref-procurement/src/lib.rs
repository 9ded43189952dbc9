//! # rth-ref-procurement
//!
//! Procurement reference runtime for the RTH consensus engine.
//!
//! Demonstrates three milestone-verification scenarios using mock data:
//!
//! 1. **Clean Milestone Sign-off** — four inspectors in close agreement,
//!    confidence near 1, session authorizes.
//! 2. **Rogue Verifier Exclusion** — one wildly divergent report excluded
//!    by the outlier filter; the decision rides on the filtered aggregate.
//! 3. **Split Panel Rejection** — evidence spread across the whole domain,
//!    confidence collapses, session rejects without excluding anyone.
//!
//! All data is hardcoded and fictional. No external systems are contacted.

pub mod mock_data;
pub mod scenarios;
