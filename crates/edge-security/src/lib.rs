//! Request classification for the streaming SSR entry.
//!
//! This crate provides:
//! - `AgentClassifier` - Decides whether a client is an automated agent
//! - `UserAgentPatterns` - Pattern-based classifier over the `User-Agent` header
//!
//! # Example
//!
//! ```
//! use edge_security::{AgentClassifier, UserAgentPatterns};
//!
//! let classifier = UserAgentPatterns::default().with_pattern("acme-monitor");
//!
//! assert!(classifier.is_automated(Some("Googlebot/2.1")));
//! assert!(classifier.is_automated(Some("acme-monitor/1.0")));
//! assert!(!classifier.is_automated(None));
//! ```

mod agent;

pub use agent::*;
