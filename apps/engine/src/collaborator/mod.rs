//! External collaborators: decision makers and metrics sinks.
//!
//! The phase machine never looks inside these. Decisions come back as data
//! that player behaviors turn into deltas; metrics are fire-and-forget.

mod decision;
mod metrics;
mod scripted;

pub use decision::{DecisionCollaborator, DecisionError, PlayerView, SpeechDecision, VoteDecision};
pub use metrics::{
    MetricsError, MetricsEvent, MetricsHub, MetricsSink, RecordingMetrics, TracingMetrics,
};
pub use scripted::ScriptedDecider;
