/// Analytics derived from habit histories for presentation
///
/// Statistics live with the domain types; this module builds the view data
/// that only renderers need, starting with the year heatmap grid.

pub mod calendar;

pub use calendar::*;
